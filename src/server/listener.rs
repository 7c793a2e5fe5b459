use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use hyper_util::rt::TokioIo;
use tracing::{debug, error, info};

use crate::settings::ServerSettings;
use super::handler::RequestHandler;
use super::Result;

pub struct ServerListener {
    http_listener: TcpListener,
}

impl ServerListener {
    /// 설정된 포트로 모든 인터페이스에 바인딩합니다. 실패하면 시작을 중단해야 합니다.
    pub async fn new(settings: &ServerSettings) -> Result<Self> {
        let http_listener = TcpListener::bind(("0.0.0.0", settings.port))
            .await
            .map_err(|e| {
                error!(error = %e, port = settings.port, "HTTP 포트 바인딩 실패");
                e
            })?;

        info!(port = settings.port, "HTTP 리스너 시작");
        Ok(Self { http_listener })
    }

    /// 이미 바인딩된 리스너를 사용합니다.
    pub fn from_tcp(http_listener: TcpListener) -> Self {
        Self { http_listener }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.http_listener.local_addr()?)
    }

    /// 연결마다 별도 태스크를 띄워 처리합니다.
    /// 개별 연결의 실패는 기록만 하고 루프는 계속됩니다.
    pub async fn run(self, handler: Arc<RequestHandler>) -> Result<()> {
        loop {
            match self.http_listener.accept().await {
                Ok((stream, peer)) => {
                    debug!(peer = %peer, "연결 수락");
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        if let Err(err) = handler.handle_connection(io).await {
                            error!(error = %err, peer = %peer, "HTTP 연결 처리 실패");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "HTTP 연결 수락 실패");
                }
            }
        }
    }
}
