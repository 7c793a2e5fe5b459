use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::proxy::ProxyConfig;
use crate::routing::RouteTable;
use crate::settings::Settings;
use super::handler::RequestHandler;
use super::listener::ServerListener;
use super::Result;

/// 설정에서 라우팅 테이블, 프록시 클라이언트, 요청 핸들러를 조립합니다.
pub struct ServerManager {
    pub config: Settings,
    handler: Arc<RequestHandler>,
}

impl ServerManager {
    /// 라우팅 테이블을 만들고 핸들러를 준비합니다.
    /// 라우트가 알 수 없는 대상 서버를 참조하면 실패합니다.
    #[instrument(skip(settings), level = "debug", err)]
    pub fn new(settings: Settings) -> Result<Self> {
        let routing_table = RouteTable::build(&settings.routes, &settings.target_servers)
            .map_err(|e| {
                error!(error = %e, "라우팅 테이블 생성 실패");
                e
            })?;
        info!(routes = routing_table.len(), "라우트 등록 완료");

        let proxy_config = ProxyConfig::new(&settings.forwarding);
        let handler = Arc::new(RequestHandler::new(Arc::new(routing_table), proxy_config));

        Ok(Self {
            config: settings,
            handler,
        })
    }

    pub fn routing_table(&self) -> &RouteTable {
        self.handler.routing_table()
    }

    pub fn handler(&self) -> Arc<RequestHandler> {
        self.handler.clone()
    }

    /// 설정된 포트에 바인딩하고 요청을 받기 시작합니다.
    pub async fn start(self) -> Result<()> {
        let listener = ServerListener::new(&self.config.server).await?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: ServerListener) -> Result<()> {
        info!(address = %listener.local_addr()?, "게이트웨이 요청 수신 시작");
        listener.run(self.handler).await
    }
}
