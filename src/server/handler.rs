use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use tracing::error;
use uuid::Uuid;

use crate::{
    logging::{log_request, RequestLog},
    proxy::{self, ProxyBody, ProxyConfig},
    routing::{RouteTable, RoutingError},
};

pub struct RequestHandler {
    routing_table: Arc<RouteTable>,
    proxy_config: ProxyConfig,
}

impl RequestHandler {
    pub fn new(routing_table: Arc<RouteTable>, proxy_config: ProxyConfig) -> Self {
        Self {
            routing_table,
            proxy_config,
        }
    }

    pub fn routing_table(&self) -> &RouteTable {
        &self.routing_table
    }

    /// 요청 하나를 처리합니다. 모든 실패는 HTTP 에러 응답으로 바뀌므로
    /// 이 함수 자체는 실패하지 않습니다.
    pub async fn handle_request<B>(
        &self,
        req: Request<B>,
    ) -> Result<Response<ProxyBody>, Infallible>
    where
        B: Body + Send,
        B::Data: Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let start_time = Instant::now();
        let mut log = RequestLog::new(Uuid::new_v4().to_string());
        log.with_request(&req);

        // 1. 라우팅
        let response = match self.routing_table.route_request(&req) {
            Ok(route) => {
                log.with_target(&route.target_url(
                    req.uri().path_and_query().map_or("/", |pq| pq.as_str()),
                ));

                // 2. 프록시 요청
                match proxy::forward_request(&self.proxy_config, route, req, &log.request_id).await {
                    Ok(response) => response,
                    Err(e) => {
                        error!(request_id = %log.request_id, error = %e, "프록시 요청 실패");
                        log.with_error(&e);
                        proxy::error_response(&e)
                    }
                }
            }
            Err(e) => {
                log.with_error(&e);
                Self::not_found_response(&e)
            }
        };

        log.with_response(response.status());
        log.duration_ms = start_time.elapsed().as_millis() as u64;
        log_request(&log);

        Ok(response)
    }

    // 요청 처리 중 `route_request`가 돌려주는 에러는 `RouteNotFound`뿐입니다.
    fn not_found_response(error: &RoutingError) -> Response<ProxyBody> {
        proxy::text_response(StatusCode::NOT_FOUND, format!("Error: {}", error))
    }

    pub async fn handle_connection<I>(&self, io: I) -> Result<(), hyper::Error>
    where
        I: hyper::rt::Read + hyper::rt::Write + Unpin,
    {
        http1::Builder::new()
            .serve_connection(
                io,
                service_fn(|req: Request<Incoming>| self.handle_request(req)),
            )
            .await
    }
}
