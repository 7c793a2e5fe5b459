//! 매칭된 요청을 백엔드로 전달하고 응답을 그대로 돌려주는 모듈입니다.

mod error;
pub mod headers;

use std::time::Duration;
use bytes::Bytes;
use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Full};
use hyper::body::{Body, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode, Uri};
use hyper_util::client::legacy;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::{error, info, instrument};

use crate::routing::ResolvedRoute;
use crate::settings::ForwardingSettings;

pub use error::ProxyError;

/// 게이트웨이가 클라이언트에게 돌려주는 응답 본문 타입
pub type ProxyBody = UnsyncBoxBody<Bytes, hyper::Error>;

// 프록시 요청을 위한 불변 설정 구조체.
// 클라이언트 내부의 커넥션 풀은 clone 사이에서 공유됩니다.
#[derive(Clone)]
pub struct ProxyConfig {
    client: legacy::Client<HttpConnector, Full<Bytes>>,
    timeout: Duration,
    strip_hop_by_hop: bool,
}

impl ProxyConfig {
    pub fn new(settings: &ForwardingSettings) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(settings.timeout()));
        let client = legacy::Client::builder(TokioExecutor::new())
            .build::<_, Full<Bytes>>(connector);

        Self {
            client,
            timeout: settings.timeout(),
            strip_hop_by_hop: settings.strip_hop_by_hop_headers,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new(&ForwardingSettings::default())
    }
}

/// 요청을 `route`의 백엔드로 한 번 전달합니다. 재시도는 하지 않습니다.
///
/// 요청 본문은 먼저 끝까지 읽어 새 본문으로 붙입니다. 메서드, 경로, 쿼리,
/// 헤더는 그대로 유지되고 주소만 백엔드 기본 URL로 바뀝니다.
/// 백엔드 응답의 상태 코드와 헤더는 그대로 복사되며, 본문은 스트리밍됩니다.
#[instrument(skip_all, fields(request_id = %request_id, route = %route.path()))]
pub async fn forward_request<B>(
    config: &ProxyConfig,
    route: &ResolvedRoute,
    req: Request<B>,
    request_id: &str,
) -> Result<Response<ProxyBody>, ProxyError>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();

    // 1. 요청 본문 버퍼링
    let body = body
        .collect()
        .await
        .map_err(|e| ProxyError::BodyRead { source: e.into() })?
        .to_bytes();

    // 2. 전달 주소 생성
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target_url = route.target_url(path_and_query);
    let uri: Uri = target_url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
        ProxyError::InvalidTargetUri {
            uri: target_url.clone(),
            reason: e.to_string(),
        }
    })?;

    // 3. 새 요청 생성 및 헤더 복사
    let mut outbound = Request::builder()
        .method(parts.method)
        .uri(uri)
        .body(Full::new(body))
        .map_err(|e| ProxyError::RequestBuild { source: e })?;
    *outbound.headers_mut() = parts.headers;
    if config.strip_hop_by_hop {
        headers::prepare_outbound(outbound.headers_mut());
    }

    info!(target_url = %target_url, method = %outbound.method(), "Forwarding request to backend");

    // 4. 백엔드 호출
    let response = match tokio::time::timeout(config.timeout, config.client.request(outbound)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => return Err(ProxyError::upstream(target_url, e)),
        Err(_) => {
            return Err(ProxyError::UpstreamTimeout {
                target: target_url,
                timeout: config.timeout,
            })
        }
    };

    info!(target_url = %target_url, status = %response.status(), "Received response from backend");

    // 5. 응답 전달
    let (mut parts, body) = response.into_parts();
    if config.strip_hop_by_hop {
        headers::strip_hop_by_hop(&mut parts.headers);
    }

    Ok(Response::from_parts(
        parts,
        relay_body(body, request_id.to_string(), target_url),
    ))
}

// 상태 줄과 헤더가 이미 전송된 뒤의 실패는 기록만 합니다.
fn relay_body(body: Incoming, request_id: String, target_url: String) -> ProxyBody {
    body.map_err(move |e| {
        error!(
            request_id = %request_id,
            target_url = %target_url,
            error = %e,
            "Failed to relay response body"
        );
        e
    })
    .boxed_unsync()
}

pub fn full_body(bytes: impl Into<Bytes>) -> ProxyBody {
    Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn text_response(status: StatusCode, message: impl Into<Bytes>) -> Response<ProxyBody> {
    let mut response = Response::new(full_body(message));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

pub fn error_response(error: &ProxyError) -> Response<ProxyBody> {
    text_response(error.status(), error.description())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::SocketAddr;
    use std::time::Instant;
    use futures_util::stream;
    use hyper::body::Frame;
    use hyper::header::HOST;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::Method;
    use hyper_util::rt::TokioIo;
    use http_body_util::StreamBody;
    use tokio::net::TcpListener;

    use crate::settings::{Route, TargetServer};

    async fn echo(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let method = req.method().to_string();
        let uri = req.uri().to_string();
        let host = req
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let custom = req.headers().get_all("x-custom").iter().count().to_string();
        let body = req.into_body().collect().await?.to_bytes();

        Ok(Response::builder()
            .status(StatusCode::ACCEPTED)
            .header("x-echo-method", method)
            .header("x-echo-uri", uri)
            .header("x-echo-host", host)
            .header("x-echo-custom-count", custom)
            .body(Full::new(body))
            .unwrap())
    }

    async fn spawn_echo_backend() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service_fn(echo))
                        .await;
                });
            }
        });
        addr
    }

    fn route_to(addr: SocketAddr, path: &str) -> ResolvedRoute {
        ResolvedRoute::resolve(
            &Route::new(path, "backend"),
            &TargetServer::new("backend", format!("http://{}", addr)),
        )
        .unwrap()
    }

    fn config_with(timeout_ms: u64, strip_hop_by_hop_headers: bool) -> ProxyConfig {
        ProxyConfig::new(&ForwardingSettings {
            timeout_ms,
            strip_hop_by_hop_headers,
        })
    }

    #[tokio::test]
    async fn test_forward_preserves_method_path_headers_and_body() {
        let addr = spawn_echo_backend().await;
        let route = route_to(addr, "/add");

        let req = Request::builder()
            .method(Method::POST)
            .uri("http://gateway.local/add?a=1&b=2")
            .header(HOST, "gateway.local")
            .header("x-custom", "one")
            .header("x-custom", "two")
            .body(Full::new(Bytes::from(r#"{"a":1,"b":2}"#)))
            .unwrap();

        let response = forward_request(&ProxyConfig::default(), &route, req, "req-1")
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let headers = response.headers().clone();
        assert_eq!(headers["x-echo-method"], "POST");
        assert_eq!(headers["x-echo-uri"], "/add?a=1&b=2");
        assert_eq!(headers["x-echo-host"], "gateway.local");
        assert_eq!(headers["x-echo-custom-count"], "2");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from(r#"{"a":1,"b":2}"#));
    }

    #[tokio::test]
    async fn test_strip_hop_by_hop_rewrites_host() {
        let addr = spawn_echo_backend().await;
        let route = route_to(addr, "/add");

        let req = Request::builder()
            .method(Method::GET)
            .uri("/add")
            .header(HOST, "gateway.local")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let response = forward_request(&config_with(5_000, true), &route, req, "req-2")
            .await
            .unwrap();

        assert_eq!(response.headers()["x-echo-host"], addr.to_string().as_str());
    }

    #[tokio::test]
    async fn test_body_read_failure_is_not_forwarded() {
        let addr = spawn_echo_backend().await;
        let route = route_to(addr, "/add");

        let frames: Vec<Result<Frame<Bytes>, io::Error>> = vec![
            Ok(Frame::data(Bytes::from("partial"))),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
        ];
        let req = Request::builder()
            .method(Method::POST)
            .uri("/add")
            .body(StreamBody::new(stream::iter(frames)))
            .unwrap();

        let error = forward_request(&ProxyConfig::default(), &route, req, "req-3")
            .await
            .unwrap_err();

        assert!(matches!(error, ProxyError::BodyRead { .. }));
        let response = error_response(&error);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("client went away"));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let route = route_to(addr, "/add");
        let req = Request::builder()
            .uri("/add")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let error = forward_request(&ProxyConfig::default(), &route, req, "req-4")
            .await
            .unwrap_err();

        assert!(matches!(error, ProxyError::UpstreamUnreachable { .. }), "{:?}", error);
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!error.description().is_empty());
    }

    #[tokio::test]
    async fn test_silent_backend_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let route = route_to(addr, "/slow");
        let req = Request::builder()
            .uri("/slow")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let started = Instant::now();
        let error = forward_request(&config_with(200, false), &route, req, "req-5")
            .await
            .unwrap_err();

        assert!(matches!(error, ProxyError::UpstreamTimeout { .. }), "{:?}", error);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_text_response() {
        let response = text_response(StatusCode::NOT_FOUND, "Not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
    }
}
