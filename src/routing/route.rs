use hyper::Uri;
use url::Url;

use crate::routing::RoutingError;
use crate::settings::{Route, TargetServer};

/// 대상 서버 이름이 실제 URL로 치환된 라우트입니다.
///
/// 라우팅 테이블 생성 과정에서만 만들어지므로, 보관된 기본 URL은
/// 항상 호스트가 있는 절대 `http` URL입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    path: String,
    target_name: String,
    backend_base_url: String,
    methods: Vec<String>,
}

impl ResolvedRoute {
    pub(crate) fn resolve(route: &Route, target: &TargetServer) -> Result<Self, RoutingError> {
        validate_route_path(&route.path)?;
        let backend_base_url = validate_base_url(target)?;

        Ok(Self {
            path: route.path.clone(),
            target_name: target.name.clone(),
            backend_base_url,
            methods: route.methods.clone(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// 끝의 '/'가 제거된 백엔드 기본 URL
    pub fn backend_base_url(&self) -> &str {
        &self.backend_base_url
    }

    /// 설정에 적힌 메서드 목록. 매칭에는 쓰이지 않습니다.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// 원래 요청의 경로와 쿼리를 기본 URL 뒤에 붙인 전달 주소를 만듭니다.
    pub fn target_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.backend_base_url, path_and_query)
    }
}

fn validate_route_path(path: &str) -> Result<(), RoutingError> {
    if !path.starts_with('/') {
        return Err(RoutingError::InvalidRoutePath {
            path: path.to_string(),
            reason: "경로는 '/'로 시작해야 합니다".to_string(),
        });
    }
    Ok(())
}

fn validate_base_url(target: &TargetServer) -> Result<String, RoutingError> {
    let invalid = |reason: &str| RoutingError::InvalidTargetUrl {
        server: target.name.clone(),
        url: target.url.clone(),
        reason: reason.to_string(),
    };

    let trimmed = target.url.trim();
    if trimmed.is_empty() {
        return Err(invalid("URL이 비어 있음"));
    }

    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    // 전달 클라이언트는 평문 HTTP 커넥터만 가지므로 https 대상은 받지 않습니다.
    if parsed.scheme() != "http" {
        return Err(invalid("http 스킴만 지원합니다 (https 대상은 지원하지 않음)"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("호스트가 없음"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("쿼리나 프래그먼트를 포함할 수 없습니다"));
    }

    // 공백, IDN 호스트 등은 `Url`이 퍼센트/퓨니코드 인코딩한 형태로 보관합니다.
    let base = parsed.as_str().trim_end_matches('/').to_string();
    format!("{}/", base)
        .parse::<Uri>()
        .map_err(|e| invalid(&e.to_string()))?;

    Ok(base)
}
