use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::routing::{ResolvedRoute, RoutingError};
use crate::settings::{Route, TargetServer};

/// 요청 경로와 `ResolvedRoute`의 정확 일치 테이블입니다.
///
/// `build`로만 만들어지고 이후에는 변경 메서드가 없습니다.
/// 서버 시작 전에 완성되어 `Arc`로 모든 요청 처리 태스크가 잠금 없이 공유합니다.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, ResolvedRoute>,
}

impl RouteTable {
    /// 설정의 라우트 목록과 대상 서버 목록으로 라우팅 테이블을 만듭니다.
    ///
    /// 하나라도 잘못된 라우트가 있으면 테이블 없이 에러를 반환합니다.
    ///
    /// # 예제
    ///
    /// ```
    /// use api_gateway::routing::RouteTable;
    /// use api_gateway::settings::{Route, TargetServer};
    ///
    /// let targets = vec![TargetServer::new("calc", "http://127.0.0.1:9000")];
    /// let routes = vec![Route::new("/add", "calc")];
    ///
    /// let table = RouteTable::build(&routes, &targets).unwrap();
    /// let route = table.lookup("/add").unwrap();
    /// assert_eq!(route.backend_base_url(), "http://127.0.0.1:9000");
    /// assert!(table.lookup("/add/").is_none());
    /// ```
    pub fn build(routes: &[Route], targets: &[TargetServer]) -> Result<Self, RoutingError> {
        let mut target_names = HashSet::new();
        for target in targets {
            if !target_names.insert(target.name.as_str()) {
                return Err(RoutingError::DuplicateTargetServer {
                    name: target.name.clone(),
                });
            }
        }

        let mut table = HashMap::with_capacity(routes.len());
        for route in routes {
            let target = targets
                .iter()
                .find(|target| target.name == route.server)
                .ok_or_else(|| RoutingError::UnknownTargetServer {
                    path: route.path.clone(),
                    server: route.server.clone(),
                })?;

            if table.contains_key(&route.path) {
                return Err(RoutingError::DuplicateRoute {
                    path: route.path.clone(),
                });
            }

            let resolved = ResolvedRoute::resolve(route, target)?;
            info!(
                path = %resolved.path(),
                target = %resolved.backend_base_url(),
                methods = ?resolved.methods(),
                "라우트 추가"
            );
            table.insert(route.path.clone(), resolved);
        }

        debug!(routes = table.len(), "라우팅 테이블 생성 완료");
        Ok(Self { routes: table })
    }

    /// 경로와 정확히 일치하는 라우트를 찾습니다. 쿼리 문자열은 포함하지 않아야 합니다.
    pub fn lookup(&self, path: &str) -> Option<&ResolvedRoute> {
        self.routes.get(path)
    }

    /// HTTP 요청의 경로로 라우트를 찾습니다. 실패 시 항상 `RouteNotFound`입니다.
    pub fn route_request<B>(&self, req: &hyper::Request<B>) -> Result<&ResolvedRoute, RoutingError> {
        let path = req.uri().path();
        match self.lookup(path) {
            Some(route) => {
                debug!(path = %path, target = %route.target_name(), "라우트 찾음");
                Ok(route)
            }
            None => {
                warn!(path = %path, "라우트를 찾을 수 없음");
                Err(RoutingError::RouteNotFound {
                    path: path.to_string(),
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// 등록된 경로 목록 (정렬됨)
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}
