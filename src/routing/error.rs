use std::fmt;

/// 라우팅 관련 에러를 표현하는 열거형입니다.
///
/// `RouteNotFound`를 제외한 모든 변형은 라우팅 테이블 생성 시점의 설정 오류이며,
/// 게이트웨이 시작을 중단시킵니다.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// 라우트가 존재하지 않는 대상 서버를 참조함
    UnknownTargetServer {
        path: String,
        server: String,
    },
    /// 같은 경로가 두 번 이상 등록됨
    DuplicateRoute {
        path: String,
    },
    /// 같은 이름의 대상 서버가 두 번 이상 정의됨
    DuplicateTargetServer {
        name: String,
    },
    /// 라우트 경로가 '/'로 시작하지 않음
    InvalidRoutePath {
        path: String,
        reason: String,
    },
    /// 대상 서버 URL이 유효하지 않음
    InvalidTargetUrl {
        server: String,
        url: String,
        reason: String,
    },
    /// 요청 경로에 해당하는 라우트가 없음
    RouteNotFound {
        path: String,
    },
}

impl RoutingError {
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, RoutingError::RouteNotFound { .. })
    }
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::UnknownTargetServer { path, server } =>
                write!(f, "라우트 {}가 참조하는 대상 서버 {}를 찾을 수 없음", path, server),
            RoutingError::DuplicateRoute { path } =>
                write!(f, "중복된 라우트 경로: {}", path),
            RoutingError::DuplicateTargetServer { name } =>
                write!(f, "중복된 대상 서버 이름: {}", name),
            RoutingError::InvalidRoutePath { path, reason } =>
                write!(f, "잘못된 라우트 경로: {} ({})", path, reason),
            RoutingError::InvalidTargetUrl { server, url, reason } =>
                write!(f, "대상 서버 {}의 URL {}이 유효하지 않음: {}", server, url, reason),
            RoutingError::RouteNotFound { path } =>
                write!(f, "경로 {}에 대한 라우트를 찾을 수 없음", path),
        }
    }
}

impl std::error::Error for RoutingError {}
