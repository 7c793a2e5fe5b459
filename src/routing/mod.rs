//! 경로 기반 라우팅을 위한 핵심 기능을 제공하는 모듈입니다.

mod error;
mod route;
mod table;

pub use error::RoutingError;
pub use route::ResolvedRoute;
pub use table::RouteTable;
