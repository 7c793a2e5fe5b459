//! API Gateway는 경로 기반 라우팅을 지원하는 단일 홉 리버스 프록시입니다.
//!
//! # 주요 기능
//!
//! - 정확한 경로 일치 라우팅
//! - 이름으로 참조하는 백엔드 서버
//! - 요청/응답 헤더와 본문의 그대로 전달
//! - 에러 처리 및 로깅
//!
//! # 예제
//!
//! ```
//! use api_gateway::routing::RouteTable;
//! use api_gateway::settings::{Route, TargetServer};
//!
//! let targets = vec![
//!     TargetServer::new("calc", "http://calc-server:8080"),
//!     TargetServer::new("users", "http://user-service:9000/"),
//! ];
//! let routes = vec![
//!     Route::new("/add", "calc").with_methods(["POST"]),
//!     Route::new("/users", "users"),
//! ];
//!
//! let table = RouteTable::build(&routes, &targets).unwrap();
//! assert_eq!(
//!     table.lookup("/users").unwrap().target_url("/users?page=2"),
//!     "http://user-service:9000/users?page=2"
//! );
//! assert!(table.lookup("/Users").is_none());
//! ```
//!
//! # 설정 오류
//!
//! 존재하지 않는 대상 서버를 참조하는 라우트가 있으면 테이블이 만들어지지 않습니다.
//!
//! ```
//! use api_gateway::routing::{RouteTable, RoutingError};
//! use api_gateway::settings::{Route, TargetServer};
//!
//! let targets = vec![TargetServer::new("calc", "http://calc-server:8080")];
//! let routes = vec![Route::new("/add", "math")];
//!
//! let error = RouteTable::build(&routes, &targets).unwrap_err();
//! assert!(matches!(error, RoutingError::UnknownTargetServer { .. }));
//! assert!(error.is_configuration_error());
//! ```

pub mod logging;
pub mod proxy;
pub mod routing;
pub mod server;
pub mod settings;
