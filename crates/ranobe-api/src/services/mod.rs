//! 서비스 계층.
//!
//! 라우트 핸들러와 저장소 사이의 도메인 로직을 담당합니다.

pub mod auth;
pub mod teams;

pub use auth::AuthService;
pub use teams::TeamService;
