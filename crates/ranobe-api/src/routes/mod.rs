//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/auth` - 로그인, 토큰 갱신, 현재 사용자
//! - `/api/v1/teams` - 팀 관리 (팀 범위 필요)
//! - `/api/v1/admin` - 운영자 전용

pub mod admin;
pub mod auth;
pub mod health;
pub mod teams;

pub use admin::{admin_router, ADMIN_ROLES};
pub use auth::{auth_router, LoginRequest, RefreshRequest};
pub use health::{health_router, HealthResponse};
pub use teams::{teams_router, ChangeRoleRequest, UpdateTeamRequest};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 인증 미들웨어가 토큰 서비스와 저장소를 필요로 하므로 상태를 받아 구성합니다.
pub fn create_api_router(state: &AppState) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/auth", auth_router(state))
        .nest("/api/v1/teams", teams_router(state))
        .nest("/api/v1/admin", admin_router(state))
}
