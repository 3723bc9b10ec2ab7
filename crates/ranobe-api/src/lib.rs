//! REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT Access/Refresh Token 세션
//! - 역할 허용 목록과 팀 범위 기반 인가
//! - 에러 → HTTP 응답 매핑
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 인증 및 권한 관리
//! - [`repository`]: 사용자/팀 저장소
//! - [`services`]: 로그인 및 팀 관리 로직
//! - [`middleware`]: 요청 로깅 및 패닉 처리
//! - [`validation`]: 요청 본문 검증

pub mod auth;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// 전체 애플리케이션 라우터 생성.
///
/// 레이어는 바깥쪽부터 요청 로깅, 트레이싱, 타임아웃, 패닉 처리 순으로 적용됩니다.
pub fn create_app(state: Arc<AppState>, request_timeout: Duration) -> Router {
    create_api_router(&state)
        .with_state(state)
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(middleware::request_logging))
}
