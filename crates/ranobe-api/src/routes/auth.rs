//! 인증 endpoint.
//!
//! - `POST /api/v1/auth/login` - 로그인 (토큰 쌍 발급)
//! - `POST /api/v1/auth/refresh` - Refresh Token으로 토큰 쌍 재발급
//! - `GET /api/v1/auth/me` - 현재 사용자 정보

use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use ranobe_core::Identity;

use crate::auth::{require_auth, AllowList, AuthGuard, CurrentUser, TokenPair};
use crate::error::ApiResult;
use crate::state::AppState;
use crate::validation::ValidatedJson;

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64, message = "로그인 이름은 1-64자여야 합니다"))]
    pub login: String,
    #[validate(length(min = 1, message = "비밀번호를 입력해야 합니다"))]
    pub password: String,
    /// "로그인 유지" 여부
    #[serde(default)]
    pub is_long_session: bool,
}

/// 토큰 갱신 요청.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh Token을 입력해야 합니다"))]
    pub refresh_token: String,
}

/// 로그인.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = state
        .auth_service()
        .login(
            &request.login,
            &request.password,
            request.is_long_session,
            chrono::Utc::now(),
        )
        .await?;

    Ok(Json(pair))
}

/// 토큰 갱신.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = state
        .auth_service()
        .refresh(&request.refresh_token, chrono::Utc::now())
        .await?;

    Ok(Json(pair))
}

/// 현재 사용자 정보.
///
/// GET /api/v1/auth/me
pub async fn me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}

/// 인증 라우터 생성.
pub fn auth_router(state: &AppState) -> Router<Arc<AppState>> {
    let guard = AuthGuard::new(state.tokens.clone(), AllowList::ANY);

    Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(guard, require_auth))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}
