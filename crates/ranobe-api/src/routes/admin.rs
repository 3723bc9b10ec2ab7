//! 운영자용 endpoint.
//!
//! `Moderator`와 `Admin` 전역 역할만 접근할 수 있습니다.
//!
//! - `GET /api/v1/admin/teams/{team_id}/members` - 팀 멤버 전체 조회

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    middleware,
    routing::get,
    Json, Router,
};

use ranobe_core::{TeamMember, UserRole};

use crate::auth::{require_auth, AllowList, AuthGuard};
use crate::error::ApiResult;
use crate::state::AppState;

/// 운영자 라우트 허용 역할.
pub const ADMIN_ROLES: AllowList = AllowList::only(&[UserRole::Moderator, UserRole::Admin]);

/// 팀 멤버 전체 조회.
///
/// GET /api/v1/admin/teams/{team_id}/members
pub async fn team_members(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    let members = state.team_service().members(team_id).await?;
    Ok(Json(members))
}

/// 운영자 라우터 생성.
pub fn admin_router(state: &AppState) -> Router<Arc<AppState>> {
    let guard = AuthGuard::new(state.tokens.clone(), ADMIN_ROLES);

    Router::new()
        .route("/teams/{team_id}/members", get(team_members))
        .route_layer(middleware::from_fn_with_state(guard, require_auth))
}
