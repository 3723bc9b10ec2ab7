//! 팀 endpoint.
//!
//! 모든 라우트는 인증과 팀 범위 로딩을 거칩니다.
//!
//! - `GET /api/v1/teams/mine` - 내가 속한 팀 목록
//! - `PUT /api/v1/teams/{team_id}` - 팀 정보 수정
//! - `PUT /api/v1/teams/{team_id}/members/{user_id}/role` - 멤버 역할 변경
//! - `DELETE /api/v1/teams/{team_id}/members/{user_id}` - 멤버 제거

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, put},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use ranobe_core::{TeamMember, TeamRole, TeamScope, TeamSummary};

use crate::auth::{
    require_team_scope, AllowList, AuthGuard, CurrentTeams, CurrentUser, TeamScopeGuard,
};
use crate::error::ApiResult;
use crate::state::AppState;
use crate::validation::ValidatedJson;

/// 팀 정보 수정 요청.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 100, message = "팀 이름은 1-100자여야 합니다"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "팀 설명은 1000자 이하여야 합니다"))]
    pub description: Option<String>,
}

/// 멤버 역할 변경 요청.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    pub role: TeamRole,
}

/// 내가 속한 팀 목록.
///
/// GET /api/v1/teams/mine
pub async fn my_teams(CurrentTeams(scope): CurrentTeams) -> Json<TeamScope> {
    Json(scope)
}

/// 팀 정보 수정.
///
/// PUT /api/v1/teams/{team_id}
pub async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
    CurrentUser(identity): CurrentUser,
    CurrentTeams(scope): CurrentTeams,
    ValidatedJson(request): ValidatedJson<UpdateTeamRequest>,
) -> ApiResult<Json<TeamSummary>> {
    scope.ensure_member_of(team_id)?;

    let updated = state
        .team_service()
        .update_team(
            &identity,
            team_id,
            &request.name,
            request.description.as_deref(),
        )
        .await?;

    Ok(Json(updated))
}

/// 멤버 역할 변경.
///
/// PUT /api/v1/teams/{team_id}/members/{user_id}/role
pub async fn change_member_role(
    State(state): State<Arc<AppState>>,
    Path((team_id, user_id)): Path<(i64, i64)>,
    CurrentUser(identity): CurrentUser,
    CurrentTeams(scope): CurrentTeams,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<TeamMember>> {
    scope.ensure_member_of(team_id)?;

    let member = state
        .team_service()
        .change_member_role(&identity, team_id, user_id, request.role)
        .await?;

    Ok(Json(member))
}

/// 멤버 제거.
///
/// DELETE /api/v1/teams/{team_id}/members/{user_id}
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path((team_id, user_id)): Path<(i64, i64)>,
    CurrentUser(identity): CurrentUser,
    CurrentTeams(scope): CurrentTeams,
) -> ApiResult<StatusCode> {
    scope.ensure_member_of(team_id)?;

    state
        .team_service()
        .remove_member(&identity, team_id, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// 팀 라우터 생성.
pub fn teams_router(state: &AppState) -> Router<Arc<AppState>> {
    let guard = TeamScopeGuard::new(
        AuthGuard::new(state.tokens.clone(), AllowList::ANY),
        state.teams.clone(),
    );

    Router::new()
        .route("/mine", get(my_teams))
        .route("/{team_id}", put(update_team))
        .route("/{team_id}/members/{user_id}/role", put(change_member_role))
        .route("/{team_id}/members/{user_id}", delete(remove_member))
        .route_layer(middleware::from_fn_with_state(guard, require_team_scope))
}
