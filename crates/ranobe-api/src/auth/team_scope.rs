//! 팀 범위 로딩.
//!
//! 인증된 사용자가 속한 모든 팀을 요청 단위로 한 번 로드합니다.
//! 인증 단계와의 순서 의존성은 [`require_team_scope`]가 두 단계를
//! 직접 합성하여 처리합니다. 인증 결과 없이 팀 범위를 로드할 수 있는
//! 경로는 없습니다.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use ranobe_core::{Identity, TeamScope};

use super::middleware::{AuthGuard, CurrentUser};
use crate::error::ApiError;
use crate::repository::{RepositoryError, TeamRepository};

/// 사용자가 속한 모든 팀을 로드합니다 (역할 무관, 저장소 순서 유지).
pub async fn load_team_scope(
    identity: &Identity,
    teams: &dyn TeamRepository,
) -> Result<TeamScope, RepositoryError> {
    let summaries = teams.teams_for_user(identity.user_id).await?;
    Ok(TeamScope::new(summaries))
}

/// 팀 범위 미들웨어 상태.
#[derive(Clone)]
pub struct TeamScopeGuard {
    auth: AuthGuard,
    teams: Arc<dyn TeamRepository>,
}

impl TeamScopeGuard {
    pub fn new(auth: AuthGuard, teams: Arc<dyn TeamRepository>) -> Self {
        Self { auth, teams }
    }
}

/// 인증 후 팀 범위까지 로드하는 미들웨어.
///
/// [`CurrentUser`]와 [`CurrentTeams`]를 모두 extension에 넣습니다.
pub async fn require_team_scope(
    State(guard): State<TeamScopeGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match guard.auth.authorize(request.headers()) {
        Ok(identity) => identity,
        Err(rejection) => return rejection.into_response(),
    };

    let scope = match load_team_scope(&identity, guard.teams.as_ref()).await {
        Ok(scope) => scope,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let extensions = request.extensions_mut();
    extensions.insert(CurrentUser(identity));
    extensions.insert(CurrentTeams(scope));

    next.run(request).await
}

/// 요청자 팀 범위 추출기.
///
/// [`require_team_scope`]가 먼저 실행된 라우트에서만 사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct CurrentTeams(pub TeamScope);

impl<S> FromRequestParts<S> for CurrentTeams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentTeams>()
            .cloned()
            .ok_or_else(|| {
                ApiError::internal(anyhow::anyhow!(
                    "CurrentTeams requested on {} without team scope middleware",
                    parts.uri.path()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AllowList, TokenService};
    use crate::repository::MemoryTeamRepository;
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Json, Router,
    };
    use chrono::Duration;
    use ranobe_core::{TeamRole, TeamSummary, UserRole};
    use tower::ServiceExt;

    async fn repo() -> Arc<MemoryTeamRepository> {
        let repo = MemoryTeamRepository::new();
        repo.insert_team(TeamSummary::new(5, "Sakura", None), 100).await;
        repo.insert_team(TeamSummary::new(7, "Elsewhere", None), 101).await;
        repo.insert_team(TeamSummary::new(9, "Moonlight", None), 102).await;
        repo.insert_member(5, 42, TeamRole::Translator).await;
        repo.insert_member(9, 42, TeamRole::Standard).await;
        Arc::new(repo)
    }

    #[tokio::test]
    async fn test_load_team_scope_all_memberships_in_order() {
        let repo = repo().await;
        let identity = Identity::new(42, "translator", UserRole::User);

        let scope = load_team_scope(&identity, repo.as_ref()).await.unwrap();
        assert_eq!(scope.team_ids(), vec![5, 9]);
    }

    #[tokio::test]
    async fn test_load_team_scope_no_teams() {
        let repo = repo().await;
        let identity = Identity::new(7, "lonely", UserRole::User);

        let scope = load_team_scope(&identity, repo.as_ref()).await.unwrap();
        assert!(scope.is_empty());
    }

    #[tokio::test]
    async fn test_middleware_attaches_scope() {
        let tokens = Arc::new(TokenService::new(b"scope-secret", Duration::minutes(15)));
        let guard = TeamScopeGuard::new(
            AuthGuard::new(tokens.clone(), AllowList::ANY),
            repo().await,
        );

        async fn mine(CurrentTeams(scope): CurrentTeams) -> Json<Vec<i64>> {
            Json(scope.team_ids())
        }

        let router = Router::new()
            .route("/mine", get(mine))
            .route_layer(middleware::from_fn_with_state(guard, require_team_scope));

        let token = tokens
            .generate_access_token(&Identity::new(42, "translator", UserRole::User))
            .unwrap();
        let response = router
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .uri("/mine")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let ids: Vec<i64> = serde_json::from_slice(&body).unwrap();
        assert_eq!(ids, vec![5, 9]);

        // 인증 실패 시 팀 범위 로드 전에 거부
        let response = router
            .oneshot(HttpRequest::builder().uri("/mine").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
