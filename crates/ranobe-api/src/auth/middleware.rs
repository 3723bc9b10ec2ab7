//! Axum용 인증 미들웨어.
//!
//! 요청 하나에 대한 인증 판정은 다음 순서로 진행됩니다.
//!
//! 1. `Authorization` 헤더가 없거나 Bearer 형식이 아니면 401
//! 2. Access Token 검증에 실패하면 401
//! 3. 허용 목록이 비어 있지 않고 역할이 목록에 없으면 403
//! 4. 통과하면 [`CurrentUser`]를 요청 extension에 넣고 다음 핸들러 실행
//!
//! 판정 로직은 [`authorize_request`]에 순수 함수로 분리되어 있으며,
//! [`require_auth`] 미들웨어는 이를 라우터에 연결하기만 합니다.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use ranobe_core::Identity;

use super::{AllowList, TokenService};
use crate::error::{ApiError, ApiErrorResponse};

/// 인증 거부 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("권한이 부족합니다")]
    InsufficientRole,
}

impl AuthRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthRejection::MissingToken | AuthRejection::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthRejection::InsufficientRole => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Authorization 헤더에서 Bearer 토큰 추출.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// 요청 헤더로 인증/인가를 판정합니다.
///
/// 역할 판정은 서열이 아니라 허용 목록 포함 여부로만 결정됩니다.
pub fn authorize_request(
    headers: &HeaderMap,
    tokens: &TokenService,
    allow: AllowList,
) -> Result<Identity, AuthRejection> {
    let token = extract_bearer(headers).ok_or(AuthRejection::MissingToken)?;

    let identity = tokens
        .parse_access_token(token)
        .ok_or(AuthRejection::InvalidToken)?;

    if !allow.permits(identity.role) {
        debug!(
            user_id = identity.user_id,
            role = %identity.role,
            "Role not in allow-list"
        );
        return Err(AuthRejection::InsufficientRole);
    }

    Ok(identity)
}

/// 인증 미들웨어 상태.
///
/// 라우트 그룹마다 허용 목록을 달리하여 생성합니다.
#[derive(Clone)]
pub struct AuthGuard {
    tokens: Arc<TokenService>,
    allow: AllowList,
}

impl AuthGuard {
    pub fn new(tokens: Arc<TokenService>, allow: AllowList) -> Self {
        Self { tokens, allow }
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<Identity, AuthRejection> {
        authorize_request(headers, &self.tokens, self.allow)
    }
}

/// 인증 미들웨어.
///
/// # 사용 예시
///
/// ```rust,ignore
/// let guard = AuthGuard::new(state.tokens.clone(), AllowList::ANY);
/// Router::new()
///     .route("/me", get(me))
///     .route_layer(axum::middleware::from_fn_with_state(guard, require_auth));
/// ```
pub async fn require_auth(
    State(guard): State<AuthGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let identity = guard.authorize(request.headers())?;
    request.extensions_mut().insert(CurrentUser(identity));
    Ok(next.run(request).await)
}

/// 인증된 사용자 추출기.
///
/// [`require_auth`]가 먼저 실행된 라우트에서만 사용할 수 있습니다.
/// extension이 없으면 라우터 구성 오류이므로 500으로 응답합니다.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                ApiError::internal(anyhow::anyhow!(
                    "CurrentUser requested on {} without authentication middleware",
                    parts.uri.path()
                ))
            })
    }
}
