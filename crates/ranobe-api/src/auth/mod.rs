//! 인증 및 권한 부여.
//!
//! JWT 기반 인증과 역할 허용 목록 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenService`]: Access/Refresh Token 발급 및 검증
//! - [`AllowList`]: 엔드포인트별 허용 역할 목록
//! - [`require_auth`]: 인증 미들웨어 ([`CurrentUser`] 주입)
//! - [`require_team_scope`]: 인증 + 팀 범위 미들웨어 ([`CurrentTeams`] 주입)
//! - 비밀번호 해싱 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(CurrentUser(identity): CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", identity.login)
//! }
//! ```

mod jwt;
mod middleware;
mod password;
mod roles;
mod team_scope;

pub use jwt::{AccessClaims, RefreshClaims, TokenError, TokenKind, TokenPair, TokenService};
pub use middleware::{authorize_request, require_auth, AuthGuard, AuthRejection, CurrentUser};
pub use password::{hash_password, verify_credentials, verify_password, PasswordError};
pub use roles::AllowList;
pub use team_scope::{load_team_scope, require_team_scope, CurrentTeams, TeamScopeGuard};
