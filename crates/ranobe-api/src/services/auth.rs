//! 로그인 및 토큰 갱신 서비스.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use ranobe_core::{ServiceError, SessionPolicy};

use crate::auth::{verify_credentials, TokenPair, TokenService};
use crate::error::{ApiError, ApiResult};
use crate::repository::UserRepository;

/// 로그인/토큰 갱신 서비스.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    policy: SessionPolicy,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            users,
            tokens,
            policy,
        }
    }

    /// 로그인 이름과 비밀번호로 토큰 쌍을 발급합니다.
    ///
    /// 사용자가 없거나 비밀번호가 틀리면 같은 `InvalidCredentials`를 반환합니다.
    /// 두 경우 모두 Argon2 검증을 거치며, 검증은 blocking 스레드에서 실행됩니다.
    pub async fn login(
        &self,
        login: &str,
        password: &str,
        is_long_session: bool,
        now: DateTime<Utc>,
    ) -> ApiResult<TokenPair> {
        let user = self.users.find_by_login(login).await?;

        let password = password.to_string();
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = tokio::task::spawn_blocking(move || {
            verify_credentials(&password, stored_hash.as_deref())
        })
        .await
        .map_err(ApiError::internal)??;

        let user = match user {
            Some(user) if verified => user,
            Some(user) => {
                debug!(user_id = user.id, "Login with wrong password");
                return Err(ServiceError::InvalidCredentials.into());
            }
            None => {
                debug!(login, "Login for unknown user");
                return Err(ServiceError::InvalidCredentials.into());
            }
        };

        let pair = self
            .tokens
            .issue_pair(&user.identity(), is_long_session, &self.policy, now)?;

        info!(user_id = user.id, is_long_session, "User logged in");
        Ok(pair)
    }

    /// Refresh Token으로 새 토큰 쌍을 발급합니다.
    ///
    /// 세션 길이는 기존 Refresh Token의 값을 유지하며,
    /// 새 Refresh Token의 만료 시각은 `now` 기준으로 다시 계산됩니다.
    pub async fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> ApiResult<TokenPair> {
        let session = self
            .tokens
            .parse_refresh_token_at(refresh_token, now)
            .ok_or(ServiceError::InvalidCredentials)?;

        // 역할이 바뀌었을 수 있으므로 사용자를 다시 조회
        let user = self
            .users
            .find_by_login(&session.login)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let pair = self.tokens.issue_pair(
            &user.identity(),
            session.is_long_session,
            &self.policy,
            now,
        )?;

        debug!(user_id = user.id, "Token pair refreshed");
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryUserRepository;
    use chrono::Duration;
    use ranobe_core::UserRole;

    async fn service() -> (AuthService, Arc<TokenService>) {
        let users = MemoryUserRepository::new();
        users
            .insert_user(7, "translator", "hunter22", UserRole::Editor)
            .await
            .unwrap();

        let tokens = Arc::new(TokenService::new(b"auth-service-secret", Duration::minutes(15)));
        let service = AuthService::new(Arc::new(users), tokens.clone(), SessionPolicy::default());
        (service, tokens)
    }

    #[tokio::test]
    async fn test_login_issues_parsable_access_token() {
        let (service, tokens) = service().await;
        let now = Utc::now();

        let pair = service.login("translator", "hunter22", false, now).await.unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 15 * 60);

        let identity = tokens.parse_access_token_at(&pair.access_token, now).unwrap();
        assert_eq!(identity.user_id, 7);
        assert_eq!(identity.role, UserRole::Editor);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let (service, _) = service().await;
        let now = Utc::now();

        let wrong = service.login("translator", "nope", false, now).await.unwrap_err();
        let unknown = service.login("ghost", "hunter22", false, now).await.unwrap_err();

        for err in [wrong, unknown] {
            assert!(matches!(
                err,
                ApiError::Service(ServiceError::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn test_long_session_refresh_window() {
        let (service, _) = service().await;
        let now = Utc::now();

        let pair = service.login("translator", "hunter22", true, now).await.unwrap();

        let refreshed = service
            .refresh(&pair.refresh_token, now + Duration::days(29))
            .await;
        assert!(refreshed.is_ok());

        let expired = service
            .refresh(&pair.refresh_token, now + Duration::days(31))
            .await;
        assert!(matches!(
            expired,
            Err(ApiError::Service(ServiceError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_access_token_cannot_refresh() {
        let (service, _) = service().await;
        let now = Utc::now();

        let pair = service.login("translator", "hunter22", true, now).await.unwrap();
        assert!(service.refresh(&pair.access_token, now).await.is_err());
    }
}
