//! 인증된 사용자 식별 정보와 Refresh 세션.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::UserRole;

/// Access Token에 담기는 사용자 식별 정보.
///
/// 발급 후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// 사용자 ID
    pub user_id: i64,
    /// 로그인 이름
    pub login: String,
    /// 전역 역할
    pub role: UserRole,
}

impl Identity {
    pub fn new(user_id: i64, login: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id,
            login: login.into(),
            role,
        }
    }
}

/// Refresh Token에 담기는 세션 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSession {
    /// 로그인 이름
    pub login: String,
    /// 장기 세션 여부 ("로그인 유지")
    pub is_long_session: bool,
}

impl RefreshSession {
    pub fn new(login: impl Into<String>, is_long_session: bool) -> Self {
        Self {
            login: login.into(),
            is_long_session,
        }
    }

    /// 정책에 따른 만료 시각.
    pub fn expires_at(&self, issued_at: DateTime<Utc>, policy: &SessionPolicy) -> DateTime<Utc> {
        issued_at + policy.lifetime(self.is_long_session)
    }
}

/// Refresh 세션 수명 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// 장기 세션 수명
    pub long: Duration,
    /// 단기 세션 수명
    pub short: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            long: Duration::days(30),
            short: Duration::minutes(30),
        }
    }
}

impl SessionPolicy {
    pub fn lifetime(&self, is_long_session: bool) -> Duration {
        if is_long_session {
            self.long
        } else {
            self.short
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry_by_length() {
        let now = Utc::now();
        let policy = SessionPolicy::default();

        let long = RefreshSession::new("reader", true);
        let short = RefreshSession::new("reader", false);

        assert_eq!(long.expires_at(now, &policy), now + Duration::days(30));
        assert_eq!(short.expires_at(now, &policy), now + Duration::minutes(30));
    }

    #[test]
    fn test_identity_serialization() {
        let identity = Identity::new(7, "translator", UserRole::Editor);
        let json = serde_json::to_value(&identity).unwrap();

        assert_eq!(json["userId"], 7);
        assert_eq!(json["login"], "translator");
        assert_eq!(json["role"], "editor");
    }
}
