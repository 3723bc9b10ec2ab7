//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 설정은 프로세스 시작 시 한 번만 로드되며 이후 읽기 전용으로 공유됩니다.

use chrono::Duration;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 인증/세션 설정
    pub auth: AuthConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 연결 URL (`postgres://...`)
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 10,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 인증/세션 설정.
///
/// 서명 키와 토큰 수명은 시작 시 한 번 로드되고 이후 변경되지 않습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 서명 키
    pub jwt_secret: SecretString,
    /// Access Token 수명 (분)
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: i64,
    /// 장기 세션 Refresh Token 수명 (일)
    #[serde(default = "default_long_session_days")]
    pub long_session_days: i64,
    /// 단기 세션 Refresh Token 수명 (분)
    #[serde(default = "default_short_session_minutes")]
    pub short_session_minutes: i64,
}

fn default_access_token_minutes() -> i64 {
    15
}
fn default_long_session_days() -> i64 {
    30
}
fn default_short_session_minutes() -> i64 {
    30
}

impl AuthConfig {
    /// 서명 키만 지정하고 나머지는 기본값을 사용합니다.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        let secret: String = secret.into();
        Self {
            jwt_secret: SecretString::new(secret.into_boxed_str()),
            access_token_minutes: default_access_token_minutes(),
            long_session_days: default_long_session_days(),
            short_session_minutes: default_short_session_minutes(),
        }
    }

    /// Access Token 수명.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_minutes)
    }

    /// Refresh 세션 수명 정책.
    pub fn session_policy(&self) -> crate::SessionPolicy {
        crate::SessionPolicy {
            long: Duration::days(self.long_session_days),
            short: Duration::minutes(self.short_session_minutes),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("RANOBE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_auth_config_defaults() {
        let auth = AuthConfig::with_secret("secret");

        assert_eq!(auth.jwt_secret.expose_secret(), "secret");
        assert_eq!(auth.access_token_ttl(), Duration::minutes(15));

        let policy = auth.session_policy();
        assert_eq!(policy.long, Duration::days(30));
        assert_eq!(policy.short, Duration::minutes(30));
    }

    #[test]
    fn test_auth_config_deserialize() {
        let json = r#"{"jwt_secret": "abc", "access_token_minutes": 5}"#;
        let auth: AuthConfig = serde_json::from_str(json).unwrap();

        assert_eq!(auth.access_token_minutes, 5);
        assert_eq!(auth.long_session_days, 30);
        assert_eq!(auth.jwt_secret.expose_secret(), "abc");
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let auth = AuthConfig::with_secret("super-secret-value");
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("super-secret-value"));
    }
}
