//! JWT 토큰 처리.
//!
//! Access Token 및 Refresh Token 생성/검증 로직.
//!
//! 서명 키는 시작 시 한 번 로드되어 [`TokenService`]에 보관되며,
//! 이후 모든 요청에서 읽기 전용으로 공유됩니다.
//!
//! 파싱 실패(형식 오류, 서명 불일치, 만료, 토큰 종류 불일치)는 모두
//! `None` 하나로 합쳐집니다. 호출자는 `None`을 "인증되지 않음"으로만
//! 취급해야 하며, 구체적인 원인은 debug 로그에만 남습니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ranobe_core::{AuthConfig, Identity, RefreshSession, SessionPolicy, UserRole};

/// 토큰 종류.
///
/// Access Token과 Refresh Token을 서로 대신 사용할 수 없도록 구분합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// 로그인 이름
    pub login: String,
    /// 사용자 역할
    pub role: UserRole,
    /// 토큰 종류 (항상 "access")
    pub typ: TokenKind,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    fn new(identity: &Identity, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: identity.user_id.to_string(),
            login: identity.login.clone(),
            role: identity.role,
            typ: TokenKind::Access,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// `sub`가 숫자 사용자 ID가 아니면 `InvalidClaims`.
    fn into_identity(self) -> Result<Identity, TokenError> {
        let user_id = self.sub.parse().map_err(|_| TokenError::InvalidClaims)?;
        Ok(Identity::new(user_id, self.login, self.role))
    }
}

/// Refresh Token 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject - 로그인 이름
    pub sub: String,
    /// 장기 세션 여부
    pub long: bool,
    /// 토큰 종류 (항상 "refresh")
    pub typ: TokenKind,
    /// Issued At
    pub iat: i64,
    /// Expiration
    pub exp: i64,
    /// JWT ID
    pub jti: String,
}

/// 만료 시각과 종류를 가진 클레임.
trait TokenClaims: DeserializeOwned {
    fn kind(&self) -> TokenKind;
    fn expires_at(&self) -> i64;
}

impl TokenClaims for AccessClaims {
    fn kind(&self) -> TokenKind {
        self.typ
    }
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl TokenClaims for RefreshClaims {
    fn kind(&self) -> TokenKind {
        self.typ
    }
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Access Token + Refresh Token 페어.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Access Token
    pub access_token: String,
    /// Refresh Token
    pub refresh_token: String,
    /// Access Token 만료 시간 (초)
    pub expires_in: i64,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패: {0}")]
    Decoding(#[source] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("토큰 종류가 올바르지 않습니다 (기대: {expected:?})")]
    WrongKind { expected: TokenKind },
    #[error("토큰 클레임이 올바르지 않습니다")]
    InvalidClaims,
}

/// Access/Refresh Token 발급 및 검증 서비스.
///
/// 프로세스 전역에서 `Arc`로 공유되며 생성 이후 변경되지 않습니다.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// 새 토큰 서비스 생성.
    ///
    /// # Arguments
    ///
    /// * `secret` - HS256 서명 키
    /// * `access_ttl` - Access Token 수명
    pub fn new(secret: &[u8], access_ttl: Duration) -> Self {
        // 만료는 호출자가 지정한 기준 시각으로 직접 검사한다
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
        }
    }

    /// 인증 설정에서 생성.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.expose_secret().as_bytes(),
            config.access_token_ttl(),
        )
    }

    /// Access Token 수명.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// 현재 시각 기준으로 Access Token 생성.
    pub fn generate_access_token(&self, identity: &Identity) -> Result<String, TokenError> {
        self.generate_access_token_at(identity, Utc::now())
    }

    /// 지정한 발급 시각으로 Access Token 생성.
    ///
    /// 같은 식별 정보와 발급 시각이면 항상 같은 토큰이 생성됩니다.
    pub fn generate_access_token_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = AccessClaims::new(identity, issued_at, self.access_ttl);
        self.sign(&claims)
    }

    /// Refresh Token 생성.
    ///
    /// # Arguments
    ///
    /// * `session` - 세션 정보
    /// * `expires_at` - 호출자가 세션 정책에 따라 계산한 만료 시각
    pub fn generate_refresh_token(
        &self,
        session: &RefreshSession,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.generate_refresh_token_at(session, Utc::now(), expires_at)
    }

    /// 지정한 발급 시각으로 Refresh Token 생성.
    pub fn generate_refresh_token_at(
        &self,
        session: &RefreshSession,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = RefreshClaims {
            sub: session.login.clone(),
            long: session.is_long_session,
            typ: TokenKind::Refresh,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        self.sign(&claims)
    }

    /// Access Token + Refresh Token 쌍 생성.
    ///
    /// Refresh Token 만료 시각은 `policy`와 세션 길이로 결정됩니다.
    pub fn issue_pair(
        &self,
        identity: &Identity,
        is_long_session: bool,
        policy: &SessionPolicy,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, TokenError> {
        let session = RefreshSession::new(identity.login.clone(), is_long_session);
        let access_token = self.generate_access_token_at(identity, now)?;
        let refresh_token =
            self.generate_refresh_token_at(&session, now, session.expires_at(now, policy))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl.num_seconds(),
            token_type: "Bearer".to_string(),
        })
    }

    /// Access Token 검증 (현재 시각 기준).
    ///
    /// 검증에 실패하면 이유와 관계없이 `None`을 반환합니다.
    pub fn parse_access_token(&self, token: &str) -> Option<Identity> {
        self.parse_access_token_at(token, Utc::now())
    }

    /// Access Token 검증 (지정 시각 기준).
    pub fn parse_access_token_at(&self, token: &str, now: DateTime<Utc>) -> Option<Identity> {
        self.verify::<AccessClaims>(token, TokenKind::Access, now)
            .and_then(AccessClaims::into_identity)
            .inspect_err(log_rejection)
            .ok()
    }

    /// Refresh Token 검증 (현재 시각 기준).
    pub fn parse_refresh_token(&self, token: &str) -> Option<RefreshSession> {
        self.parse_refresh_token_at(token, Utc::now())
    }

    /// Refresh Token 검증 (지정 시각 기준).
    pub fn parse_refresh_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Option<RefreshSession> {
        self.verify::<RefreshClaims>(token, TokenKind::Refresh, now)
            .map(|claims| RefreshSession::new(claims.sub, claims.long))
            .inspect_err(log_rejection)
            .ok()
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// 서명, 종류, 만료를 순서대로 검증합니다.
    fn verify<T: TokenClaims>(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<T, TokenError> {
        let claims = decode::<T>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Decoding)?
            .claims;

        if claims.kind() != expected {
            Err(TokenError::WrongKind { expected })
        } else if claims.expires_at() <= now.timestamp() {
            Err(TokenError::Expired)
        } else {
            Ok(claims)
        }
    }
}

fn log_rejection(error: &TokenError) {
    debug!(error = %error, "Token rejected");
}
