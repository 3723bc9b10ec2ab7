//! User Repository
//!
//! 로그인에 필요한 사용자 조회를 담당합니다.
//!
//! 사용 테이블: `users (id, login, password_hash, role)`

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use ranobe_core::{Identity, UserRole};

use super::RepositoryError;

/// 로그인용 사용자 레코드.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub login: String,
    /// Argon2 PHC 형식 해시
    pub password_hash: String,
    pub role: UserRole,
}

impl UserRecord {
    /// 토큰에 담을 식별 정보.
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.login.clone(), self.role)
    }
}

/// 사용자 저장소.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 로그인 이름으로 사용자 조회 (대소문자 구분 없음).
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, RepositoryError>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    login: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&row.role).ok_or_else(|| {
            RepositoryError::Corrupt(format!("users({}).role = {:?}", row.id, row.role))
        })?;

        Ok(UserRecord {
            id: row.id,
            login: row.login,
            password_hash: row.password_hash,
            role,
        })
    }
}

/// PostgreSQL 기반 사용자 저장소.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, password_hash, role
            FROM users
            WHERE lower(login) = lower($1)
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }
}
