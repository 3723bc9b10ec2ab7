//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러와 미들웨어에서 분리합니다.
//! 각 저장소는 trait으로 정의되며, PostgreSQL 구현(`Pg*`)과
//! 데이터베이스 없이 동작하는 인메모리 구현(`Memory*`)을 제공합니다.

pub mod memory;
pub mod teams;
pub mod users;

pub use memory::{MemoryTeamRepository, MemoryUserRepository};
pub use teams::{PgTeamRepository, TeamRepository};
pub use users::{PgUserRepository, UserRecord, UserRepository};

/// 저장소 에러.
///
/// 저장소 에러는 항상 예상치 못한 실패로 취급되어 500으로 응답됩니다.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),

    /// 저장된 값을 도메인 타입으로 변환할 수 없음
    #[error("손상된 레코드: {0}")]
    Corrupt(String),
}
