//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유되며, 생성 이후 변경되지 않습니다.

use std::sync::Arc;

use sqlx::PgPool;

use ranobe_core::{AuthConfig, SessionPolicy};

use crate::auth::TokenService;
use crate::repository::{
    MemoryTeamRepository, MemoryUserRepository, PgTeamRepository, PgUserRepository,
    TeamRepository, UserRepository,
};
use crate::services::{AuthService, TeamService};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 토큰 발급/검증 서비스 (서명 키는 읽기 전용)
    pub tokens: Arc<TokenService>,

    /// Refresh 세션 수명 정책
    pub session_policy: SessionPolicy,

    /// 사용자 저장소
    pub users: Arc<dyn UserRepository>,

    /// 팀 저장소
    pub teams: Arc<dyn TeamRepository>,

    /// 데이터베이스 연결 풀 (인메모리 모드에서는 None)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 저장소를 직접 지정하여 생성.
    pub fn new(
        auth: &AuthConfig,
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
    ) -> Self {
        Self {
            tokens: Arc::new(TokenService::from_config(auth)),
            session_policy: auth.session_policy(),
            users,
            teams,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// PostgreSQL 저장소로 생성.
    pub fn with_pool(auth: &AuthConfig, pool: PgPool) -> Self {
        let mut state = Self::new(
            auth,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgTeamRepository::new(pool.clone())),
        );
        state.db_pool = Some(pool);
        state
    }

    /// 빈 인메모리 저장소로 생성.
    pub fn in_memory(auth: &AuthConfig) -> Self {
        Self::new(
            auth,
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryTeamRepository::new()),
        )
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.users.clone(), self.tokens.clone(), self.session_policy)
    }

    pub fn team_service(&self) -> TeamService {
        TeamService::new(self.teams.clone())
    }

    /// 서버 업타임(초)
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    ///
    /// 인메모리 모드에서는 항상 true.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => true,
        }
    }
}
