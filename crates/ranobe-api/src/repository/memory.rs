//! 인메모리 저장소 구현.
//!
//! `DATABASE_URL`이 설정되지 않은 개발 환경과 테스트에서 사용합니다.
//! 팀과 멤버십은 삽입 순서를 그대로 유지합니다.

use async_trait::async_trait;
use tokio::sync::RwLock;

use ranobe_core::{TeamMember, TeamRole, TeamSummary, UserRole};

use super::{RepositoryError, TeamRepository, UserRecord, UserRepository};
use crate::auth::hash_password;

#[derive(Debug, Clone)]
struct StoredTeam {
    summary: TeamSummary,
    owner_id: i64,
}

#[derive(Debug, Clone)]
struct StoredMembership {
    team_id: i64,
    user_id: i64,
    role: TeamRole,
}

#[derive(Debug, Default)]
struct TeamTables {
    teams: Vec<StoredTeam>,
    memberships: Vec<StoredMembership>,
}

impl TeamTables {
    fn owner_of(&self, team_id: i64) -> Option<i64> {
        self.teams
            .iter()
            .find(|t| t.summary.team_id == team_id)
            .map(|t| t.owner_id)
    }

    fn to_member(&self, m: &StoredMembership) -> TeamMember {
        TeamMember {
            team_id: m.team_id,
            user_id: m.user_id,
            role: m.role,
            is_owner: self.owner_of(m.team_id) == Some(m.user_id),
        }
    }
}

/// 인메모리 팀 저장소.
#[derive(Debug, Default)]
pub struct MemoryTeamRepository {
    tables: RwLock<TeamTables>,
}

impl MemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 팀 생성. 소유자는 `Admin` 역할의 멤버로 함께 등록됩니다.
    pub async fn insert_team(&self, summary: TeamSummary, owner_id: i64) {
        let mut tables = self.tables.write().await;
        tables.memberships.push(StoredMembership {
            team_id: summary.team_id,
            user_id: owner_id,
            role: TeamRole::Admin,
        });
        tables.teams.push(StoredTeam { summary, owner_id });
    }

    /// 멤버 추가. 이미 있으면 역할만 갱신합니다.
    pub async fn insert_member(&self, team_id: i64, user_id: i64, role: TeamRole) {
        let mut tables = self.tables.write().await;
        match tables
            .memberships
            .iter_mut()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
        {
            Some(existing) => existing.role = role,
            None => tables.memberships.push(StoredMembership {
                team_id,
                user_id,
                role,
            }),
        }
    }
}

#[async_trait]
impl TeamRepository for MemoryTeamRepository {
    async fn teams_for_user(&self, user_id: i64) -> Result<Vec<TeamSummary>, RepositoryError> {
        let tables = self.tables.read().await;
        let teams = tables
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                tables
                    .teams
                    .iter()
                    .find(|t| t.summary.team_id == m.team_id)
                    .map(|t| t.summary.clone())
            })
            .collect();
        Ok(teams)
    }

    async fn find_team(&self, team_id: i64) -> Result<Option<TeamSummary>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .teams
            .iter()
            .find(|t| t.summary.team_id == team_id)
            .map(|t| t.summary.clone()))
    }

    async fn find_member(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<TeamMember>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .map(|m| tables.to_member(m)))
    }

    async fn members(&self, team_id: i64) -> Result<Vec<TeamMember>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .filter(|m| m.team_id == team_id)
            .map(|m| tables.to_member(m))
            .collect())
    }

    async fn update_team(
        &self,
        team_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<TeamSummary>, RepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .teams
            .iter_mut()
            .find(|t| t.summary.team_id == team_id)
            .map(|t| {
                t.summary.name = name.to_string();
                t.summary.description = description.map(str::to_string);
                t.summary.clone()
            }))
    }

    async fn set_member_role(
        &self,
        team_id: i64,
        user_id: i64,
        role: TeamRole,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables
            .memberships
            .iter_mut()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
        {
            Some(m) => {
                m.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_member(&self, team_id: i64, user_id: i64) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        let before = tables.memberships.len();
        tables
            .memberships
            .retain(|m| !(m.team_id == team_id && m.user_id == user_id));
        Ok(tables.memberships.len() < before)
    }
}

/// 인메모리 사용자 저장소.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<UserRecord>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 평문 비밀번호로 사용자 등록 (Argon2 해시로 저장).
    pub async fn insert_user(
        &self,
        id: i64,
        login: &str,
        password: &str,
        role: UserRole,
    ) -> Result<(), RepositoryError> {
        let password_hash =
            hash_password(password).map_err(|e| RepositoryError::Corrupt(e.to_string()))?;

        self.users.write().await.push(UserRecord {
            id,
            login: login.to_string(),
            password_hash,
            role,
        });
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.login.eq_ignore_ascii_case(login))
            .cloned())
    }
}
