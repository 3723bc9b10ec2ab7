//! Team Repository
//!
//! 팀과 팀 멤버십 관련 데이터베이스 연산을 담당합니다.
//!
//! 사용 테이블:
//! - `teams (id, name, description, owner_id)`
//! - `team_members (team_id, user_id, role, joined_at)`

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use ranobe_core::{TeamMember, TeamRole, TeamSummary};

use super::RepositoryError;

/// 팀 저장소.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// 사용자가 속한 모든 팀 조회 (역할 무관).
    ///
    /// 가입 순서대로 반환합니다.
    async fn teams_for_user(&self, user_id: i64) -> Result<Vec<TeamSummary>, RepositoryError>;

    /// 팀 조회.
    async fn find_team(&self, team_id: i64) -> Result<Option<TeamSummary>, RepositoryError>;

    /// 팀 멤버십 조회.
    async fn find_member(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<TeamMember>, RepositoryError>;

    /// 팀의 전체 멤버 조회.
    async fn members(&self, team_id: i64) -> Result<Vec<TeamMember>, RepositoryError>;

    /// 팀 이름/설명 수정. 팀이 없으면 `None`.
    async fn update_team(
        &self,
        team_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<TeamSummary>, RepositoryError>;

    /// 멤버 역할 변경. 멤버가 없으면 `false`.
    async fn set_member_role(
        &self,
        team_id: i64,
        user_id: i64,
        role: TeamRole,
    ) -> Result<bool, RepositoryError>;

    /// 멤버 제거. 멤버가 없으면 `false`.
    async fn remove_member(&self, team_id: i64, user_id: i64) -> Result<bool, RepositoryError>;
}

// ================================================================================================
// Rows
// ================================================================================================

#[derive(Debug, FromRow)]
struct TeamSummaryRow {
    team_id: i64,
    name: String,
    #[sqlx(default)]
    description: Option<String>,
}

impl From<TeamSummaryRow> for TeamSummary {
    fn from(row: TeamSummaryRow) -> Self {
        TeamSummary::new(row.team_id, row.name, row.description)
    }
}

#[derive(Debug, FromRow)]
struct TeamMemberRow {
    team_id: i64,
    user_id: i64,
    role: String,
    is_owner: bool,
}

impl TryFrom<TeamMemberRow> for TeamMember {
    type Error = RepositoryError;

    fn try_from(row: TeamMemberRow) -> Result<Self, Self::Error> {
        let role = TeamRole::parse(&row.role).ok_or_else(|| {
            RepositoryError::Corrupt(format!(
                "team_members({}, {}).role = {:?}",
                row.team_id, row.user_id, row.role
            ))
        })?;

        Ok(TeamMember {
            team_id: row.team_id,
            user_id: row.user_id,
            role,
            is_owner: row.is_owner,
        })
    }
}

// ================================================================================================
// PostgreSQL
// ================================================================================================

/// PostgreSQL 기반 팀 저장소.
#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    async fn teams_for_user(&self, user_id: i64) -> Result<Vec<TeamSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, TeamSummaryRow>(
            r#"
            SELECT t.id AS team_id, t.name, t.description
            FROM team_members tm
            JOIN teams t ON t.id = tm.team_id
            WHERE tm.user_id = $1
            ORDER BY tm.joined_at, t.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_team(&self, team_id: i64) -> Result<Option<TeamSummary>, RepositoryError> {
        let row = sqlx::query_as::<_, TeamSummaryRow>(
            r#"
            SELECT id AS team_id, name, description
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_member(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<TeamMember>, RepositoryError> {
        let row = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT tm.team_id, tm.user_id, tm.role, (t.owner_id = tm.user_id) AS is_owner
            FROM team_members tm
            JOIN teams t ON t.id = tm.team_id
            WHERE tm.team_id = $1 AND tm.user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TeamMember::try_from).transpose()
    }

    async fn members(&self, team_id: i64) -> Result<Vec<TeamMember>, RepositoryError> {
        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT tm.team_id, tm.user_id, tm.role, (t.owner_id = tm.user_id) AS is_owner
            FROM team_members tm
            JOIN teams t ON t.id = tm.team_id
            WHERE tm.team_id = $1
            ORDER BY tm.joined_at, tm.user_id
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TeamMember::try_from).collect()
    }

    async fn update_team(
        &self,
        team_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<TeamSummary>, RepositoryError> {
        let row = sqlx::query_as::<_, TeamSummaryRow>(
            r#"
            UPDATE teams
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id AS team_id, name, description
            "#,
        )
        .bind(team_id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn set_member_role(
        &self,
        team_id: i64,
        user_id: i64,
        role: TeamRole,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE team_members SET role = $3
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_member(&self, team_id: i64, user_id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_row_conversion() {
        let row = TeamMemberRow {
            team_id: 5,
            user_id: 2,
            role: "Translator".to_string(),
            is_owner: false,
        };
        let member = TeamMember::try_from(row).unwrap();
        assert_eq!(member.role, TeamRole::Translator);
    }

    #[test]
    fn test_corrupt_member_row() {
        let row = TeamMemberRow {
            team_id: 5,
            user_id: 2,
            role: "overlord".to_string(),
            is_owner: false,
        };
        assert!(matches!(
            TeamMember::try_from(row),
            Err(RepositoryError::Corrupt(_))
        ));
    }
}
