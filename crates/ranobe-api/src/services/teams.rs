//! 팀 관리 서비스.
//!
//! 팀 정보 수정과 멤버 관리는 팀 소유자 또는 팀 `Admin`만 할 수 있으며,
//! 소유자의 역할 변경과 제거는 항상 `Conflict`로 거부됩니다.

use std::sync::Arc;

use tracing::info;

use ranobe_core::{ensure_team_manager, Identity, ServiceError, TeamMember, TeamRole, TeamSummary};

use crate::error::ApiResult;
use crate::repository::TeamRepository;

/// 팀 관리 서비스.
#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamRepository>) -> Self {
        Self { teams }
    }

    /// 요청자가 팀 관리자인지 확인합니다.
    async fn ensure_manager(&self, actor: &Identity, team_id: i64) -> ApiResult<()> {
        let member = self.teams.find_member(team_id, actor.user_id).await?;
        ensure_team_manager(team_id, member.as_ref())?;
        Ok(())
    }

    async fn target_member(&self, team_id: i64, user_id: i64) -> ApiResult<TeamMember> {
        self.teams
            .find_member(team_id, user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(format!("팀 {}의 멤버 {}", team_id, user_id)).into()
            })
    }

    /// 팀 이름과 설명 수정.
    pub async fn update_team(
        &self,
        actor: &Identity,
        team_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> ApiResult<TeamSummary> {
        self.ensure_manager(actor, team_id).await?;

        let updated = self
            .teams
            .update_team(team_id, name, description)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("팀 {}", team_id)))?;

        info!(team_id, actor = actor.user_id, "Team updated");
        Ok(updated)
    }

    /// 멤버 역할 변경.
    pub async fn change_member_role(
        &self,
        actor: &Identity,
        team_id: i64,
        user_id: i64,
        role: TeamRole,
    ) -> ApiResult<TeamMember> {
        self.ensure_manager(actor, team_id).await?;

        let mut target = self.target_member(team_id, user_id).await?;
        target.ensure_role_change_allowed(role)?;

        if !self.teams.set_member_role(team_id, user_id, role).await? {
            return Err(ServiceError::not_found(format!("팀 {}의 멤버 {}", team_id, user_id)).into());
        }

        info!(team_id, user_id, %role, actor = actor.user_id, "Member role changed");
        target.role = role;
        Ok(target)
    }

    /// 멤버 제거.
    pub async fn remove_member(&self, actor: &Identity, team_id: i64, user_id: i64) -> ApiResult<()> {
        self.ensure_manager(actor, team_id).await?;

        let target = self.target_member(team_id, user_id).await?;
        target.ensure_removable()?;

        if !self.teams.remove_member(team_id, user_id).await? {
            return Err(ServiceError::not_found(format!("팀 {}의 멤버 {}", team_id, user_id)).into());
        }

        info!(team_id, user_id, actor = actor.user_id, "Member removed");
        Ok(())
    }

    /// 팀의 전체 멤버 조회. 팀이 없으면 `NotFound`.
    pub async fn members(&self, team_id: i64) -> ApiResult<Vec<TeamMember>> {
        if self.teams.find_team(team_id).await?.is_none() {
            return Err(ServiceError::not_found(format!("팀 {}", team_id)).into());
        }
        Ok(self.teams.members(team_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::repository::MemoryTeamRepository;
    use ranobe_core::UserRole;

    const OWNER: i64 = 1;
    const TEAM_ADMIN: i64 = 2;
    const TRANSLATOR: i64 = 3;

    async fn service() -> TeamService {
        let repo = MemoryTeamRepository::new();
        repo.insert_team(TeamSummary::new(5, "Sakura", None), OWNER).await;
        repo.insert_member(5, TEAM_ADMIN, TeamRole::Admin).await;
        repo.insert_member(5, TRANSLATOR, TeamRole::Translator).await;
        TeamService::new(Arc::new(repo))
    }

    fn user(id: i64) -> Identity {
        Identity::new(id, format!("user{}", id), UserRole::User)
    }

    fn service_error(err: ApiError) -> ServiceError {
        match err {
            ApiError::Service(e) => e,
            ApiError::Internal(e) => panic!("unexpected internal error: {:#}", e),
        }
    }

    #[tokio::test]
    async fn test_team_admin_can_update() {
        let service = service().await;
        let updated = service
            .update_team(&user(TEAM_ADMIN), 5, "Sakura TL", Some("Light novels"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Sakura TL");
    }

    #[tokio::test]
    async fn test_translator_cannot_update() {
        let service = service().await;
        let err = service
            .update_team(&user(TRANSLATOR), 5, "Hijacked", None)
            .await
            .unwrap_err();
        assert!(matches!(service_error(err), ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_owner_role_change_is_conflict() {
        let service = service().await;
        let err = service
            .change_member_role(&user(TEAM_ADMIN), 5, OWNER, TeamRole::Standard)
            .await
            .unwrap_err();
        assert!(matches!(service_error(err), ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_owner_removal_is_conflict() {
        let service = service().await;
        let err = service
            .remove_member(&user(TEAM_ADMIN), 5, OWNER)
            .await
            .unwrap_err();
        assert!(matches!(service_error(err), ServiceError::Conflict(_)));

        // 소유자는 여전히 팀에 남아 있음
        let members = service.members(5).await.unwrap();
        assert!(members.iter().any(|m| m.user_id == OWNER && m.is_owner));
    }

    #[tokio::test]
    async fn test_role_change_and_removal() {
        let service = service().await;

        let changed = service
            .change_member_role(&user(OWNER), 5, TRANSLATOR, TeamRole::Redactor)
            .await
            .unwrap();
        assert_eq!(changed.role, TeamRole::Redactor);

        service.remove_member(&user(OWNER), 5, TRANSLATOR).await.unwrap();
        let err = service
            .remove_member(&user(OWNER), 5, TRANSLATOR)
            .await
            .unwrap_err();
        assert!(matches!(service_error(err), ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_members_of_unknown_team_is_not_found() {
        let service = service().await;

        assert_eq!(service.members(5).await.unwrap().len(), 3);

        let err = service.members(999).await.unwrap_err();
        assert!(matches!(service_error(err), ServiceError::NotFound(_)));
    }
}
