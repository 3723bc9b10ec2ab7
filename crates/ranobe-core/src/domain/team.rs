//! 번역 팀과 팀 멤버십.
//!
//! 한 사용자는 여러 팀에 서로 다른 역할로 소속될 수 있습니다.
//! 팀 소유자는 특별한 멤버로, 역할을 변경하거나 팀에서 제거할 수 없습니다.

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// 팀 내 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    /// 일반 멤버
    Standard,
    /// 번역가
    Translator,
    /// 교정자
    Redactor,
    /// 팀 관리자
    Admin,
}

impl TeamRole {
    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Some(TeamRole::Standard),
            "translator" => Some(TeamRole::Translator),
            "redactor" => Some(TeamRole::Redactor),
            "admin" => Some(TeamRole::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Standard => "standard",
            TeamRole::Translator => "translator",
            TeamRole::Redactor => "redactor",
            TeamRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 팀 멤버십 한 건.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub team_id: i64,
    pub user_id: i64,
    pub role: TeamRole,
    /// 팀 소유자 여부
    pub is_owner: bool,
}

impl TeamMember {
    /// 팀 정보 수정 및 멤버 관리가 가능한지 확인.
    pub fn can_manage(&self) -> bool {
        self.is_owner || self.role == TeamRole::Admin
    }

    /// 이 멤버의 역할을 `new_role`로 바꿀 수 있는지 확인합니다.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Conflict`: 대상이 팀 소유자인 경우
    pub fn ensure_role_change_allowed(&self, new_role: TeamRole) -> ServiceResult<()> {
        if self.is_owner {
            return Err(ServiceError::conflict(format!(
                "팀 {}의 소유자 역할은 변경할 수 없습니다 (요청 역할: {})",
                self.team_id, new_role
            )));
        }
        Ok(())
    }

    /// 이 멤버를 팀에서 제거할 수 있는지 확인합니다.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Conflict`: 대상이 팀 소유자인 경우
    pub fn ensure_removable(&self) -> ServiceResult<()> {
        if self.is_owner {
            return Err(ServiceError::conflict(format!(
                "팀 {}의 소유자는 제거할 수 없습니다",
                self.team_id
            )));
        }
        Ok(())
    }
}

/// 요청자가 팀 관리 권한을 가졌는지 확인합니다.
///
/// # Errors
///
/// - `ServiceError::Forbidden`: 팀 멤버가 아니거나 관리 권한이 없는 경우
pub fn ensure_team_manager(team_id: i64, actor: Option<&TeamMember>) -> ServiceResult<()> {
    match actor {
        Some(member) if member.can_manage() => Ok(()),
        Some(_) => Err(ServiceError::forbidden(format!(
            "팀 {} 관리 권한이 없습니다",
            team_id
        ))),
        None => Err(ServiceError::forbidden(format!(
            "팀 {}의 멤버가 아닙니다",
            team_id
        ))),
    }
}

/// "사용자 X가 속한 팀" 조회 결과 한 건.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub team_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TeamSummary {
    pub fn new(team_id: i64, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            team_id,
            name: name.into(),
            description,
        }
    }
}

/// 요청자가 속한 모든 팀 (저장소가 반환한 순서 유지).
///
/// 요청 단위로 한 번 로드되며, 이후 핸들러는 추가 DB 조회 없이
/// 팀 소속 여부를 확인할 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TeamScope(Vec<TeamSummary>);

impl TeamScope {
    pub fn new(teams: Vec<TeamSummary>) -> Self {
        Self(teams)
    }

    /// 팀 소속 여부 확인.
    pub fn contains(&self, team_id: i64) -> bool {
        self.0.iter().any(|t| t.team_id == team_id)
    }

    pub fn get(&self, team_id: i64) -> Option<&TeamSummary> {
        self.0.iter().find(|t| t.team_id == team_id)
    }

    pub fn team_ids(&self) -> Vec<i64> {
        self.0.iter().map(|t| t.team_id).collect()
    }

    pub fn teams(&self) -> &[TeamSummary] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 소속되지 않은 팀이면 `Forbidden`을 반환합니다.
    pub fn ensure_member_of(&self, team_id: i64) -> ServiceResult<&TeamSummary> {
        self.get(team_id).ok_or_else(|| {
            ServiceError::forbidden(format!("팀 {}의 멤버가 아닙니다", team_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(role: TeamRole, is_owner: bool) -> TeamMember {
        TeamMember {
            team_id: 5,
            user_id: 11,
            role,
            is_owner,
        }
    }

    #[test]
    fn test_owner_role_cannot_change() {
        let owner = member(TeamRole::Admin, true);
        let result = owner.ensure_role_change_allowed(TeamRole::Standard);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        // 같은 역할로의 변경도 허용되지 않음
        let result = owner.ensure_role_change_allowed(TeamRole::Admin);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn test_owner_cannot_be_removed() {
        assert!(matches!(
            member(TeamRole::Admin, true).ensure_removable(),
            Err(ServiceError::Conflict(_))
        ));
        assert!(member(TeamRole::Admin, false).ensure_removable().is_ok());
    }

    #[test]
    fn test_regular_member_role_change() {
        let translator = member(TeamRole::Translator, false);
        assert!(translator.ensure_role_change_allowed(TeamRole::Redactor).is_ok());
    }

    #[test]
    fn test_team_manager_check() {
        let owner = member(TeamRole::Standard, true);
        let admin = member(TeamRole::Admin, false);
        let redactor = member(TeamRole::Redactor, false);

        assert!(ensure_team_manager(5, Some(&owner)).is_ok());
        assert!(ensure_team_manager(5, Some(&admin)).is_ok());
        assert!(matches!(
            ensure_team_manager(5, Some(&redactor)),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_team_manager(5, None),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn test_team_scope_preserves_order() {
        let scope = TeamScope::new(vec![
            TeamSummary::new(9, "Moonlight", None),
            TeamSummary::new(5, "Sakura", Some("light novels".to_string())),
        ]);

        assert_eq!(scope.team_ids(), vec![9, 5]);
        assert!(scope.contains(5));
        assert!(!scope.contains(6));
        assert_eq!(scope.ensure_member_of(5).unwrap().name, "Sakura");
        assert!(scope.ensure_member_of(6).is_err());
    }

    #[test]
    fn test_team_role_parse() {
        assert_eq!(TeamRole::parse("Translator"), Some(TeamRole::Translator));
        assert_eq!(TeamRole::parse("redactor"), Some(TeamRole::Redactor));
        assert_eq!(TeamRole::parse("owner"), None);
    }
}
