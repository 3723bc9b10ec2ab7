//! 팀 규칙과 ServiceResult 통합 테스트
//!
//! 서비스 코드가 실패를 `Err`로 전달하고 호출자가 분기하는 흐름을 검증합니다.

use proptest::prelude::*;
use ranobe_core::{
    ensure_team_manager, ServiceError, ServiceResult, TeamMember, TeamRole, TeamScope,
    TeamSummary, ValidationFailures,
};

/// 테스트용 팀 멤버 목록
fn roster() -> Vec<TeamMember> {
    vec![
        TeamMember {
            team_id: 5,
            user_id: 1,
            role: TeamRole::Admin,
            is_owner: true,
        },
        TeamMember {
            team_id: 5,
            user_id: 2,
            role: TeamRole::Admin,
            is_owner: false,
        },
        TeamMember {
            team_id: 5,
            user_id: 3,
            role: TeamRole::Translator,
            is_owner: false,
        },
    ]
}

/// 역할 변경 시나리오: 실패는 값이 아닌 에러로만 전달됨
fn change_role(
    members: &mut [TeamMember],
    actor_id: i64,
    target_id: i64,
    role: TeamRole,
) -> ServiceResult<TeamMember> {
    let actor = members.iter().find(|m| m.user_id == actor_id).cloned();
    ensure_team_manager(5, actor.as_ref())?;

    let target = members
        .iter_mut()
        .find(|m| m.user_id == target_id)
        .ok_or_else(|| ServiceError::not_found(format!("멤버 {}", target_id)))?;
    target.ensure_role_change_allowed(role)?;

    target.role = role;
    Ok(target.clone())
}

#[test]
fn test_role_change_flow() {
    let mut members = roster();

    let result = change_role(&mut members, 2, 3, TeamRole::Redactor);
    assert!(!result.is_err());
    assert_eq!(result.unwrap().role, TeamRole::Redactor);

    let result = change_role(&mut members, 2, 1, TeamRole::Standard);
    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), ServiceError::Conflict(_)));
    assert_eq!(members[0].role, TeamRole::Admin);

    let result = change_role(&mut members, 3, 2, TeamRole::Standard);
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));

    let result = change_role(&mut members, 1, 99, TeamRole::Standard);
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[test]
fn test_scope_membership_check() {
    let scope = TeamScope::new(vec![
        TeamSummary::new(5, "Sakura", None),
        TeamSummary::new(9, "Moonlight", None),
    ]);

    assert_eq!(scope.ensure_member_of(9).unwrap().name, "Moonlight");
    assert!(matches!(
        scope.ensure_member_of(7),
        Err(ServiceError::Forbidden(_))
    ));
}

proptest! {
    #[test]
    fn prop_validation_failures_keep_insertion_order(
        names in prop::collection::vec("[a-z]{1,12}", 1..8)
    ) {
        let mut failures = ValidationFailures::new();
        for name in &names {
            failures.push(name.clone(), "invalid");
        }

        let err = failures.into_result().unwrap_err();
        match err {
            ServiceError::Validation(f) => {
                let got: Vec<String> = f.into_iter().map(|x| x.property_name).collect();
                prop_assert_eq!(got, names);
            }
            other => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }

    #[test]
    fn prop_owner_never_removable(role_idx in 0usize..4, team_id in 1i64..1000) {
        let roles = [TeamRole::Standard, TeamRole::Translator, TeamRole::Redactor, TeamRole::Admin];
        let owner = TeamMember { team_id, user_id: 1, role: roles[role_idx], is_owner: true };

        prop_assert!(owner.ensure_removable().is_err());
        for role in roles {
            prop_assert!(owner.ensure_role_change_allowed(role).is_err());
        }
    }
}
