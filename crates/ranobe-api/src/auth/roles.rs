//! 엔드포인트별 역할 허용 목록.
//!
//! 역할 서열(`UserRole::rank`)과 무관하게 목록에 포함된 역할만 통과합니다.
//! 예를 들어 `[Moderator]`만 허용하는 엔드포인트에 `Admin`은 접근할 수 없습니다.

use ranobe_core::UserRole;

/// 허용 역할 목록.
///
/// 빈 목록은 "인증된 모든 사용자"를 의미합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowList(&'static [UserRole]);

impl AllowList {
    /// 인증된 모든 사용자 허용.
    pub const ANY: AllowList = AllowList(&[]);

    /// 지정한 역할만 허용.
    pub const fn only(roles: &'static [UserRole]) -> Self {
        Self(roles)
    }

    /// 역할이 허용되는지 확인.
    pub fn permits(&self, role: UserRole) -> bool {
        self.0.is_empty() || self.0.contains(&role)
    }

    pub fn is_any(&self) -> bool {
        self.0.is_empty()
    }

    pub fn roles(&self) -> &'static [UserRole] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_permits_everyone() {
        for role in UserRole::ALL {
            assert!(AllowList::ANY.permits(role));
        }
    }

    #[test]
    fn test_membership_not_rank() {
        let moderators = AllowList::only(&[UserRole::Moderator]);

        assert!(moderators.permits(UserRole::Moderator));
        // 서열이 더 높아도 목록에 없으면 거부
        assert!(!moderators.permits(UserRole::Admin));
        assert!(!moderators.permits(UserRole::Editor));
        assert!(!moderators.permits(UserRole::User));
    }

    #[test]
    fn test_multiple_roles() {
        let staff = AllowList::only(&[UserRole::Editor, UserRole::Admin]);

        assert!(staff.permits(UserRole::Editor));
        assert!(staff.permits(UserRole::Admin));
        assert!(!staff.permits(UserRole::Moderator));
        assert!(!staff.is_any());
    }
}
