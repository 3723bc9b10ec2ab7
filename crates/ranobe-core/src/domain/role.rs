//! 전역 사용자 역할.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 권한이 낮은 순서부터 정의되며 `rank()`로 수치 서열을 제공합니다.
/// 엔드포인트 접근 제어는 서열 비교가 아니라 허용 목록 포함 여부로만 판단합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// 일반 사용자
    User,
    /// 편집자
    Editor,
    /// 모더레이터
    Moderator,
    /// 관리자
    Admin,
}

impl UserRole {
    /// 모든 역할 (서열 순).
    pub const ALL: [UserRole; 4] = [
        UserRole::User,
        UserRole::Editor,
        UserRole::Moderator,
        UserRole::Admin,
    ];

    /// 역할의 수치 서열 반환 (높을수록 더 많은 권한).
    pub fn rank(&self) -> u16 {
        match self {
            UserRole::User => 1,
            UserRole::Editor => 2,
            UserRole::Moderator => 3,
            UserRole::Admin => 999,
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(UserRole::User),
            "editor" => Some(UserRole::Editor),
            "moderator" => Some(UserRole::Moderator),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Editor => "editor",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
