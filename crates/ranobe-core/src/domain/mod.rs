//! 도메인 모델.

mod identity;
mod role;
mod team;

pub use identity::{Identity, RefreshSession, SessionPolicy};
pub use role::UserRole;
pub use team::{ensure_team_manager, TeamMember, TeamRole, TeamScope, TeamSummary};
