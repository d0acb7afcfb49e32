use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Membership, Team, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberWithUser {
    pub membership: Membership,
    pub user: User,
}

/// An organization team loaded together with its members in one read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationWithMembers {
    pub team: Team,
    pub members: Vec<MemberWithUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    pub id: i32,
    pub name: String,
    pub slug: Option<String>,
    pub member_count: i64,
}
