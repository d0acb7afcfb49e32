use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipRole {
    Member,
    Admin,
    Owner,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Member => "MEMBER",
            MembershipRole::Admin => "ADMIN",
            MembershipRole::Owner => "OWNER",
        }
    }
}

impl FromStr for MembershipRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MEMBER" => Ok(MembershipRole::Member),
            "ADMIN" => Ok(MembershipRole::Admin),
            "OWNER" => Ok(MembershipRole::Owner),
            other => Err(format!("unknown membership role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: i32,
    pub team_id: i32,
    pub user_id: i32,
    pub role: MembershipRole,
    pub accepted: bool,
}
