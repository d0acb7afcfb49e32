use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub organization_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Username a member is moved to when their organization goes away.
///
/// Suffixing the user id keeps the value unique under the
/// (username, organization_id) constraint and releases the bare name.
pub fn freed_username(username: Option<&str>, user_id: i32) -> String {
    format!("{}-{}", username.unwrap_or(""), user_id)
}
