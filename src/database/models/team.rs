use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Typed view over the free-form `teams.metadata` JSON column.
///
/// Only `isOrganization` is interpreted here; every other key is carried
/// through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMetadata {
    #[serde(rename = "isOrganization", default, skip_serializing_if = "Option::is_none")]
    pub is_organization: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TeamMetadata {
    /// Metadata for a team flagged as an organization
    pub fn organization() -> Self {
        Self {
            is_organization: Some(true),
            extra: Map::new(),
        }
    }

    /// Lenient parse of the stored column. Anything that is not an object with
    /// a boolean `isOrganization` decodes to "not an organization".
    pub fn from_json(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed team metadata: {}", e);
                Self::default()
            }),
        }
    }

    pub fn is_organization(&self) -> bool {
        self.is_organization == Some(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i32,
    pub name: String,
    pub slug: Option<String>,
    pub metadata: TeamMetadata,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn is_organization(&self) -> bool {
        self.metadata.is_organization()
    }

    /// Slug registered as a custom subdomain, if any. Empty slugs never were.
    pub fn domain_slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|slug| !slug.is_empty())
    }
}
