use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

use super::models::{
    MemberWithUser, Membership, MembershipRole, OrganizationSummary, OrganizationWithMembers,
    Team, TeamMetadata, User,
};
use super::store::{OrganizationStore, StoreError};

/// Postgres-backed [`OrganizationStore`]
#[derive(Clone)]
pub struct PgOrganizationStore {
    pool: PgPool,
}

impl PgOrganizationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn team_from_row(row: &PgRow) -> Result<Team, sqlx::Error> {
        let metadata: Option<serde_json::Value> = row.try_get("team_metadata")?;
        Ok(Team {
            id: row.try_get("team_id")?,
            name: row.try_get("team_name")?,
            slug: row.try_get("team_slug")?,
            metadata: TeamMetadata::from_json(metadata),
            parent_id: row.try_get("team_parent_id")?,
            created_at: row.try_get::<DateTime<Utc>, _>("team_created_at")?,
        })
    }

    /// `None` when the LEFT JOIN produced no membership for this row
    fn member_from_row(row: &PgRow) -> Result<Option<MemberWithUser>, StoreError> {
        let membership_id: Option<i32> = row.try_get("membership_id")?;
        let Some(membership_id) = membership_id else {
            return Ok(None);
        };

        let role: String = row.try_get("membership_role")?;
        let role = role.parse::<MembershipRole>().map_err(StoreError::other)?;
        let user_id: i32 = row.try_get("user_id")?;

        let membership = Membership {
            id: membership_id,
            team_id: row.try_get("team_id")?,
            user_id,
            role,
            accepted: row.try_get("membership_accepted")?,
        };
        let user = User {
            id: user_id,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            name: row.try_get("user_name")?,
            role: row.try_get("user_role")?,
            organization_id: row.try_get("organization_id")?,
            created_at: row.try_get("user_created_at")?,
        };

        Ok(Some(MemberWithUser { membership, user }))
    }
}

#[async_trait]
impl OrganizationStore for PgOrganizationStore {
    async fn find_organization_with_members(
        &self,
        org_id: i32,
    ) -> Result<Option<OrganizationWithMembers>, StoreError> {
        let query = r#"
            SELECT
                t.id AS team_id, t.name AS team_name, t.slug AS team_slug,
                t.metadata AS team_metadata, t.parent_id AS team_parent_id,
                t.created_at AS team_created_at,
                m.id AS membership_id, m.role AS membership_role, m.accepted AS membership_accepted,
                u.id AS user_id, u.username, u.email, u.name AS user_name, u.role AS user_role,
                u.organization_id, u.created_at AS user_created_at
            FROM teams t
            LEFT JOIN memberships m ON m.team_id = t.id
            LEFT JOIN users u ON u.id = m.user_id
            WHERE t.id = $1
            AND t.metadata -> 'isOrganization' = 'true'::jsonb
            ORDER BY m.id
        "#;

        let rows = sqlx::query(query)
            .bind(org_id)
            .fetch_all(&self.pool)
            .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let team = Self::team_from_row(first)?;
        if !team.is_organization() {
            return Ok(None);
        }

        let mut members = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(member) = Self::member_from_row(row)? {
                members.push(member);
            }
        }

        Ok(Some(OrganizationWithMembers { team, members }))
    }

    async fn list_organizations(&self) -> Result<Vec<OrganizationSummary>, StoreError> {
        let summaries = sqlx::query_as::<_, OrganizationSummary>(
            r#"
            SELECT t.id, t.name, t.slug, COUNT(m.id) AS member_count
            FROM teams t
            LEFT JOIN memberships m ON m.team_id = t.id
            WHERE t.metadata -> 'isOrganization' = 'true'::jsonb
            GROUP BY t.id
            ORDER BY t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    async fn update_username(&self, user_id: i32, username: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET username = $1 WHERE id = $2")
            .bind(username)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    async fn delete_team(&self, team_id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
