// Runs against a real Postgres. Point DATABASE_URL at a scratch database and run
// `cargo test --test 40_postgres_store -- --ignored`.

use std::sync::Arc;

use anyhow::{Context, Result};
use org_admin_api::config::DatabaseConfig;
use org_admin_api::database::{DatabaseManager, OrganizationStore, PgOrganizationStore, StoreError};
use org_admin_api::domains::NoopDomainRegistry;
use org_admin_api::services::{DeleteOrganizationInput, OrganizationService};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn connect() -> Result<DatabaseManager> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let manager = DatabaseManager::connect(&DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        connection_timeout: 5,
        run_migrations: true,
    })
    .await?;
    Ok(manager)
}

/// Suffix that keeps rows from concurrent runs apart
fn run_id() -> String {
    format!("{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn insert_user(pool: &PgPool, username: Option<&str>, email: &str) -> Result<i32> {
    let id = sqlx::query_scalar("INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id")
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn insert_team(pool: &PgPool, name: &str, slug: Option<&str>, metadata: Option<Value>) -> Result<i32> {
    let id = sqlx::query_scalar("INSERT INTO teams (name, slug, metadata) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(slug)
        .bind(metadata)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn insert_membership(pool: &PgPool, team_id: i32, user_id: i32, role: &str) -> Result<i32> {
    let id = sqlx::query_scalar(
        "INSERT INTO memberships (team_id, user_id, role, accepted) VALUES ($1, $2, $3, true) RETURNING id",
    )
    .bind(team_id)
    .bind(user_id)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn membership_count(pool: &PgPool, team_id: i32) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM memberships WHERE team_id = $1")
        .bind(team_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn username_of(pool: &PgPool, user_id: i32) -> Result<Option<String>> {
    let username = sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(username)
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn deletes_organization_through_postgres() -> Result<()> {
    let db = connect().await?;
    let pool = db.pool();
    let run = run_id();

    let alice_name = format!("alice{}", run);
    let alice = insert_user(pool, Some(&alice_name), &format!("alice{}@acme.com", run)).await?;
    let bob = insert_user(pool, None, &format!("bob{}@acme.com", run)).await?;
    let slug = format!("acme{}", run);
    let org = insert_team(pool, "Acme", Some(&slug), Some(json!({ "isOrganization": true }))).await?;

    // Inserted in reverse so ordering comes from membership id, not user id
    let first = insert_membership(pool, org, bob, "MEMBER").await?;
    let second = insert_membership(pool, org, alice, "OWNER").await?;

    let store = PgOrganizationStore::new(pool.clone());

    let found = store
        .find_organization_with_members(org)
        .await?
        .context("flagged team should be found")?;
    assert_eq!(found.team.name, "Acme");
    assert_eq!(found.team.domain_slug(), Some(slug.as_str()));
    let ids: Vec<i32> = found.members.iter().map(|m| m.membership.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(found.members[0].user.id, bob);

    let listed = store.list_organizations().await?;
    let summary = listed.iter().find(|s| s.id == org).context("org missing from list")?;
    assert_eq!(summary.member_count, 2);

    let service = OrganizationService::new(Arc::new(store.clone()), Arc::new(NoopDomainRegistry));
    let output = service
        .delete_organization(DeleteOrganizationInput { org_id: org })
        .await?;
    assert_eq!(output.message, "Organization Acme deleted.");

    assert_eq!(username_of(pool, alice).await?, Some(format!("{}-{}", alice_name, alice)));
    assert_eq!(username_of(pool, bob).await?, Some(format!("-{}", bob)));
    assert_eq!(membership_count(pool, org).await?, 0);
    assert!(store.find_organization_with_members(org).await?.is_none());

    sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(vec![alice, bob])
        .execute(pool)
        .await?;
    db.close().await;
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unflagged_teams_are_not_organizations() -> Result<()> {
    let db = connect().await?;
    let pool = db.pool();
    let run = run_id();

    let flagged_false = insert_team(
        pool,
        "Design",
        Some(&format!("design{}", run)),
        Some(json!({ "isOrganization": false })),
    )
    .await?;
    let no_metadata = insert_team(pool, "Ops", None, None).await?;

    let store = PgOrganizationStore::new(pool.clone());
    assert!(store.find_organization_with_members(flagged_false).await?.is_none());
    assert!(store.find_organization_with_members(no_metadata).await?.is_none());

    let listed = store.list_organizations().await?;
    assert!(listed.iter().all(|s| s.id != flagged_false && s.id != no_metadata));

    sqlx::query("DELETE FROM teams WHERE id = ANY($1)")
        .bind(vec![flagged_false, no_metadata])
        .execute(pool)
        .await?;
    db.close().await;
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn writes_to_missing_rows_fail() -> Result<()> {
    let db = connect().await?;
    let store = PgOrganizationStore::new(db.pool().clone());

    assert!(matches!(
        store.update_username(i32::MAX, "ghost").await,
        Err(StoreError::Sqlx(sqlx::Error::RowNotFound))
    ));
    assert!(matches!(
        store.delete_team(i32::MAX).await,
        Err(StoreError::Sqlx(sqlx::Error::RowNotFound))
    ));
    store.ping().await?;

    db.close().await;
    Ok(())
}
