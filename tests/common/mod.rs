#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use org_admin_api::auth::{generate_jwt, Claims, ADMIN_ROLE};
use org_admin_api::database::models::MembershipRole;
use org_admin_api::testing::{InMemoryOrganizationStore, RecordingDomainRegistry};
use org_admin_api::{app, AppState};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryOrganizationStore,
    pub domains: RecordingDomainRegistry,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        let state = AppState::new(Arc::new(store.clone()), Arc::new(domains.clone()), SECRET);

        Self {
            router: app(state),
            store,
            domains,
        }
    }

    /// Acme (42, slug "acme") with alice (1) and a member without username (2)
    pub fn with_acme() -> Self {
        let app = Self::new();
        app.store.insert_user(1, Some("alice"), "alice@acme.com");
        app.store.insert_user(2, None, "bob@acme.com");
        app.store.insert_organization(42, "Acme", Some("acme"));
        app.store.insert_membership(42, 1, MembershipRole::Owner, true);
        app.store.insert_membership(42, 2, MembershipRole::Member, false);
        app
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

pub fn admin_token() -> String {
    token_with_role(ADMIN_ROLE)
}

pub fn token_with_role(role: &str) -> String {
    let claims = Claims::new(100, "operator".to_string(), role.to_string(), 1);
    generate_jwt(&claims, SECRET).unwrap()
}
