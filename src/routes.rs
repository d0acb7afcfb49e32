use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{elevated::root::organization, public};
use crate::middleware::{jwt_auth_middleware, require_admin_middleware};
use crate::state::AppState;

/// Full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Admin only
        .merge(root_routes(state.clone()))
        .with_state(state)
}

/// Router with the outer layers selected by configuration
pub fn configured_app(state: AppState, config: &AppConfig) -> Router {
    let router = app(state).layer(cors_layer(&config.security));

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn root_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/root/organization", get(organization::organization_list))
        .route("/api/root/organization/delete", post(organization::organization_delete))
        .route(
            "/api/root/organization/:org_id",
            get(organization::organization_show).delete(organization::organization_delete_by_id),
        )
        // Layers run bottom-up: authenticate first, then check the role
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// CORS policy from configuration
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
