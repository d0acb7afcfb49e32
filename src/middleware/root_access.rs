use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::error::ApiError;

/// Only platform administrators may reach `/api/root/*`.
/// Must run after `jwt_auth_middleware`.
pub async fn require_admin_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required"))?;

    if !user.is_admin() {
        tracing::warn!(
            "Root access denied for user '{}' ({}) with role '{}'",
            user.username,
            user.user_id,
            user.role
        );
        return Err(ApiError::forbidden("Administrator access required"));
    }

    tracing::debug!("Root access granted to user '{}' ({})", user.username, user.user_id);
    Ok(next.run(request).await)
}
