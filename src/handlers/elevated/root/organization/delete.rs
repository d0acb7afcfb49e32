// handlers/elevated/root/organization/delete.rs - organization deletion handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    Json,
};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{DeleteOrganizationInput, DeleteOrganizationOutput};
use crate::state::AppState;

/// POST /api/root/organization/delete with `{ "orgId": 42 }`
///
/// Releases the organization's domain, frees every member's username and
/// removes the team. Responds `{ ok, message }` inside the success envelope.
pub async fn organization_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<DeleteOrganizationInput>, JsonRejection>,
) -> ApiResult<DeleteOrganizationOutput> {
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    run_delete(&state, &user, input).await
}

/// DELETE /api/root/organization/:org_id
pub async fn organization_delete_by_id(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<DeleteOrganizationOutput> {
    let Path(org_id) = path.map_err(|e| ApiError::bad_request(e.body_text()))?;
    run_delete(&state, &user, DeleteOrganizationInput { org_id }).await
}

async fn run_delete(
    state: &AppState,
    user: &AuthUser,
    input: DeleteOrganizationInput,
) -> ApiResult<DeleteOrganizationOutput> {
    tracing::info!(
        "Admin '{}' ({}) requested deletion of organization {}",
        user.username,
        user.user_id,
        input.org_id
    );

    let output = state.organizations.delete_organization(input).await?;
    Ok(ApiResponse::success(output))
}
