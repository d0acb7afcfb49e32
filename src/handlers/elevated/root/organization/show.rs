// handlers/elevated/root/organization/show.rs - GET /api/root/organization/:org_id

use axum::extract::{rejection::PathRejection, Path, State};

use crate::database::models::OrganizationWithMembers;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::OrganizationError;
use crate::state::AppState;

pub async fn organization_show(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<OrganizationWithMembers> {
    let Path(org_id) = path.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let organization = state
        .organizations
        .get_organization(org_id)
        .await
        .map_err(|e| match e {
            OrganizationError::NotAuthorizedOrNotFound => {
                ApiError::not_found(format!("Organization {} not found", org_id))
            }
            other => other.into(),
        })?;
    Ok(ApiResponse::success(organization))
}
