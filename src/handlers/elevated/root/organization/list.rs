// handlers/elevated/root/organization/list.rs - GET /api/root/organization

use axum::extract::State;

use crate::database::models::OrganizationSummary;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn organization_list(State(state): State<AppState>) -> ApiResult<Vec<OrganizationSummary>> {
    let organizations = state.organizations.list_organizations().await?;
    Ok(ApiResponse::success(organizations))
}
