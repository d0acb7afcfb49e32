pub mod auth;
pub mod response;
pub mod root_access;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use root_access::require_admin_middleware;
