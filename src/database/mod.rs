pub mod manager;
pub mod models;
pub mod organization_store;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use organization_store::PgOrganizationStore;
pub use store::{OrganizationStore, StoreError};
