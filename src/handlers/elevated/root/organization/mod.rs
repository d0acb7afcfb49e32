// handlers/elevated/root/organization/mod.rs - Organization administration
//
// Every route here acts on a Team flagged `isOrganization`. Teams without the
// flag are answered exactly like ids that do not exist.

pub mod delete; // POST /api/root/organization/delete, DELETE /api/root/organization/:org_id
pub mod list; // GET /api/root/organization
pub mod show; // GET /api/root/organization/:org_id

pub use delete::{organization_delete, organization_delete_by_id};
pub use list::organization_list;
pub use show::organization_show;
