pub mod membership;
pub mod organization;
pub mod team;
pub mod user;

pub use membership::{Membership, MembershipRole};
pub use organization::{MemberWithUser, OrganizationSummary, OrganizationWithMembers};
pub use team::{Team, TeamMetadata};
pub use user::{freed_username, User};
