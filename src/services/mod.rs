pub mod organization_service;

pub use organization_service::{
    DeleteOrganizationInput, DeleteOrganizationOutput, OrganizationError, OrganizationService,
};
