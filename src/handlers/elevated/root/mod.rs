// handlers/elevated/root/mod.rs - Root administrative handlers
//
// Platform-wide operations that cut across organizations.
pub mod organization;
