pub mod org;
pub mod token;
