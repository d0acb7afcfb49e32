pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod domains;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod testing;

pub use routes::app;
pub use state::AppState;
