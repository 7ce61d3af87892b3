pub mod api;
pub mod client;
pub mod core;
pub mod infra;
pub mod models;
pub mod state;

pub use infra::config::Config;
pub use state::AppState;
