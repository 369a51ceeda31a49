pub mod app;
pub mod config;
pub mod controllers;
pub mod models;
pub mod state;

pub use app::router;
pub use config::PortalConfig;
pub use state::AppState;
