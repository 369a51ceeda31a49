pub mod config;
pub mod error;
pub mod layers;
pub mod server;

pub use config::{AppConfig, ConfigError, ConfigSection, ConfigValue, FromConfigValue};
pub use error::{error_response, HttpError};
pub use layers::{catch_panic_layer, default_trace, init_tracing, no_store};
pub use server::serve;
