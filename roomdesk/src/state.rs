use std::sync::Arc;

use roomdesk_calendar::DateValidator;
use roomdesk_security::SessionResolver;

use crate::config::PortalConfig;

/// Shared handler state. The resolver (and the directory client inside it)
/// is built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<SessionResolver>,
    pub dates: DateValidator,
    pub cookie_max_age: i64,
}

impl AppState {
    pub fn new(resolver: SessionResolver, config: &PortalConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            dates: config.date_validator(),
            cookie_max_age: config.cookie_max_age,
        }
    }
}
