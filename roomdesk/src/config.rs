use roomdesk_calendar::DateValidator;
use roomdesk_core::{AppConfig, ConfigError, ConfigSection};
use roomdesk_security::cookies::DEFAULT_MAX_AGE_SECS;
use roomdesk_security::DirectoryConfig;

/// Typed `portal.*` configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub directory: DirectoryConfig,
    /// Listen address (`portal.server.bind`).
    pub bind: String,
    /// Lifetime of the `sso_id` cookie in seconds (`portal.session.cookie_max_age`).
    pub cookie_max_age: i64,
    /// Offset used to decide what "today" is (`portal.calendar.utc_offset_minutes`).
    pub utc_offset_minutes: i32,
}

impl PortalConfig {
    pub fn date_validator(&self) -> DateValidator {
        DateValidator::from_offset_minutes(self.utc_offset_minutes).unwrap_or_default()
    }
}

impl ConfigSection for PortalConfig {
    fn prefix() -> &'static str {
        "portal"
    }

    fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let directory = DirectoryConfig::from_config(config)?;

        let cookie_max_age: i64 = config.get_or("portal.session.cookie_max_age", DEFAULT_MAX_AGE_SECS)?;
        if cookie_max_age <= 0 {
            return Err(ConfigError::Invalid {
                key: "portal.session.cookie_max_age".into(),
                message: "must be a positive number of seconds".into(),
            });
        }

        let utc_offset_minutes: i32 = config.get_or("portal.calendar.utc_offset_minutes", 0)?;
        if DateValidator::from_offset_minutes(utc_offset_minutes).is_none() {
            return Err(ConfigError::Invalid {
                key: "portal.calendar.utc_offset_minutes".into(),
                message: "offset must lie strictly between -1440 and 1440".into(),
            });
        }

        Ok(PortalConfig {
            directory,
            bind: config.get_or("portal.server.bind", "0.0.0.0:3000".to_string())?,
            cookie_max_age,
            utc_offset_minutes,
        })
    }
}
