use super::{AppConfig, ConfigError};

/// A strongly-typed configuration section read from an [`AppConfig`].
///
/// ```ignore
/// impl ConfigSection for PortalConfig {
///     fn prefix() -> &'static str { "portal" }
///     fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
///         Ok(Self { url: config.require_non_empty("portal.directory.url")? })
///     }
/// }
/// ```
pub trait ConfigSection: Sized {
    /// The key prefix this section lives under (e.g. `"portal"`).
    fn prefix() -> &'static str;

    /// Build the section, failing on missing required keys.
    fn from_config(config: &AppConfig) -> Result<Self, ConfigError>;
}
