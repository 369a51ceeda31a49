use roomdesk_core::{AppConfig, ConfigError, ConfigSection};

/// Connection settings for the external user directory.
///
/// `url` and `apikey` are required; the portal refuses to start
/// without them.
#[derive(Clone)]
pub struct DirectoryConfig {
    /// Base URL of the directory's REST endpoint (e.g. `https://xyz.supabase.co`).
    pub url: String,

    /// Anonymous API key sent as `apikey` and as the Bearer token.
    pub apikey: String,

    /// TCP connect timeout in seconds (default: 5). No overall request timeout.
    pub connect_timeout_secs: u64,

    /// Probe the directory connection before every resolution (default: false).
    /// Advisory only; the probe result never changes the session outcome.
    pub probe_on_resolve: bool,
}

impl DirectoryConfig {
    pub fn new(url: impl Into<String>, apikey: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            apikey: apikey.into(),
            connect_timeout_secs: 5,
            probe_on_resolve: false,
        }
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_probe_on_resolve(mut self, enabled: bool) -> Self {
        self.probe_on_resolve = enabled;
        self
    }
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("url", &self.url)
            .field("apikey", &"<redacted>")
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("probe_on_resolve", &self.probe_on_resolve)
            .finish()
    }
}

impl ConfigSection for DirectoryConfig {
    fn prefix() -> &'static str {
        "portal.directory"
    }

    fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let url = config.require_non_empty("portal.directory.url")?;
        let apikey = config.require_non_empty("portal.directory.apikey")?;
        Ok(DirectoryConfig::new(url, apikey)
            .with_connect_timeout(config.get_or("portal.directory.connect_timeout_secs", 5u64)?)
            .with_probe_on_resolve(config.get_or("portal.directory.probe_on_resolve", false)?))
    }
}
