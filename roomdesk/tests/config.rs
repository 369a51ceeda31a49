use roomdesk::PortalConfig;
use roomdesk_core::{AppConfig, ConfigError};

fn load(yaml: &str) -> Result<AppConfig<PortalConfig>, ConfigError> {
    AppConfig::from_yaml_str(yaml, "test")?.with_typed::<PortalConfig>()
}

#[test]
fn defaults_apply_when_only_required_keys_are_set() {
    let config = load("portal:\n  directory:\n    url: https://dir.example\n    apikey: anon\n").unwrap();
    assert_eq!(config.directory.url, "https://dir.example");
    assert_eq!(config.bind, "0.0.0.0:3000");
    assert_eq!(config.cookie_max_age, 900);
    assert_eq!(config.utc_offset_minutes, 0);
    assert_eq!(config.directory.connect_timeout_secs, 5);
    assert!(!config.directory.probe_on_resolve);
}

#[test]
fn missing_url_or_apikey_is_fatal() {
    assert!(matches!(
        load("portal:\n  directory:\n    apikey: anon\n"),
        Err(ConfigError::NotFound(key)) if key == "portal.directory.url"
    ));
    assert!(matches!(
        load("portal:\n  directory:\n    url: https://dir.example\n"),
        Err(ConfigError::NotFound(key)) if key == "portal.directory.apikey"
    ));
    assert!(matches!(
        load("portal:\n  directory:\n    url: https://dir.example\n    apikey: '  '\n"),
        Err(ConfigError::Invalid { key, .. }) if key == "portal.directory.apikey"
    ));
}

#[test]
fn optional_sections_are_validated() {
    let base = "portal:\n  directory:\n    url: u\n    apikey: k\n";

    let config = load(&format!("{base}  calendar:\n    utc_offset_minutes: -240\n")).unwrap();
    assert_eq!(config.date_validator().offset().local_minus_utc(), -240 * 60);

    assert!(matches!(
        load(&format!("{base}  calendar:\n    utc_offset_minutes: 2000\n")),
        Err(ConfigError::Invalid { key, .. }) if key == "portal.calendar.utc_offset_minutes"
    ));
    assert!(matches!(
        load(&format!("{base}  session:\n    cookie_max_age: 0\n")),
        Err(ConfigError::Invalid { key, .. }) if key == "portal.session.cookie_max_age"
    ));
    assert!(matches!(
        load(&format!("{base}  server:\n    bind: [1, 2]\n")),
        Err(ConfigError::TypeMismatch { .. })
    ));
}
