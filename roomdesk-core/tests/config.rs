use roomdesk_core::config::{AppConfig, ConfigError, ConfigSection, ConfigValue};
use serial_test::serial;

#[test]
fn empty_config_has_no_keys() {
    let config = AppConfig::empty();
    assert!(matches!(
        config.get::<String>("portal.directory.url"),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn set_and_get() {
    let mut config = AppConfig::empty();
    config.set("portal.server.bind", ConfigValue::String("127.0.0.1:8080".into()));
    assert_eq!(
        config.get::<String>("portal.server.bind").unwrap(),
        "127.0.0.1:8080"
    );
}

#[test]
fn get_or_only_defaults_missing_keys() {
    let mut config = AppConfig::empty();
    assert_eq!(config.get_or("portal.session.cookie_max_age", 900u64).unwrap(), 900);

    config.set("portal.session.cookie_max_age", ConfigValue::String("soon".into()));
    assert!(matches!(
        config.get_or("portal.session.cookie_max_age", 900u64),
        Err(ConfigError::TypeMismatch { .. })
    ));
}

#[test]
fn string_values_convert_to_scalars() {
    let mut config = AppConfig::empty();
    config.set("a", ConfigValue::String("42".into()));
    config.set("b", ConfigValue::String("yes".into()));
    config.set("c", ConfigValue::String("-240".into()));
    assert_eq!(config.get::<u64>("a").unwrap(), 42);
    assert!(config.get::<bool>("b").unwrap());
    assert_eq!(config.get::<i32>("c").unwrap(), -240);
}

#[test]
fn yaml_is_flattened_into_dotted_keys() {
    let yaml = r#"
portal:
  directory:
    url: "https://directory.example.org"
    connect_timeout_secs: 3
  protected_prefixes:
    - /room-management
    - /user-management
"#;
    let config = AppConfig::from_yaml_str(yaml, "test").unwrap();
    assert_eq!(
        config.get::<String>("portal.directory.url").unwrap(),
        "https://directory.example.org"
    );
    assert_eq!(config.get::<u64>("portal.directory.connect_timeout_secs").unwrap(), 3);
    assert_eq!(
        config.get::<Vec<String>>("portal.protected_prefixes").unwrap(),
        vec!["/room-management", "/user-management"]
    );
}

#[test]
fn malformed_yaml_is_a_load_error() {
    let result = AppConfig::from_yaml_str("portal: [unclosed", "test");
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn require_non_empty_rejects_blank_values() {
    let mut config = AppConfig::empty();
    config.set("portal.directory.apikey", ConfigValue::String("   ".into()));
    assert!(matches!(
        config.require_non_empty("portal.directory.apikey"),
        Err(ConfigError::Invalid { .. })
    ));
    assert!(matches!(
        config.require_non_empty("portal.directory.url"),
        Err(ConfigError::NotFound(_))
    ));
}

struct Directory {
    url: String,
}

impl ConfigSection for Directory {
    fn prefix() -> &'static str {
        "portal.directory"
    }

    fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Directory {
            url: config.require_non_empty("portal.directory.url")?,
        })
    }
}

#[test]
fn typed_section_is_reachable_through_deref() {
    let config = AppConfig::from_yaml_str("portal:\n  directory:\n    url: http://dir\n", "test")
        .unwrap()
        .with_typed::<Directory>()
        .unwrap();
    assert_eq!(config.url, "http://dir");
    assert_eq!(Directory::prefix(), "portal.directory");
}

#[test]
fn typed_section_fails_on_missing_key() {
    let result = AppConfig::empty().with_typed::<Directory>();
    assert!(matches!(result, Err(ConfigError::NotFound(key)) if key == "portal.directory.url"));
}

#[test]
#[serial]
fn load_from_layers_profile_file_and_env() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("application.yaml"),
        "portal:\n  directory:\n    url: http://base\n    apikey: base-key\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("application-staging.yaml"),
        "portal:\n  directory:\n    url: http://staging\n",
    )
    .unwrap();

    std::env::remove_var("ROOMDESK_PROFILE");
    std::env::set_var("PORTAL_DIRECTORY_APIKEY", "env-key");

    let config = AppConfig::load_from(dir.path(), "staging").unwrap();
    std::env::remove_var("PORTAL_DIRECTORY_APIKEY");

    assert_eq!(config.profile(), "staging");
    assert_eq!(config.get::<String>("portal.directory.url").unwrap(), "http://staging");
    assert_eq!(config.get::<String>("portal.directory.apikey").unwrap(), "env-key");
}

#[test]
#[serial]
fn env_overrides_underscored_yaml_keys() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("application.yaml"),
        "portal:\n  session:\n    cookie_max_age: 900\n  directory:\n    probe_on_resolve: false\n",
    )
    .unwrap();

    std::env::remove_var("ROOMDESK_PROFILE");
    std::env::set_var("PORTAL_SESSION_COOKIE_MAX_AGE", "60");
    std::env::set_var("PORTAL_DIRECTORY_PROBE_ON_RESOLVE", "true");

    let config = AppConfig::load_from(dir.path(), "test").unwrap();
    std::env::remove_var("PORTAL_SESSION_COOKIE_MAX_AGE");
    std::env::remove_var("PORTAL_DIRECTORY_PROBE_ON_RESOLVE");

    assert_eq!(config.get::<i64>("portal.session.cookie_max_age").unwrap(), 60);
    assert!(config.get::<bool>("portal.directory.probe_on_resolve").unwrap());
    assert!(!config.contains_key("portal.session.cookie.max.age"));
}

#[test]
#[serial]
fn profile_env_var_wins_over_argument() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("application-prod.yaml"), "portal:\n  name: prod\n").unwrap();

    std::env::set_var("ROOMDESK_PROFILE", "prod");
    let config = AppConfig::load_from(dir.path(), "dev").unwrap();
    std::env::remove_var("ROOMDESK_PROFILE");

    assert_eq!(config.profile(), "prod");
    assert_eq!(config.get::<String>("portal.name").unwrap(), "prod");
}
