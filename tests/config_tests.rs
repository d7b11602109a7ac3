//! Configuration loading tests: file and environment layering
//!
//! Environment variables are process-global, so these run serially.

use serial_test::serial;
use smart_home_mcp::config::DEFAULT_BACKEND_URL;
use smart_home_mcp::ServerConfig;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const ENV_KEYS: [&str; 3] = [
    "SMART_HOME_BACKEND__URL",
    "SMART_HOME_BACKEND__AUTH_TOKEN",
    "SMART_HOME_BACKEND__TIMEOUT",
];

fn without_env<F: FnOnce()>(f: F) {
    temp_env::with_vars_unset(ENV_KEYS, f);
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
#[serial]
fn test_load_defaults_without_sources() {
    without_env(|| {
        let config = ServerConfig::load(None).unwrap();
        assert_eq!(config.backend.address(), DEFAULT_BACKEND_URL);
        assert!(!config.backend.auth_token_configured());
        assert_eq!(config.backend.timeout, Duration::from_secs(30));
        assert_eq!(config.logging.level, "info");
    });
}

#[test]
#[serial]
fn test_load_from_file() {
    let file = write_config(
        r#"
[backend]
url = "http://10.0.0.5:9000"
auth_token = "file-token"
timeout = "45s"

[logging]
level = "debug"
json = true
"#,
    );

    without_env(|| {
        let config = ServerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.backend.address(), "http://10.0.0.5:9000");
        assert_eq!(config.backend.auth_token, "file-token");
        assert_eq!(config.backend.timeout, Duration::from_secs(45));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    });
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = write_config(
        r#"
[backend]
url = "http://10.0.0.5:9000"
auth_token = "file-token"
"#,
    );

    temp_env::with_vars(
        [
            ("SMART_HOME_BACKEND__URL", None),
            ("SMART_HOME_BACKEND__AUTH_TOKEN", Some("env-token")),
            ("SMART_HOME_BACKEND__TIMEOUT", Some("5s")),
        ],
        || {
            let config = ServerConfig::load(Some(file.path())).unwrap();
            assert_eq!(config.backend.address(), "http://10.0.0.5:9000");
            assert_eq!(config.backend.auth_token, "env-token");
            assert_eq!(config.backend.timeout, Duration::from_secs(5));
        },
    );
}

#[test]
#[serial]
fn test_missing_file_is_an_error() {
    without_env(|| {
        let result = ServerConfig::load(Some(Path::new("/nonexistent/smart-home.toml")));
        assert!(result.is_err());
    });
}

#[test]
#[serial]
fn test_invalid_url_is_an_error() {
    temp_env::with_var("SMART_HOME_BACKEND__URL", Some("not a url"), || {
        assert!(ServerConfig::load(None).is_err());
    });
}
