use std::path::PathBuf;

use strata_config::{ConfigError, MissingDependencies, StrataConfig};
use tempfile::TempDir;

#[test]
fn empty_config_uses_defaults() {
    let config = StrataConfig::from_toml_str("").unwrap();
    assert_eq!(config, StrataConfig::default());
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
    assert!(config.import.parallel);
    assert!(config.import.dependency_classpath.is_empty());
    assert_eq!(
        config.import.missing_dependencies,
        MissingDependencies::Synthesize
    );
}

#[test]
fn parses_every_section() {
    let text = r#"
[logging]
level = "warn,strata.import=debug"
json = true

[import]
parallel = false
dependency_classpath = ["/opt/lib/a.jar", "/opt/classes"]
missing_dependencies = "drop"
"#;
    let config = StrataConfig::from_toml_str(text).unwrap();
    assert_eq!(config.logging.level, "warn,strata.import=debug");
    assert!(config.logging.json);
    assert!(!config.import.parallel);
    assert_eq!(
        config.import.dependency_classpath,
        vec![PathBuf::from("/opt/lib/a.jar"), PathBuf::from("/opt/classes")]
    );
    assert_eq!(config.import.missing_dependencies, MissingDependencies::Drop);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = StrataConfig::from_toml_str("[import]\nthreads = 4\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");

    let err = StrataConfig::from_toml_str("[cache]\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn load_from_path_resolves_relative_dependencies() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("strata.toml");
    std::fs::write(
        &path,
        "[import]\ndependency_classpath = [\"lib/dep.jar\"]\n",
    )
    .unwrap();

    let config = StrataConfig::load_from_path(&path).unwrap();
    assert_eq!(
        config.import.dependency_classpath,
        vec![tmp.path().join("lib/dep.jar")]
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = StrataConfig::load_from_path(tmp.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn init_tracing_can_be_called_twice() {
    let config = StrataConfig::default();
    strata_config::init_tracing(&config.logging);
    strata_config::init_tracing(&config.logging);
    tracing::info!(target: "strata.config", "tracing initialized");
}
