//! Integration tests for engine configuration loading

use std::io::Write;

use scr_engine::{ConfigError, DsVersion, EngineConfig};

#[test]
fn test_full_config() {
    let config = EngineConfig::from_str(
        r#"
[binding]
version = "1.2-felix"

[materialize]
nested_views = false
"#,
    )
    .unwrap();

    assert_eq!(config.binding.version, DsVersion::V1_2Felix);
    assert!(!config.materialize.nested_views);

    let gate = config.gate();
    assert!(gate.relaxed_visibility);
    assert!(gate.return_properties);
    assert!(!config.materializer().options().nested_views);
}

#[test]
fn test_partial_sections_use_defaults() {
    let config = EngineConfig::from_str("[binding]\nversion = \"1.0\"\n").unwrap();
    assert_eq!(config.binding.version, DsVersion::V1_0);
    assert!(config.materialize.nested_views);
    assert!(!config.gate().relaxed_visibility);

    let config = EngineConfig::from_str("[materialize]\n").unwrap();
    assert_eq!(config.binding.version, DsVersion::V1_3);
}

#[test]
fn test_invalid_version() {
    let err = EngineConfig::from_str("[binding]\nversion = \"2.0\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("2.0"), "{}", err);
}

#[test]
fn test_malformed_toml() {
    let err = EngineConfig::from_str("[binding\nversion = ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[binding]\nversion = \"1.1\"").unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.binding.version, DsVersion::V1_1);
    assert!(!config.gate().return_properties);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::from_file(&dir.path().join("scr.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_serialize_roundtrip() {
    let config = EngineConfig::from_str("[binding]\nversion = \"1.1-felix\"\n").unwrap();
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("version = \"1.1-felix\""));
    assert_eq!(EngineConfig::from_str(&text).unwrap(), config);
}
