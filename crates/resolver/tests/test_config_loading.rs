use resolver::{Resolver, ResolverConfig, TypeRegistry};
use serial_test::serial;
use std::env;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const PREFIX: &str = "RESOLVER_TEST_CFG";

fn clear_env() {
    for suffix in ["NAME", "DETECT_CYCLES", "MAX_DEPTH", "SERIALIZE_RESOLUTION"] {
        env::remove_var(format!("{PREFIX}_{suffix}"));
    }
}

#[test]
fn test_from_file_reads_toml() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("resolver.toml");
    fs::write(
        &path,
        "name = \"orders\"\ndetect_cycles = false\nmax_depth = 16\n",
    )
    .expect("write config");

    let config = ResolverConfig::from_file(&path).expect("config file should load");
    assert_eq!(config.name, "orders");
    assert!(!config.detect_cycles);
    assert_eq!(config.max_depth, 16);
    assert!(!config.serialize_resolution);
}

#[test]
fn test_from_file_missing_reports_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = ResolverConfig::from_file(&path).expect_err("missing file must fail");
    assert!(format!("{err:#}").contains("absent.toml"));
}

#[test]
fn test_from_file_invalid_values_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "max_depth = 0\n").expect("write config");

    assert!(ResolverConfig::from_file(&path).is_err());
}

#[test]
#[serial]
fn test_env_overrides_take_priority_over_file() {
    clear_env();
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("resolver.toml");
    fs::write(&path, "name = \"from-file\"\nmax_depth = 16\n").expect("write config");

    env::set_var(format!("{PREFIX}_NAME"), "from-env");
    env::set_var(format!("{PREFIX}_SERIALIZE_RESOLUTION"), "true");

    let config = ResolverConfig::load(Some(&path), PREFIX).expect("config should load");
    clear_env();

    assert_eq!(config.name, "from-env");
    assert_eq!(config.max_depth, 16);
    assert!(config.serialize_resolution);
}

#[test]
#[serial]
fn test_load_without_file_uses_defaults() {
    clear_env();
    let config = ResolverConfig::load(None, PREFIX).expect("defaults should load");
    assert_eq!(config, ResolverConfig::default());
}

#[test]
#[serial]
fn test_invalid_env_bool_rejected() {
    clear_env();
    env::set_var(format!("{PREFIX}_DETECT_CYCLES"), "sometimes");

    let result = ResolverConfig::default().apply_env_overrides(PREFIX);
    clear_env();

    let err = result.expect_err("invalid bool must fail");
    assert!(format!("{err:#}").contains("DETECT_CYCLES"));
}

#[test]
#[serial]
fn test_env_zero_depth_fails_validation() {
    clear_env();
    env::set_var(format!("{PREFIX}_MAX_DEPTH"), "0");

    let result = ResolverConfig::default().apply_env_overrides(PREFIX);
    clear_env();

    assert!(result.is_err());
}

#[test]
fn test_config_reaches_resolver() {
    let config = ResolverConfig::default().with_name("billing");
    let resolver = Resolver::builder(Arc::new(TypeRegistry::new()))
        .config(config)
        .build();

    assert_eq!(resolver.name(), "billing");
    assert_eq!(resolver.stats().name, "billing");
    assert_eq!(resolver.config().max_depth, 64);
}
