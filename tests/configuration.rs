//! Tests for configuration system

use habita::Config;
use habita_plan::DuplicatePolicy;
use temp_dir::TempDir;

#[test]
fn test_config_loads_from_default_toml() -> anyhow::Result<()> {
    let config = Config::load(Some("config/default.toml".to_string()))?;

    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.plan.duration_days, 7);
    assert_eq!(config.plan.duplicate_policy, DuplicatePolicy::Reject);
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());

    Ok(())
}

#[test]
fn test_missing_file_falls_back_to_defaults() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("absent.toml");

    let config = Config::load(Some(path.to_string_lossy().into_owned()))?;

    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.plan.duration_days, 7);
    assert!(config.api.token.is_none());

    Ok(())
}

#[test]
fn test_file_overrides_defaults() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("habita.toml");
    std::fs::write(
        &path,
        r#"
[api]
base_url = "https://plans.example.org"
token = "abc"
timeout_secs = 5

[plan]
duration_days = 14
duplicate_policy = "allow"
"#,
    )?;

    let config = Config::load(Some(path.to_string_lossy().into_owned()))?;

    assert_eq!(config.api.base_url, "https://plans.example.org");
    assert_eq!(config.api.token.as_deref(), Some("abc"));
    assert_eq!(config.api.timeout().as_secs(), 5);
    assert_eq!(config.plan.duration_days, 14);
    assert_eq!(config.plan.duplicate_policy, DuplicatePolicy::Allow);
    assert_eq!(config.logging.level, "info");

    Ok(())
}

#[test]
fn test_out_of_range_duration_fails_validation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("habita.toml");
    std::fs::write(&path, "[plan]\nduration_days = 45\n")?;

    let config = Config::load(Some(path.to_string_lossy().into_owned()))?;

    assert!(config.validate().is_err());

    Ok(())
}
