//! Конфигурация резолвера
//!
//! Источники в порядке приоритета:
//! 1. Переменные окружения `{PREFIX}_*` (highest priority)
//! 2. TOML файл или строка
//! 3. Значения по умолчанию

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, str::FromStr};
use tracing::debug;

pub const DEFAULT_ENV_PREFIX: &str = "RESOLVER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Имя резолвера для логов и статистики
    pub name: String,
    /// Обнаруживать циклы по цепочке разрешаемых ключей
    pub detect_cycles: bool,
    /// Максимальная глубина вложенного разрешения при `detect_cycles = false`
    pub max_depth: usize,
    /// Держать reentrant lock на время top-level resolve
    pub serialize_resolution: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            detect_cycles: true,
            max_depth: 64,
            serialize_resolution: false,
        }
    }
}

impl ResolverConfig {
    /// Конфигурация для многопоточного использования: один экземпляр на ключ
    pub fn concurrent() -> Self {
        Self {
            serialize_resolution: true,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse resolver config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        debug!("Loaded resolver config from {}", path.display());
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize resolver config")
    }

    /// Применить `{prefix}_NAME`, `{prefix}_DETECT_CYCLES`, `{prefix}_MAX_DEPTH`,
    /// `{prefix}_SERIALIZE_RESOLUTION`
    pub fn apply_env_overrides(mut self, prefix: &str) -> Result<Self> {
        if let Some(name) = env_var(prefix, "NAME") {
            self.name = name;
        }
        if let Some(value) = env_var(prefix, "DETECT_CYCLES") {
            self.detect_cycles = parse_bool(&value).context("DETECT_CYCLES")?;
        }
        if let Some(value) = env_var(prefix, "MAX_DEPTH") {
            self.max_depth = parse_number(&value).context("MAX_DEPTH")?;
        }
        if let Some(value) = env_var(prefix, "SERIALIZE_RESOLUTION") {
            self.serialize_resolution = parse_bool(&value).context("SERIALIZE_RESOLUTION")?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Загрузить файл (если задан) и применить env overrides
    pub fn load(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.apply_env_overrides(prefix)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Resolver name must not be empty");
        }
        if self.max_depth == 0 {
            bail!("max_depth must be at least 1");
        }
        Ok(())
    }
}

fn env_var(prefix: &str, suffix: &str) -> Option<String> {
    env::var(format!("{}_{}", prefix, suffix)).ok()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("invalid boolean value: {}", other)),
    }
}

fn parse_number<T: FromStr>(value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("invalid numeric value: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.name, "default");
        assert!(config.detect_cycles);
        assert_eq!(config.max_depth, 64);
        assert!(!config.serialize_resolution);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ResolverConfig::from_toml_str("name = \"app\"\nmax_depth = 8\n")
            .expect("partial config should parse");
        assert_eq!(config.name, "app");
        assert_eq!(config.max_depth, 8);
        assert!(config.detect_cycles);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        assert!(ResolverConfig::from_toml_str("max_depth = 0").is_err());
        assert!(ResolverConfig::from_toml_str("name = \"  \"").is_err());
        assert!(ResolverConfig::from_toml_str("max_depth = \"deep\"").is_err());
    }

    #[test]
    fn test_toml_roundtrip_preserves_values() {
        let config = ResolverConfig::concurrent().with_name("workers");
        let text = config.to_toml_string().expect("config should serialize");
        let parsed = ResolverConfig::from_toml_str(&text).expect("config should parse back");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_helpers() {
        assert!(parse_bool("Yes").unwrap());
        assert!(!parse_bool(" off ").unwrap());
        assert!(parse_bool("maybe").is_err());
        assert_eq!(parse_number::<usize>(" 12 ").unwrap(), 12);
        assert!(parse_number::<usize>("-1").is_err());
    }
}
