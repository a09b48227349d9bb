//! YAML configuration for the quote viewer.
//!
//! All tuning lives in one YAML file. Every section is optional and falls back
//! to its defaults, and two settings can be overridden from the environment.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "orders desk"
//!
//! scan:
//!   page_limit: 50
//!
//! cache:
//!   capacity: 5
//!
//! normalize:
//!   version: 1
//!   fold_compatibility: false
//!
//! matcher:
//!   enabled: true
//!   fallback_to_scan: true
//!   min_confidence: 0.5
//! ```
//!
//! ## Environment overrides
//!
//! - `PDF_MAX_PAGES_SCAN` replaces `scan.page_limit`.
//! - `QUOTE_CACHE_CAPACITY` replaces `cache.capacity`.

use std::fs;
use std::path::Path;

use canonical::NormalizeConfig;
use doc_cache::{CacheConfig, DEFAULT_CAPACITY};
use matcher::{ScanConfig, DEFAULT_PAGE_LIMIT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `scan.page_limit`.
pub const PAGE_LIMIT_ENV: &str = "PDF_MAX_PAGES_SCAN";
/// Environment variable overriding `cache.capacity`.
pub const CACHE_CAPACITY_ENV: &str = "QUOTE_CACHE_CAPACITY";

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ViewerConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub scan: ScanYamlConfig,

    #[serde(default)]
    pub cache: CacheYamlConfig,

    #[serde(default)]
    pub normalize: NormalizeYamlConfig,

    #[serde(default)]
    pub matcher: MatcherYamlConfig,
}

impl ViewerConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ViewerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the process environment applied.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let mut config = Self::default();
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.scan.validate()?;
        self.cache.validate()?;
        self.normalize.validate()?;
        self.matcher.validate()?;

        Ok(())
    }

    /// Applies `PDF_MAX_PAGES_SCAN` and `QUOTE_CACHE_CAPACITY` as returned by
    /// `lookup`, then re-validates. Unset or blank variables are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(page_limit) = parse_override::<u32>(&lookup, PAGE_LIMIT_ENV)? {
            self.scan.page_limit = page_limit;
        }
        if let Some(capacity) = parse_override::<usize>(&lookup, CACHE_CAPACITY_ENV)? {
            self.cache.capacity = capacity;
        }
        self.validate()
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            page_limit: self.scan.page_limit,
            normalize: self.normalize_config(),
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::with_capacity(self.cache.capacity)
    }

    pub fn normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig {
            version: self.normalize.version,
            fold_compatibility: self.normalize.fold_compatibility,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            scan: ScanYamlConfig::default(),
            cache: CacheYamlConfig::default(),
            normalize: NormalizeYamlConfig::default(),
            matcher: MatcherYamlConfig::default(),
        }
    }
}

fn parse_override<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ConfigLoadError>
where
    T: std::str::FromStr,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<T>().map(Some).map_err(|_| {
        ConfigLoadError::Validation(format!("{name} must be a positive integer, got {raw:?}"))
    })
}

/// Page scan YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanYamlConfig {
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl ScanYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.page_limit == 0 {
            return Err(ConfigLoadError::Validation(
                "scan.page_limit must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScanYamlConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
        }
    }
}

/// Document cache YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheYamlConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl CacheYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.capacity == 0 {
            return Err(ConfigLoadError::Validation(
                "cache.capacity must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheYamlConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Text normalization YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub fold_compatibility: bool,
}

impl NormalizeYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "normalize.version must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for NormalizeYamlConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            fold_compatibility: false,
        }
    }
}

/// External matcher YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherYamlConfig {
    /// Ask an installed external matcher before scanning locally.
    #[serde(default = "true_value")]
    pub enabled: bool,

    /// Run the local phrase scan when the external matcher fails or is unsure.
    #[serde(default = "true_value")]
    pub fallback_to_scan: bool,

    /// Answers below this confidence are treated as failures.
    #[serde(default)]
    pub min_confidence: f32,
}

impl MatcherYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigLoadError::Validation(format!(
                "matcher.min_confidence must be within 0..=1, got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

impl Default for MatcherYamlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fallback_to_scan: true,
            min_confidence: 0.0,
        }
    }
}

fn default_version() -> u32 {
    1
}
fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}
fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}
fn true_value() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "orders desk"
scan:
  page_limit: 20
matcher:
  min_confidence: 0.6
"#;

        let config = ViewerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name, Some("orders desk".to_string()));
        assert_eq!(config.scan.page_limit, 20);
        assert_eq!(config.cache.capacity, 5);
        assert!(config.matcher.enabled);
        assert!(config.matcher.fallback_to_scan);
        assert_eq!(config.scan_config().page_limit, 20);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
cache:
  capacity: 8
normalize:
  fold_compatibility: true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = ViewerConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.cache_config().capacity, 8);
        assert!(config.normalize_config().fold_compatibility);
        assert_eq!(config.normalize_config().version, 1);
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerConfig::from_file("/nonexistent/viewer.yaml").unwrap_err();
        assert!(matches!(err, ConfigLoadError::FileRead(_)));
    }

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scan.page_limit, 50);
        assert_eq!(config.cache.capacity, 5);
    }

    #[test]
    fn test_validation_errors() {
        let zero_limit = ViewerConfig::from_yaml("version: \"1.0\"\nscan:\n  page_limit: 0\n");
        assert!(zero_limit.unwrap_err().to_string().contains("page_limit"));

        let zero_cache = ViewerConfig::from_yaml("version: \"1.0\"\ncache:\n  capacity: 0\n");
        assert!(zero_cache.unwrap_err().to_string().contains("capacity"));

        let confidence =
            ViewerConfig::from_yaml("version: \"1.0\"\nmatcher:\n  min_confidence: 1.5\n");
        assert!(confidence.unwrap_err().to_string().contains("min_confidence"));

        let version = ViewerConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            version.unwrap_err(),
            ConfigLoadError::UnsupportedVersion(v) if v == "2.0"
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ViewerConfig::default();
        config
            .apply_env_overrides(env(&[
                ("PDF_MAX_PAGES_SCAN", "120"),
                ("QUOTE_CACHE_CAPACITY", " 9 "),
            ]))
            .unwrap();
        assert_eq!(config.scan.page_limit, 120);
        assert_eq!(config.cache.capacity, 9);
    }

    #[test]
    fn test_env_overrides_ignore_blank_and_reject_garbage() {
        let mut config = ViewerConfig::default();
        config
            .apply_env_overrides(env(&[("PDF_MAX_PAGES_SCAN", "")]))
            .unwrap();
        assert_eq!(config.scan.page_limit, 50);

        let err = config
            .apply_env_overrides(env(&[("PDF_MAX_PAGES_SCAN", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("PDF_MAX_PAGES_SCAN"));

        let err = config
            .apply_env_overrides(env(&[("QUOTE_CACHE_CAPACITY", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }
}
