//! Store configuration loading from config.toml
//!
//! The optional TOML file lists the event types seeded on startup and the
//! policy applied when an organization or event type still referenced by
//! events is deleted. A missing file, or a file that omits a section, falls
//! back to the built-in defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "COMMUNITY_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Event types seeded into a fresh store
pub const DEFAULT_EVENT_TYPES: [(&str, &str); 4] = [
    ("School", "School related activities"),
    ("Church", "Church related activities"),
    ("Community", "Community related activities"),
    ("Other", "Other activities"),
];

/// What deleting a still-referenced organization or event type does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Delete anyway; events keep a dangling id
    #[default]
    Dangle,
    /// Refuse the delete while any event references the record
    Restrict,
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Event types to seed
    #[serde(default = "default_event_types")]
    pub event_types: Vec<EventTypeConfig>,
    /// Delete behaviour for referenced organizations and event types
    #[serde(default)]
    pub reference_policy: ReferencePolicy,
}

/// Configuration for a single seeded event type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventTypeConfig {
    /// Unique event type name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            event_types: default_event_types(),
            reference_policy: ReferencePolicy::default(),
        }
    }
}

fn default_event_types() -> Vec<EventTypeConfig> {
    DEFAULT_EVENT_TYPES
        .iter()
        .map(|(name, description)| EventTypeConfig {
            name: (*name).to_string(),
            description: Some((*description).to_string()),
        })
        .collect()
}

/// Loads store configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read ([`Error::Io`])
/// - The TOML syntax is invalid ([`Error::Config`])
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
    let contents = std::fs::read_to_string(path.as_ref())?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Loads the configuration named by `COMMUNITY_CONFIG` (default `./config.toml`).
///
/// A missing file is not an error; the defaults are returned instead.
pub fn load_default_config() -> Result<StoreConfig> {
    let path =
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        tracing::debug!("Loading store configuration from {path}");
        load_config(path)
    } else {
        tracing::debug!("No configuration file at {path}, using defaults");
        Ok(StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        let names: Vec<&str> = config.event_types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["School", "Church", "Community", "Other"]);
        assert_eq!(config.reference_policy, ReferencePolicy::Dangle);
    }

    #[test]
    fn test_parse_store_config() {
        let toml_str = r#"
            reference_policy = "restrict"

            [[event_types]]
            name = "Sports"
            description = "Tournaments and leagues"

            [[event_types]]
            name = "Fundraiser"
        "#;

        let config: StoreConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.reference_policy, ReferencePolicy::Restrict);
        assert_eq!(config.event_types.len(), 2);
        assert_eq!(config.event_types[0].name, "Sports");
        assert_eq!(config.event_types[1].description, None);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: StoreConfig = toml::from_str("").unwrap();
        assert_eq!(config.event_types.len(), 4);
        assert_eq!(config.reference_policy, ReferencePolicy::Dangle);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result: std::result::Result<StoreConfig, _> =
            toml::from_str(r#"reference_policy = "cascade""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_config("/definitely/not/here/config.toml");
        match result {
            Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_bad_toml_is_config_error() {
        let path = std::env::temp_dir().join(format!(
            "community-records-bad-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "reference_policy = ").unwrap();
        let result = load_config(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
