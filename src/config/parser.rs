//! Configuration File Parsers
//!
//! Trait-object parsers keyed on file extension. The manager in
//! `loader.rs` walks its registry and hands a file to the first parser
//! that claims it, so new formats plug in without touching the loader.

use std::fs;
use std::path::Path;

use super::types::DocweaveConfig;
use crate::types::{DocweaveError, Result};

/// A parser for one on-disk configuration format.
pub trait ConfigParser: Send + Sync {
    /// Whether this parser recognizes the file, by extension.
    fn can_handle(&self, path: &Path) -> bool;

    /// Parse the file into a configuration.
    ///
    /// Keys absent from the file keep their defaults. A missing file or
    /// malformed content is a fatal configuration error.
    fn parse(&self, path: &Path) -> Result<DocweaveConfig>;
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

fn read_config_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DocweaveError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }
    Ok(fs::read_to_string(path)?)
}

// =============================================================================
// YAML
// =============================================================================

/// Parser for `.yml` / `.yaml` files.
pub struct YamlConfigParser;

impl ConfigParser for YamlConfigParser {
    fn can_handle(&self, path: &Path) -> bool {
        matches!(extension_lowercase(path).as_deref(), Some("yml" | "yaml"))
    }

    fn parse(&self, path: &Path) -> Result<DocweaveConfig> {
        let text = read_config_file(path)?;
        // An empty file is a valid configuration: everything defaults.
        if text.trim().is_empty() {
            return Ok(DocweaveConfig::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }
}

// =============================================================================
// TOML
// =============================================================================

/// Parser for `.toml` files.
pub struct TomlConfigParser;

impl ConfigParser for TomlConfigParser {
    fn can_handle(&self, path: &Path) -> bool {
        extension_lowercase(path).as_deref() == Some("toml")
    }

    fn parse(&self, path: &Path) -> Result<DocweaveConfig> {
        let text = read_config_file(path)?;
        Ok(toml::from_str(&text)?)
    }
}
