//! Finder configuration.
//!
//! ```rust,no_run
//! use extension_finder::config::{FinderConfig, MissingFieldPolicy};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FinderConfig::new("/srv/site")
//!     .marker_key("bolt-class")
//!     .missing_field_policy(MissingFieldPolicy::Skip);
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

mod file;

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MANAGED_ROOT: &str = "vendor";
pub const DEFAULT_MANUAL_ROOT: &str = "local";
pub const DEFAULT_EXCLUDED_SUBTREE: &str = "vendor/composer";
pub const DEFAULT_MANIFEST_NAME: &str = "composer.json";
pub const DEFAULT_MARKER_KEY: &str = "bolt-class";
pub const DEFAULT_CACHE_FILE: &str = "autoload.json";
pub const DEFAULT_BOOTSTRAP_FILE: &str = "vendor/autoload.php";

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The offending key
        key: String,
        /// Error message
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// What the index builder does with a manifest that lacks `name` or the
/// entry-class field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Fail the whole build; the cache file is left untouched.
    #[default]
    Abort,
    /// Skip the manifest and keep building.
    Skip,
}

/// Locations and names used by the scanner, builder and loader.
///
/// Every relative path is resolved against `project_root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub project_root: PathBuf,
    /// Root populated by the package manager.
    pub managed_root: PathBuf,
    /// Root for extensions installed by hand.
    pub manual_root: PathBuf,
    /// The package manager's own metadata, never scanned.
    pub excluded_subtree: PathBuf,
    pub manifest_name: String,
    /// Key under `extra` holding the entry-point class.
    pub marker_key: String,
    pub cache_file: PathBuf,
    pub bootstrap_file: PathBuf,
    pub missing_field_policy: MissingFieldPolicy,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            managed_root: PathBuf::from(DEFAULT_MANAGED_ROOT),
            manual_root: PathBuf::from(DEFAULT_MANUAL_ROOT),
            excluded_subtree: PathBuf::from(DEFAULT_EXCLUDED_SUBTREE),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            marker_key: DEFAULT_MARKER_KEY.to_string(),
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            bootstrap_file: PathBuf::from(DEFAULT_BOOTSTRAP_FILE),
            missing_field_policy: MissingFieldPolicy::default(),
        }
    }
}

impl FinderConfig {
    /// Create a configuration with defaults rooted at `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    pub fn managed_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.managed_root = dir.into();
        self
    }

    pub fn manual_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.manual_root = dir.into();
        self
    }

    pub fn excluded_subtree(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded_subtree = dir.into();
        self
    }

    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    pub fn marker_key(mut self, key: impl Into<String>) -> Self {
        self.marker_key = key.into();
        self
    }

    pub fn cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = path.into();
        self
    }

    pub fn bootstrap_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.bootstrap_file = path.into();
        self
    }

    pub fn missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field_policy = policy;
        self
    }

    /// Scan roots in scan order: managed first, then manual.
    pub fn scan_roots(&self) -> [PathBuf; 2] {
        [
            self.project_root.join(&self.managed_root),
            self.project_root.join(&self.manual_root),
        ]
    }

    pub fn cache_path(&self) -> PathBuf {
        self.project_root.join(&self.cache_file)
    }

    pub fn bootstrap_path(&self) -> PathBuf {
        self.project_root.join(&self.bootstrap_file)
    }

    /// Substring a manifest must contain before it is parsed.
    pub fn marker_needle(&self) -> String {
        format!("\"{}\"", self.marker_key)
    }

    /// Check that the root is UTF-8, names are non-empty and relative paths
    /// stay relative.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.project_root.to_str().is_none() {
            return Err(ConfigError::InvalidValue {
                key: "project_root".into(),
                message: format!("must be valid UTF-8, got '{}'", self.project_root.display()),
            });
        }
        if self.manifest_name.is_empty() || self.manifest_name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                key: "manifest_name".into(),
                message: format!("must be a bare file name, got '{}'", self.manifest_name),
            });
        }
        if self.marker_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "marker_key".into(),
                message: "must not be empty".into(),
            });
        }

        for (key, path) in [
            ("managed_root", &self.managed_root),
            ("manual_root", &self.manual_root),
            ("excluded_subtree", &self.excluded_subtree),
            ("cache_file", &self.cache_file),
            ("bootstrap_file", &self.bootstrap_file),
        ] {
            check_relative(key, path)?;
        }

        Ok(())
    }
}

fn check_relative(key: &str, path: &Path) -> ConfigResult<()> {
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if path.as_os_str().is_empty() || escapes {
        return Err(ConfigError::InvalidValue {
            key: key.into(),
            message: format!(
                "must be a relative path inside the project, got '{}'",
                path.display()
            ),
        });
    }
    Ok(())
}
