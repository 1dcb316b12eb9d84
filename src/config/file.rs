//! JSON settings file support.

use std::path::Path;

use super::{ConfigResult, FinderConfig};

impl FinderConfig {
    /// Load configuration from a JSON settings file.
    ///
    /// Missing keys take their defaults. A missing file yields the defaults.
    /// A relative `project_root` (including the default `.`) is resolved
    /// against the directory holding the file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<FinderConfig>(&content)?
        } else {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            FinderConfig::default()
        };

        if config.project_root.is_relative() {
            config.project_root = base.join(&config.project_root);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::super::{ConfigError, MissingFieldPolicy};
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_file_partial() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("finder.json");
        std::fs::write(
            &settings,
            r#"{"manual_root":"extensions","missing_field_policy":"skip"}"#,
        )
        .unwrap();

        let config = FinderConfig::from_file(&settings).unwrap();
        assert_eq!(config.manual_root, PathBuf::from("extensions"));
        assert_eq!(config.managed_root, PathBuf::from("vendor"));
        assert_eq!(config.missing_field_policy, MissingFieldPolicy::Skip);
        assert_eq!(config.project_root, dir.path().join("."));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempdir().unwrap();
        let config = FinderConfig::from_file(dir.path().join("absent.json")).unwrap();
        assert_eq!(config.cache_file, PathBuf::from("autoload.json"));
        assert!(config.project_root.starts_with(dir.path()));
    }

    #[test]
    fn test_from_file_absolute_root_kept() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("finder.json");
        std::fs::write(&settings, r#"{"project_root":"/srv/site"}"#).unwrap();

        let config = FinderConfig::from_file(&settings).unwrap();
        assert_eq!(config.project_root, PathBuf::from("/srv/site"));
    }

    #[test]
    fn test_from_file_invalid_json() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("finder.json");
        std::fs::write(&settings, "not json").unwrap();

        let err = FinderConfig::from_file(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[test]
    fn test_from_file_invalid_value() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("finder.json");
        std::fs::write(&settings, r#"{"cache_file":"../escape.json"}"#).unwrap();

        let err = FinderConfig::from_file(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
