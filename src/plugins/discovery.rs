use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use super::PluginError;
use super::manifest::{ManifestFile, lexical};
use crate::config::FinderConfig;

const SCAN_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

type Entries = Box<dyn Iterator<Item = Result<PathBuf, PluginError>>>;

/// Finds extension manifests under the managed and manual roots.
pub struct ManifestScanner<'a> {
    config: &'a FinderConfig,
}

impl<'a> ManifestScanner<'a> {
    pub fn new(config: &'a FinderConfig) -> Self {
        Self { config }
    }

    /// Lazily yields manifests two levels below each root, managed root
    /// first. Missing roots yield nothing.
    pub fn scan(&self) -> impl Iterator<Item = Result<ManifestFile, PluginError>> + use<'a> {
        let config = self.config;
        let excluded = lexical(&config.project_root.join(&config.excluded_subtree));
        let needle = config.marker_needle();

        config
            .scan_roots()
            .into_iter()
            .flat_map(move |root| Self::entries(&root, &config.manifest_name))
            .filter_map(move |entry| match entry {
                Ok(path) => Self::accept(path, &excluded, &needle).transpose(),
                Err(e) => Some(Err(e)),
            })
    }

    fn entries(root: &Path, manifest_name: &str) -> Entries {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "scan root does not exist, skipping");
            return Box::new(std::iter::empty());
        }

        let Some(root_str) = root.to_str() else {
            return Box::new(std::iter::once(Err(PluginError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("scan root is not valid UTF-8: {}", root.display()),
            )))));
        };
        let pattern = format!(
            "{}/*/*/{}",
            Pattern::escape(root_str),
            Pattern::escape(manifest_name)
        );

        match glob::glob_with(&pattern, SCAN_OPTIONS) {
            Ok(paths) => Box::new(paths.map(|p| p.map_err(|e| PluginError::Io(e.into_error())))),
            Err(e) => Box::new(std::iter::once(Err(PluginError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid scan pattern '{pattern}': {e}"),
            ))))),
        }
    }

    fn accept(
        path: PathBuf,
        excluded: &Path,
        needle: &str,
    ) -> Result<Option<ManifestFile>, PluginError> {
        if !path.is_file() || lexical(&path).starts_with(excluded) {
            return Ok(None);
        }

        let content = std::fs::read(&path)?;
        if !String::from_utf8_lossy(&content).contains(needle) {
            tracing::trace!(path = %path.display(), "manifest lacks marker key");
            return Ok(None);
        }

        Ok(Some(ManifestFile::new(path)))
    }
}
