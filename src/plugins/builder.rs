use std::path::PathBuf;

use super::PluginError;
use super::discovery::ManifestScanner;
use super::index::ExtensionIndex;
use crate::config::{FinderConfig, MissingFieldPolicy};

/// A manifest left out of the index under [`MissingFieldPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedManifest {
    pub path: PathBuf,
    pub field: String,
}

/// Result of one build pass.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub index: ExtensionIndex,
    pub skipped: Vec<SkippedManifest>,
}

/// Rebuilds the extension index from scratch on every call.
pub struct IndexBuilder<'a> {
    config: &'a FinderConfig,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(config: &'a FinderConfig) -> Self {
        Self { config }
    }

    /// Scan and parse every manifest without touching the cache file.
    pub fn collect(&self) -> Result<BuildReport, PluginError> {
        let config = self.config;
        let mut report = BuildReport::default();

        for manifest in ManifestScanner::new(config).scan() {
            let manifest = manifest?;
            let descriptor = match manifest
                .parse()?
                .to_descriptor(&config.marker_key, &config.project_root)
            {
                Ok(descriptor) => descriptor,
                Err(PluginError::MissingField { path, field })
                    if config.missing_field_policy == MissingFieldPolicy::Skip =>
                {
                    tracing::warn!(
                        path = %path.display(),
                        field = %field,
                        "skipping manifest with missing field"
                    );
                    report.skipped.push(SkippedManifest { path, field });
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(previous) = report.index.insert(descriptor) {
                tracing::debug!(
                    name = previous.name(),
                    replaced = previous.path(),
                    path = %manifest.dir().display(),
                    "duplicate extension name, keeping the later manifest"
                );
            }
        }

        Ok(report)
    }

    /// Collect the index and replace the cache file with it. Nothing is
    /// written if any manifest fails.
    pub fn build(&self) -> Result<BuildReport, PluginError> {
        let report = self.collect()?;
        let cache_path = self.config.cache_path();
        report.index.write(&cache_path)?;

        tracing::info!(
            extensions = report.index.len(),
            skipped = report.skipped.len(),
            cache = %cache_path.display(),
            "extension index built"
        );
        Ok(report)
    }
}
