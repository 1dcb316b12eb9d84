//! Build/load entry point.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::FinderConfig;
use crate::extension::{Bootstrap, ClassRegistry, FileBootstrap, ResolvedExtension};
use crate::plugins::{BuildReport, ExtensionLoader, IndexBuilder, LoadReport};
use crate::{Error, Result};

/// Owns the configuration and bootstrap for one project.
///
/// `build` and `load` are independent single passes over the filesystem.
/// Running them concurrently against the same cache file is not guarded
/// here; callers that need it must serialize the calls themselves.
#[derive(Clone)]
pub struct ExtensionFinder {
    config: FinderConfig,
    bootstrap: Arc<dyn Bootstrap>,
}

impl ExtensionFinder {
    pub fn new(config: FinderConfig, bootstrap: impl Bootstrap + 'static) -> Self {
        Self {
            config,
            bootstrap: Arc::new(bootstrap),
        }
    }

    /// Finder whose classes come from `registry`, available once the
    /// project's bootstrap file exists.
    pub fn with_registry(config: FinderConfig, registry: ClassRegistry) -> Self {
        Self::new(config, FileBootstrap::new(registry))
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Rebuild the extension cache from the installed manifests.
    pub fn build(&self) -> Result<BuildReport> {
        self.config.validate()?;
        Ok(IndexBuilder::new(&self.config).build()?)
    }

    /// Load extensions keyed by their self-reported name.
    pub fn load(&self) -> Result<HashMap<String, ResolvedExtension>> {
        self.load_report().map(LoadReport::into_extensions)
    }

    /// Like [`load`](Self::load), also reporting skipped cache entries.
    pub fn load_report(&self) -> Result<LoadReport> {
        self.config.validate()?;
        Ok(ExtensionLoader::new(&self.config, self.bootstrap.as_ref()).load()?)
    }

    /// [`build`](Self::build) on tokio's blocking pool.
    pub async fn build_async(&self) -> Result<BuildReport> {
        let finder = self.clone();
        tokio::task::spawn_blocking(move || finder.build())
            .await
            .map_err(|e| Error::Runtime(format!("build task failed: {}", e)))?
    }

    /// [`load`](Self::load) on tokio's blocking pool.
    pub async fn load_async(&self) -> Result<HashMap<String, ResolvedExtension>> {
        let finder = self.clone();
        tokio::task::spawn_blocking(move || finder.load())
            .await
            .map_err(|e| Error::Runtime(format!("load task failed: {}", e)))?
    }
}

impl std::fmt::Debug for ExtensionFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionFinder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::Extension;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Foo;

    impl Extension for Foo {
        fn name(&self) -> &str {
            "acme/foo"
        }
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let package = dir.path().join("local/acme/foo");
        std::fs::create_dir_all(&package).unwrap();
        std::fs::write(
            package.join("composer.json"),
            r#"{"name":"acme/foo","extra":{"bolt-class":"Acme\\Foo\\Extension"}}"#,
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("vendor")).unwrap();
        std::fs::write(dir.path().join("vendor/autoload.php"), "<?php\n").unwrap();
        dir
    }

    fn finder(dir: &tempfile::TempDir) -> ExtensionFinder {
        let mut registry = ClassRegistry::new();
        registry.register::<Foo>("Acme\\Foo\\Extension");
        ExtensionFinder::with_registry(FinderConfig::new(dir.path()), registry)
    }

    #[test]
    fn test_build_then_load() {
        let dir = project();
        let finder = finder(&dir);

        assert!(finder.load().unwrap().is_empty());
        assert_eq!(finder.build().unwrap().index.len(), 1);

        let extensions = finder.load().unwrap();
        assert_eq!(extensions.len(), 1);
        assert_eq!(extensions["acme/foo"].name(), "acme/foo");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = project();
        let finder = ExtensionFinder::with_registry(
            FinderConfig::new(dir.path()).cache_file("../escape.json"),
            ClassRegistry::new(),
        );

        let err = finder.build().unwrap_err();
        assert!(err.is_configuration_error());
        assert!(finder.load().is_err());
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let dir = project();
        let finder = finder(&dir);

        let report = finder.build_async().await.unwrap();
        assert!(report.index.contains("acme/foo"));

        let extensions = finder.load_async().await.unwrap();
        assert!(extensions.contains_key("acme/foo"));
    }
}
