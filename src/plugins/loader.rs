use std::collections::HashMap;

use super::PluginError;
use super::index::ExtensionIndex;
use super::manifest::PluginDescriptor;
use crate::config::FinderConfig;
use crate::extension::{Bootstrap, ClassRegistry, Instance, ResolvedExtension};

/// Why a cached entry produced no extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry class is not in the class registry.
    ClassUnresolvable,
    /// The entry class exists but does not implement `Extension`.
    CapabilityMismatch,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ClassUnresolvable => "class_unresolvable",
            SkipReason::CapabilityMismatch => "capability_mismatch",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSkip {
    pub descriptor: PluginDescriptor,
    pub reason: SkipReason,
}

/// Extensions keyed by self-reported name, plus the entries that were
/// skipped on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub extensions: HashMap<String, ResolvedExtension>,
    pub skipped: Vec<LoadSkip>,
}

impl LoadReport {
    pub fn into_extensions(self) -> HashMap<String, ResolvedExtension> {
        self.extensions
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

pub struct ExtensionLoader<'a> {
    config: &'a FinderConfig,
    bootstrap: &'a dyn Bootstrap,
}

impl<'a> ExtensionLoader<'a> {
    pub fn new(config: &'a FinderConfig, bootstrap: &'a dyn Bootstrap) -> Self {
        Self { config, bootstrap }
    }

    /// Load every cached extension whose class resolves.
    ///
    /// A missing cache file or an unavailable bootstrap yields an empty
    /// report. Only a corrupt cache file is an error.
    pub fn load(&self) -> Result<LoadReport, PluginError> {
        let cache_path = self.config.cache_path();
        if !cache_path.exists() {
            tracing::debug!(cache = %cache_path.display(), "no extension cache, nothing to load");
            return Ok(LoadReport::default());
        }

        let registry = match self.bootstrap.activate(self.config) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::debug!(error = %e, "bootstrap unavailable, no extensions loaded");
                return Ok(LoadReport::default());
            }
        };

        let Some(index) = ExtensionIndex::read(&cache_path)? else {
            return Ok(LoadReport::default());
        };

        let report = Self::resolve(&index, &registry);
        tracing::info!(
            loaded = report.extensions.len(),
            skipped = report.skipped.len(),
            "extensions loaded"
        );
        Ok(report)
    }

    /// Instantiate each indexed entry class through `registry`.
    pub fn resolve(index: &ExtensionIndex, registry: &ClassRegistry) -> LoadReport {
        let mut report = LoadReport::default();

        for descriptor in index.descriptors() {
            let extension = match registry.instantiate(descriptor.class()) {
                Some(Instance::Extension(extension)) => extension,
                Some(Instance::Opaque(_)) => {
                    report.skip(descriptor, SkipReason::CapabilityMismatch);
                    continue;
                }
                None => {
                    report.skip(descriptor, SkipReason::ClassUnresolvable);
                    continue;
                }
            };

            let resolved = ResolvedExtension::new(extension, descriptor.clone());
            report
                .extensions
                .insert(resolved.name().to_string(), resolved);
        }

        report
    }
}

impl LoadReport {
    fn skip(&mut self, descriptor: &PluginDescriptor, reason: SkipReason) {
        tracing::debug!(
            name = descriptor.name(),
            class = descriptor.class(),
            reason = %reason,
            "skipping cached extension"
        );
        self.skipped.push(LoadSkip {
            descriptor: descriptor.clone(),
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::{BootstrapError, Extension, FileBootstrap};
    use tempfile::tempdir;

    #[derive(Default)]
    struct Foo;

    impl Extension for Foo {
        fn name(&self) -> &str {
            "acme/foo"
        }
    }

    #[derive(Default)]
    struct Renamed;

    impl Extension for Renamed {
        fn name(&self) -> &str {
            "acme/renamed"
        }
    }

    #[derive(Default)]
    struct NotAnExtension;

    fn registry() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry
            .register::<Foo>("Acme\\Foo\\Extension")
            .register::<Renamed>("Acme\\Old\\Extension")
            .register_opaque::<NotAnExtension>("Acme\\Helper");
        registry
    }

    fn index(entries: &[(&str, &str)]) -> ExtensionIndex {
        entries
            .iter()
            .map(|(name, class)| PluginDescriptor::new(*name, *class, format!("local/{name}")))
            .collect()
    }

    #[test]
    fn test_resolve_keys_by_self_reported_name() {
        let index = index(&[
            ("acme/foo", "Acme\\Foo\\Extension"),
            ("acme/old", "Acme\\Old\\Extension"),
        ]);

        let report = ExtensionLoader::resolve(&index, &registry());
        assert!(report.skipped.is_empty());
        assert!(report.extensions.contains_key("acme/foo"));
        assert!(report.extensions.contains_key("acme/renamed"));
        assert!(!report.extensions.contains_key("acme/old"));
        assert_eq!(
            report.extensions["acme/renamed"].descriptor().name(),
            "acme/old"
        );
    }

    #[test]
    fn test_resolve_skips_unknown_class() {
        let index = index(&[("acme/gone", "Acme\\Gone\\Extension")]);

        let report = ExtensionLoader::resolve(&index, &registry());
        assert!(report.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::ClassUnresolvable);
    }

    #[test]
    fn test_resolve_skips_capability_mismatch() {
        let index = index(&[("acme/helper", "Acme\\Helper")]);

        let report = ExtensionLoader::resolve(&index, &registry());
        assert!(report.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::CapabilityMismatch);
        assert_eq!(report.skipped[0].descriptor.name(), "acme/helper");
    }

    #[test]
    fn test_resolve_duplicate_self_names_collapse() {
        // both descriptors point at classes reporting "acme/foo"
        let index = index(&[
            ("acme/foo", "Acme\\Foo\\Extension"),
            ("acme/foo-fork", "Acme\\Foo\\Extension"),
        ]);

        let report = ExtensionLoader::resolve(&index, &registry());
        assert_eq!(report.extensions.len(), 1);
        // descriptors are visited in name order, so the fork is processed last
        assert_eq!(
            report.extensions["acme/foo"].descriptor().name(),
            "acme/foo-fork"
        );
    }

    #[test]
    fn test_load_without_cache() {
        let dir = tempdir().unwrap();
        let config = FinderConfig::new(dir.path());
        let bootstrap = |_: &FinderConfig| -> Result<ClassRegistry, BootstrapError> {
            panic!("bootstrap must not run without a cache file")
        };

        let report = ExtensionLoader::new(&config, &bootstrap).load().unwrap();
        assert!(report.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_load_without_bootstrap_file() {
        let dir = tempdir().unwrap();
        let config = FinderConfig::new(dir.path());
        index(&[("acme/foo", "Acme\\Foo\\Extension")])
            .write(&config.cache_path())
            .unwrap();

        let bootstrap = FileBootstrap::new(registry());
        let report = ExtensionLoader::new(&config, &bootstrap).load().unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_load_with_failing_bootstrap() {
        let dir = tempdir().unwrap();
        let config = FinderConfig::new(dir.path());
        index(&[("acme/foo", "Acme\\Foo\\Extension")])
            .write(&config.cache_path())
            .unwrap();

        let bootstrap = |_: &FinderConfig| -> Result<ClassRegistry, BootstrapError> {
            Err(BootstrapError::failed("include failed"))
        };
        let report = ExtensionLoader::new(&config, &bootstrap).load().unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_load_resolves_cached_entries() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("vendor")).unwrap();
        std::fs::write(dir.path().join("vendor/autoload.php"), "<?php\n").unwrap();
        let config = FinderConfig::new(dir.path());
        index(&[
            ("acme/foo", "Acme\\Foo\\Extension"),
            ("acme/gone", "Acme\\Gone\\Extension"),
        ])
        .write(&config.cache_path())
        .unwrap();

        let bootstrap = FileBootstrap::new(registry());
        let report = ExtensionLoader::new(&config, &bootstrap).load().unwrap();
        assert_eq!(report.extensions.len(), 1);
        assert_eq!(report.skipped.len(), 1);

        let extensions = report.into_extensions();
        assert_eq!(extensions["acme/foo"].descriptor().path(), "local/acme/foo");
    }

    #[test]
    fn test_load_corrupt_cache() {
        let dir = tempdir().unwrap();
        let config = FinderConfig::new(dir.path());
        std::fs::write(config.cache_path(), "{ not json").unwrap();

        let bootstrap = |_: &FinderConfig| -> Result<ClassRegistry, BootstrapError> { Ok(registry()) };
        let err = ExtensionLoader::new(&config, &bootstrap).load().unwrap_err();
        assert!(matches!(err, PluginError::CacheParse { .. }));
    }
}
