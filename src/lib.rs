//! # extension-finder
//!
//! Discovers extensions installed in a Composer-style project, caches their
//! entry points in `autoload.json`, and resolves them through a class
//! registry filled by the host.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use extension_finder::{ClassRegistry, Extension, ExtensionFinder, FinderConfig};
//!
//! #[derive(Default)]
//! struct SeoExtension;
//!
//! impl Extension for SeoExtension {
//!     fn name(&self) -> &str {
//!         "acme/seo"
//!     }
//! }
//!
//! fn main() -> Result<(), extension_finder::Error> {
//!     let mut registry = ClassRegistry::new();
//!     registry.register::<SeoExtension>("Acme\\Seo\\Extension");
//!
//!     let finder = ExtensionFinder::with_registry(FinderConfig::new("/srv/site"), registry);
//!
//!     // after packages are installed or removed
//!     finder.build()?;
//!
//!     // on application start
//!     for (name, extension) in finder.load()? {
//!         println!("{} from {}", name, extension.descriptor().path());
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod extension;
pub mod finder;
pub mod plugins;
pub mod prelude;

pub use config::{ConfigError, FinderConfig, MissingFieldPolicy};
pub use extension::{
    Bootstrap, BootstrapError, ClassRegistry, Extension, FileBootstrap, Instance,
    ResolvedExtension,
};
pub use finder::ExtensionFinder;
pub use plugins::{
    BuildReport, ExtensionIndex, ExtensionLoader, IndexBuilder, LoadReport, LoadSkip,
    ManifestScanner, PluginDescriptor, PluginError, SkipReason, SkippedManifest,
};

/// Error type for extension-finder operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Manifest, cache or filesystem failure while building or loading.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A blocking task could not complete.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Installed manifests or the cache file are damaged
    Corruption,
    /// Configuration values or settings file are invalid
    Configuration,
    /// IO, runtime or other unexpected failures
    Internal,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Plugin(
                PluginError::ManifestParse { .. }
                | PluginError::MissingField { .. }
                | PluginError::CacheParse { .. },
            ) => ErrorCategory::Corruption,
            Error::Config(_) => ErrorCategory::Configuration,
            Error::Plugin(PluginError::Io(_) | PluginError::Json(_)) | Error::Runtime(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn is_corruption(&self) -> bool {
        self.category() == ErrorCategory::Corruption
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

/// Result type alias for extension-finder operations.
pub type Result<T> = std::result::Result<T, Error>;
