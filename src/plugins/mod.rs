//! Extension discovery, indexing and loading.
//!
//! Extensions are Composer packages whose `composer.json` declares an entry
//! class under `extra.bolt-class`. They live two levels below either the
//! managed root or the manual root:
//!
//! ```text
//! project/
//! ├── autoload.json          <- extension cache, written by build
//! ├── vendor/
//! │   ├── autoload.php       <- bootstrap file
//! │   ├── composer/          <- never scanned
//! │   └── acme/
//! │       └── foo/
//! │           └── composer.json
//! └── local/
//!     └── acme/
//!         └── bar/
//!             └── composer.json
//! ```
//!
//! [`IndexBuilder`] turns the manifests into an [`ExtensionIndex`] and
//! writes it to the cache file; [`ExtensionLoader`] reads it back and
//! instantiates the entry classes.

mod builder;
mod discovery;
mod error;
mod index;
mod loader;
mod manifest;

pub use builder::{BuildReport, IndexBuilder, SkippedManifest};
pub use discovery::ManifestScanner;
pub use error::PluginError;
pub use index::ExtensionIndex;
pub use loader::{ExtensionLoader, LoadReport, LoadSkip, SkipReason};
pub use manifest::{ManifestFile, PluginDescriptor, PluginManifest};
