//! Extension capability, class registry and bootstrap.
//!
//! Entry-point classes named in the extension cache are resolved through a
//! [`ClassRegistry`] that the host fills at startup. A [`Bootstrap`] decides
//! whether that registry is available for a given project.

mod bootstrap;
mod registry;

pub use bootstrap::{Bootstrap, BootstrapError, FileBootstrap};
pub use registry::{ClassRegistry, Instance};

use std::sync::Arc;

use crate::plugins::PluginDescriptor;

/// Capability every loadable extension must provide.
///
/// # Example
///
/// ```rust
/// use extension_finder::extension::{ClassRegistry, Extension};
///
/// #[derive(Default)]
/// pub struct FooExtension;
///
/// impl Extension for FooExtension {
///     fn name(&self) -> &str {
///         "acme/foo"
///     }
/// }
///
/// let mut registry = ClassRegistry::new();
/// registry.register::<FooExtension>("Acme\\Foo\\Extension");
/// assert!(registry.contains("Acme\\Foo\\Extension"));
/// ```
pub trait Extension: Send + Sync {
    /// Name the extension reports for itself. Loaded extensions are keyed by
    /// this, not by the name cached at build time.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }
}

/// A loaded extension together with the cache entry it came from.
#[derive(Clone)]
pub struct ResolvedExtension {
    extension: Arc<dyn Extension>,
    descriptor: PluginDescriptor,
}

impl ResolvedExtension {
    pub fn new(extension: Box<dyn Extension>, descriptor: PluginDescriptor) -> Self {
        Self {
            extension: Arc::from(extension),
            descriptor,
        }
    }

    pub fn name(&self) -> &str {
        self.extension.name()
    }

    pub fn extension(&self) -> &Arc<dyn Extension> {
        &self.extension
    }

    pub fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }
}

impl std::fmt::Debug for ResolvedExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedExtension")
            .field("name", &self.name())
            .field("class", &self.descriptor.class())
            .field("path", &self.descriptor.path())
            .finish()
    }
}
