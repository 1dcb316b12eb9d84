use std::path::PathBuf;

use super::ClassRegistry;
use crate::config::FinderConfig;

/// Why the class registry could not be made available.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Bootstrap file not found: {path}")]
    MissingBootstrap { path: PathBuf },

    #[error("Bootstrap failed: {message}")]
    Failed { message: String },
}

impl BootstrapError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Makes installed extension classes resolvable for a project.
///
/// A failed activation means no extensions are available; the loader
/// returns an empty result instead of an error.
pub trait Bootstrap: Send + Sync {
    fn activate(&self, config: &FinderConfig) -> Result<ClassRegistry, BootstrapError>;
}

impl<F> Bootstrap for F
where
    F: Fn(&FinderConfig) -> Result<ClassRegistry, BootstrapError> + Send + Sync,
{
    fn activate(&self, config: &FinderConfig) -> Result<ClassRegistry, BootstrapError> {
        self(config)
    }
}

/// Hands out a compiled-in registry once the project's bootstrap file
/// (`vendor/autoload.php` by default) exists.
#[derive(Debug, Clone, Default)]
pub struct FileBootstrap {
    registry: ClassRegistry,
}

impl FileBootstrap {
    pub fn new(registry: ClassRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }
}

impl Bootstrap for FileBootstrap {
    fn activate(&self, config: &FinderConfig) -> Result<ClassRegistry, BootstrapError> {
        let path = config.bootstrap_path();
        if !path.is_file() {
            return Err(BootstrapError::MissingBootstrap { path });
        }
        Ok(self.registry.clone())
    }
}
