//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use extension_finder::prelude::*;
//! ```

pub use crate::Error;
pub use crate::Result;

pub use crate::config::{FinderConfig, MissingFieldPolicy};
pub use crate::extension::{Bootstrap, ClassRegistry, Extension, ResolvedExtension};
pub use crate::finder::ExtensionFinder;
pub use crate::plugins::{BuildReport, ExtensionIndex, LoadReport, PluginDescriptor};
