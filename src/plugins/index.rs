//! The extension index and its cache file.

use std::collections::BTreeMap;
use std::fs::Permissions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::PluginError;
use super::manifest::PluginDescriptor;

/// Extension name to descriptor.
///
/// Ordered by name so the cache file is byte-stable for a given set of
/// descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionIndex {
    entries: BTreeMap<String, PluginDescriptor>,
}

impl ExtensionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor keyed by its name. A previous entry with the same
    /// name is replaced and returned.
    pub fn insert(&mut self, descriptor: PluginDescriptor) -> Option<PluginDescriptor> {
        self.entries
            .insert(descriptor.name().to_string(), descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.entries.values()
    }

    pub fn to_json(&self) -> Result<String, PluginError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Read a cache file. Returns `None` when the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>, PluginError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| PluginError::CacheParse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Replace the cache file. The new content is written to a sibling
    /// temporary file and renamed over the target, so readers see either the
    /// old file or the new one.
    pub fn write(&self, path: &Path) -> Result<(), PluginError> {
        let json = self.to_json()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        if let Some(permissions) = cache_permissions(path)? {
            tmp.as_file().set_permissions(permissions)?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Permissions for a freshly written cache: those of the file being
/// replaced, or world-readable when there is none. Temporary files are
/// created owner-only.
fn cache_permissions(path: &Path) -> Result<Option<Permissions>, PluginError> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

impl FromIterator<PluginDescriptor> for ExtensionIndex {
    fn from_iter<T: IntoIterator<Item = PluginDescriptor>>(iter: T) -> Self {
        let mut index = Self::new();
        for descriptor in iter {
            index.insert(descriptor);
        }
        index
    }
}

impl<'a> IntoIterator for &'a ExtensionIndex {
    type Item = (&'a String, &'a PluginDescriptor);
    type IntoIter = std::collections::btree_map::Iter<'a, String, PluginDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
