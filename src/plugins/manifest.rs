use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PluginError;

/// A manifest file accepted by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the manifest, i.e. the package's install directory.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn parse(&self) -> Result<PluginManifest, PluginError> {
        let content = std::fs::read_to_string(&self.path)?;
        let raw = serde_json::from_str(&content).map_err(|source| PluginError::ManifestParse {
            path: self.path.clone(),
            source,
        })?;
        Ok(PluginManifest {
            path: self.path.clone(),
            raw,
        })
    }
}

/// A parsed manifest. Only `name` and `extra.<marker-key>` are read.
#[derive(Debug, Clone)]
pub struct PluginManifest {
    path: PathBuf,
    raw: Value,
}

impl PluginManifest {
    pub fn name(&self) -> Result<&str, PluginError> {
        self.raw
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| PluginError::missing_field(&self.path, "name"))
    }

    pub fn entry_class(&self, marker_key: &str) -> Result<&str, PluginError> {
        self.raw
            .get("extra")
            .and_then(|extra| extra.get(marker_key))
            .and_then(Value::as_str)
            .ok_or_else(|| PluginError::missing_field(&self.path, format!("extra.{marker_key}")))
    }

    /// Build the descriptor, recording the install directory relative to
    /// `project_root` when the manifest lives inside it.
    pub fn to_descriptor(
        &self,
        marker_key: &str,
        project_root: &Path,
    ) -> Result<PluginDescriptor, PluginError> {
        let name = self.name()?;
        let class = self.entry_class(marker_key)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        Ok(PluginDescriptor::new(
            name,
            class,
            display_path(dir, project_root),
        ))
    }
}

/// `path` with `.` components dropped, so `./vendor/x` and `vendor/x`
/// compare equal.
pub(super) fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn display_path(dir: &Path, project_root: &Path) -> String {
    let dir = lexical(dir);
    match dir.strip_prefix(lexical(project_root)) {
        Ok(relative) => relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => dir.display().to_string(),
    }
}

/// One entry of the extension cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    name: String,
    class: String,
    path: String,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>, class: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry-point class identifier.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn install_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.path)
    }
}
