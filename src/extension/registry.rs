//! Class registry: class identifier to constructor.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use super::Extension;

type ExtensionCtor = Arc<dyn Fn() -> Box<dyn Extension> + Send + Sync>;
type OpaqueCtor = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

#[derive(Clone)]
enum ClassEntry {
    Extension(ExtensionCtor),
    Opaque(OpaqueCtor),
}

/// A freshly constructed class instance.
pub enum Instance {
    Extension(Box<dyn Extension>),
    /// Resolvable, but does not implement [`Extension`].
    Opaque(Box<dyn Any + Send + Sync>),
}

impl Instance {
    pub fn into_extension(self) -> Option<Box<dyn Extension>> {
        match self {
            Instance::Extension(ext) => Some(ext),
            Instance::Opaque(_) => None,
        }
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instance::Extension(ext) => f.debug_tuple("Extension").field(&ext.name()).finish(),
            Instance::Opaque(_) => f.write_str("Opaque"),
        }
    }
}

/// Registry of instantiable classes, filled by the host at startup.
///
/// Class identifiers are matched exactly, ignoring one leading `\`.
#[derive(Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, ClassEntry>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension type constructed via `Default`.
    pub fn register<E>(&mut self, class: impl Into<String>) -> &mut Self
    where
        E: Extension + Default + 'static,
    {
        self.register_with(class, E::default)
    }

    /// Registers an extension constructed by `factory`.
    pub fn register_with<E, F>(&mut self, class: impl Into<String>, factory: F) -> &mut Self
    where
        E: Extension + 'static,
        F: Fn() -> E + Send + Sync + 'static,
    {
        let ctor: ExtensionCtor = Arc::new(move || Box::new(factory()) as Box<dyn Extension>);
        self.insert(class.into(), ClassEntry::Extension(ctor))
    }

    /// Registers a class that can be instantiated but is not an extension.
    pub fn register_opaque<T>(&mut self, class: impl Into<String>) -> &mut Self
    where
        T: Any + Send + Sync + Default,
    {
        let ctor: OpaqueCtor =
            Arc::new(|| Box::new(T::default()) as Box<dyn Any + Send + Sync>);
        self.insert(class.into(), ClassEntry::Opaque(ctor))
    }

    /// Merges `other` into `self`; entries in `other` win.
    pub fn extend(&mut self, other: ClassRegistry) -> &mut Self {
        self.classes.extend(other.classes);
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(normalize(class))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Constructs `class` with no arguments, or `None` if it is unknown.
    pub fn instantiate(&self, class: &str) -> Option<Instance> {
        self.classes
            .get(normalize(class))
            .map(|entry| match entry {
                ClassEntry::Extension(ctor) => Instance::Extension(ctor()),
                ClassEntry::Opaque(ctor) => Instance::Opaque(ctor()),
            })
    }

    fn insert(&mut self, class: String, entry: ClassEntry) -> &mut Self {
        let key = normalize(&class).to_string();
        self.classes.insert(key, entry);
        self
    }
}

fn normalize(class: &str) -> &str {
    class.strip_prefix('\\').unwrap_or(class)
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.classes())
            .finish()
    }
}
