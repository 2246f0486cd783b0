use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::MapError;
use crate::hash::HashMap;
use crate::info::{ClassMeta, FieldMeta};
use crate::native::ObjectRef;
use crate::registry::{Class, MetadataProvider, ObjectFactory};

#[inline]
fn normalize(type_path: &str) -> &str {
    type_path.strip_prefix("::").unwrap_or(type_path)
}

// -----------------------------------------------------------------------------
// ClassRegistry

/// The central store of [`ClassMeta`], keyed by type path.
///
/// It implements both [`MetadataProvider`] and [`ObjectFactory`], so one
/// registry is all the drivers need. Type paths are accepted with or without
/// a leading `::`.
///
/// # Examples
///
/// ```
/// use vc_meta::derive::Mapped;
/// use vc_meta::registry::{ClassRegistry, ObjectFactory};
///
/// #[derive(Mapped, Default)]
/// #[mapped(type_path = "shop::Item")]
/// struct Item {
///     name: String,
/// }
///
/// let mut registry = ClassRegistry::new();
/// assert!(registry.register::<Item>());
/// assert!(!registry.register::<Item>());
///
/// assert!(registry.contains("::shop::Item"));
/// assert!(registry.create("shop::Item").unwrap().is::<Item>());
/// assert!(registry.create("shop::Missing").is_err());
/// ```
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<&'static str, ClassMeta>,
    #[cfg(feature = "auto_register")]
    pub(crate) auto_register_available: bool,
}

impl ClassRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` if no class is registered under [`T::TYPE_PATH`] yet.
    ///
    /// Returns `true` if `T` was inserted.
    ///
    /// [`T::TYPE_PATH`]: Class::TYPE_PATH
    pub fn register<T: Class>(&mut self) -> bool {
        if self.contains(T::TYPE_PATH) {
            return false;
        }
        self.try_insert(T::class_meta())
    }

    /// Inserts `meta` unless its type path is already registered.
    ///
    /// Returns `true` if `meta` was inserted.
    pub fn try_insert(&mut self, meta: ClassMeta) -> bool {
        let type_path = meta.type_path();
        if self.classes.contains_key(type_path) {
            return false;
        }
        log::debug!("register class `{type_path}`");
        self.classes.insert(type_path, meta);
        true
    }

    /// Inserts `meta`, overwriting any class with the same type path.
    pub fn insert(&mut self, meta: ClassMeta) -> Option<ClassMeta> {
        let type_path = meta.type_path();
        let old = self.classes.insert(type_path, meta);
        if old.is_some() {
            log::warn!("class `{type_path}` was registered twice, the old metadata is replaced");
        } else {
            log::debug!("register class `{type_path}`");
        }
        old
    }

    #[inline]
    pub fn get(&self, type_path: &str) -> Option<&ClassMeta> {
        self.classes.get(normalize(type_path))
    }

    #[inline]
    pub fn get_mut(&mut self, type_path: &str) -> Option<&mut ClassMeta> {
        self.classes.get_mut(normalize(type_path))
    }

    #[inline]
    pub fn contains(&self, type_path: &str) -> bool {
        self.classes.contains_key(normalize(type_path))
    }

    #[inline]
    pub fn remove(&mut self, type_path: &str) -> Option<ClassMeta> {
        self.classes.remove(normalize(type_path))
    }

    /// Iterates the registered classes in no particular order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ClassMeta> {
        self.classes.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registers every class annotated with `#[mapped(auto_register)]`.
    ///
    /// Repeated calls are cheap and do not overwrite classes registered
    /// in between.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration works on the current
    /// platform. Static registration relies on the `inventory` crate, which
    /// supports the major platforms; elsewhere this is a no-op returning
    /// `false`.
    ///
    /// ## Feature Dependency
    ///
    /// Without the `auto_register` feature this always returns `false`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vc_meta::derive::Mapped;
    /// use vc_meta::registry::ClassRegistry;
    ///
    /// #[derive(Mapped, Default)]
    /// #[mapped(auto_register)]
    /// struct Config {
    ///     name: String,
    /// }
    ///
    /// let mut registry = ClassRegistry::new();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains(<Config as vc_meta::registry::Class>::TYPE_PATH));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::register_classes(self);
            self.auto_register_available
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl MetadataProvider for ClassRegistry {
    #[inline]
    fn lookup(&self, type_path: &str, field: &str) -> Option<&FieldMeta> {
        self.get(type_path)?.field(field)
    }
}

impl ObjectFactory for ClassRegistry {
    #[inline]
    fn contains(&self, type_path: &str) -> bool {
        ClassRegistry::contains(self, type_path)
    }

    fn create(&self, type_path: &str) -> Result<ObjectRef, MapError> {
        match self.get(type_path) {
            Some(meta) => Ok(meta.create()),
            None => Err(MapError::UnknownType(String::from(normalize(type_path)))),
        }
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.classes.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// ClassRegistryArc

/// A [`ClassRegistry`] shared across threads.
///
/// Drivers borrow a registry, so take a read lock for the duration of a call:
///
/// ```
/// use vc_meta::registry::ClassRegistryArc;
/// use vc_meta::ser::SerializeDriver;
///
/// let shared = ClassRegistryArc::default();
/// let registry = shared.read();
/// let driver = SerializeDriver::new(&*registry);
/// # let _ = driver;
/// ```
#[derive(Clone, Default)]
pub struct ClassRegistryArc {
    /// The wrapped [`ClassRegistry`].
    pub internal: Arc<RwLock<ClassRegistry>>,
}

impl ClassRegistryArc {
    #[inline]
    pub fn new(registry: ClassRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`ClassRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, ClassRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`ClassRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, ClassRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ClassRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassRegistry, ClassRegistryArc};
    use crate::MapError;
    use crate::derive::Mapped;
    use crate::info::{ClassMeta, FieldMeta};
    use crate::registry::{Class, MetadataProvider, ObjectFactory};

    #[derive(Mapped, Default)]
    #[mapped(type_path = "zoo::Cat")]
    struct Cat {
        #[mapped(ty = "string")]
        name: String,
        lives: u8,
    }

    #[test]
    fn lookup_fields() {
        let mut registry = ClassRegistry::new();
        registry.register::<Cat>();

        let name = registry.lookup("zoo::Cat", "name").unwrap();
        assert_eq!(name.declared_type(), Some("string"));
        assert!(registry.lookup("zoo::Cat", "lives").is_some());
        assert!(registry.lookup("zoo::Cat", "tail").is_none());
        assert!(registry.lookup("zoo::Dog", "name").is_none());
    }

    #[test]
    fn insert_overwrites() {
        let mut registry = ClassRegistry::new();
        assert!(registry.insert(Cat::class_meta()).is_none());

        let custom = ClassMeta::new::<Cat>(Cat::TYPE_PATH, [FieldMeta::new("name")]);
        assert!(!registry.try_insert(custom.clone()));
        assert!(registry.insert(custom).is_some());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("zoo::Cat").map(|meta| meta.iter().len()), Some(1));
    }

    #[test]
    fn unknown_type() {
        let registry = ClassRegistry::new();
        assert!(!ObjectFactory::contains(&registry, "::zoo::Cat"));
        assert_eq!(
            registry.create("::zoo::Cat").err(),
            Some(MapError::UnknownType("zoo::Cat".into()))
        );
    }

    #[test]
    fn shared_registry() {
        let shared = ClassRegistryArc::default();
        let other = shared.clone();

        std::thread::spawn(move || {
            other.write().register::<Cat>();
        })
        .join()
        .unwrap();

        assert!(shared.read().contains("zoo::Cat"));
    }
}
