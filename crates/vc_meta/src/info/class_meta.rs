use alloc::vec::Vec;
use core::fmt;

use crate::info::FieldMeta;
use crate::native::{Object, ObjectRef};

// -----------------------------------------------------------------------------
// ClassMeta

/// Mapping metadata of one class: its fields and how to instantiate it.
///
/// Generated by [`#[derive(Mapped)]`](crate::derive::Mapped) through
/// [`Class::class_meta`](crate::registry::Class::class_meta), or built by hand
/// for types whose metadata lives elsewhere.
///
/// # Examples
///
/// ```
/// use vc_meta::derive::Mapped;
/// use vc_meta::info::{ClassMeta, FieldMeta};
///
/// #[derive(Mapped, Default)]
/// #[mapped(type_path = "geo::Point")]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// let meta = ClassMeta::new::<Point>("geo::Point", [
///     FieldMeta::new("x").with_type("float"),
///     FieldMeta::new("y").with_type("float"),
/// ]);
///
/// assert_eq!(meta.namespace(), "geo");
/// assert_eq!(meta.field("y").and_then(FieldMeta::declared_type), Some("float"));
/// assert_eq!(meta.create().type_path(), "geo::Point");
/// ```
#[derive(Clone)]
pub struct ClassMeta {
    type_path: &'static str,
    fields: Vec<FieldMeta>,
    factory: fn() -> ObjectRef,
}

fn default_object<T: Object + Default>() -> ObjectRef {
    ObjectRef::new(T::default())
}

impl ClassMeta {
    /// Creates metadata whose factory returns `T::default()`.
    pub fn new<T: Object + Default>(
        type_path: &'static str,
        fields: impl IntoIterator<Item = FieldMeta>,
    ) -> Self {
        Self {
            type_path: type_path.strip_prefix("::").unwrap_or(type_path),
            fields: fields.into_iter().collect(),
            factory: default_object::<T>,
        }
    }

    /// Replaces the factory, e.g. to pre-populate fields the input never
    /// carries.
    #[inline]
    pub fn with_factory(mut self, factory: fn() -> ObjectRef) -> Self {
        self.factory = factory;
        self
    }

    /// Replaces or appends the metadata of one field.
    pub fn with_field(mut self, field: FieldMeta) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
        self
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The type path without its last segment, used to resolve relative
    /// class names in declared types.
    #[inline]
    pub fn namespace(&self) -> &'static str {
        namespace_of(self.type_path)
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Field metadata in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldMeta> {
        self.fields.iter()
    }

    /// Instantiates a default object.
    #[inline]
    pub fn create(&self) -> ObjectRef {
        (self.factory)()
    }
}

impl fmt::Debug for ClassMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMeta")
            .field("type_path", &self.type_path)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// The type path without its last `::` segment.
#[inline]
pub(crate) fn namespace_of(type_path: &str) -> &str {
    type_path.rsplit_once("::").map_or("", |(namespace, _)| namespace)
}
