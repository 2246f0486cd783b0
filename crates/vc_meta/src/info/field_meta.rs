use alloc::borrow::Cow;

use crate::de::DeserializeHook;
use crate::info::{DeserializeDirectives, SerializeDirectives, TypeDescriptor};
use crate::ser::SerializeHook;

// -----------------------------------------------------------------------------
// FieldMeta

/// Mapping metadata of one field.
///
/// # Examples
///
/// ```
/// use vc_meta::info::{FieldMeta, SerializeDirectives, TypeKind};
///
/// let meta = FieldMeta::new("tags")
///     .with_type("string[]")
///     .with_serialize(SerializeDirectives::new().ignore_if_null());
///
/// let ty = meta.type_descriptor("app").unwrap();
/// assert_eq!(ty.kind(), &TypeKind::String);
/// assert_eq!(ty.array_depth(), 1);
/// assert!(meta.serialize().is_ignore_if_null());
/// ```
#[derive(Debug, Clone)]
pub struct FieldMeta {
    name: &'static str,
    ty: Option<Cow<'static, str>>,
    serialize: SerializeDirectives,
    deserialize: DeserializeDirectives,
    serialize_hook: Option<SerializeHook>,
    deserialize_hook: Option<DeserializeHook>,
}

impl FieldMeta {
    /// Creates metadata without declared type, directives or hooks.
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            ty: None,
            serialize: SerializeDirectives::new(),
            deserialize: DeserializeDirectives::new(),
            serialize_hook: None,
            deserialize_hook: None,
        }
    }

    /// Sets the raw declared type, see [`TypeDescriptor`] for the syntax.
    #[inline]
    pub fn with_type(mut self, raw: impl Into<Cow<'static, str>>) -> Self {
        self.ty = Some(raw.into());
        self
    }

    #[inline]
    pub fn with_serialize(mut self, directives: SerializeDirectives) -> Self {
        self.serialize = directives;
        self
    }

    #[inline]
    pub fn with_deserialize(mut self, directives: DeserializeDirectives) -> Self {
        self.deserialize = directives;
        self
    }

    #[inline]
    pub fn with_serialize_hook(mut self, hook: SerializeHook) -> Self {
        self.serialize_hook = Some(hook);
        self
    }

    #[inline]
    pub fn with_deserialize_hook(mut self, hook: DeserializeHook) -> Self {
        self.deserialize_hook = Some(hook);
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The raw declared type, if any.
    #[inline]
    pub fn declared_type(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    /// Parses the declared type, resolving relative class names in `namespace`.
    #[inline]
    pub fn type_descriptor(&self, namespace: &str) -> Option<TypeDescriptor> {
        self.ty
            .as_deref()
            .and_then(|raw| TypeDescriptor::parse(raw, namespace))
    }

    #[inline]
    pub const fn serialize(&self) -> &SerializeDirectives {
        &self.serialize
    }

    #[inline]
    pub const fn deserialize(&self) -> &DeserializeDirectives {
        &self.deserialize
    }

    #[inline]
    pub const fn serialize_hook(&self) -> Option<&SerializeHook> {
        self.serialize_hook.as_ref()
    }

    #[inline]
    pub const fn deserialize_hook(&self) -> Option<&DeserializeHook> {
        self.deserialize_hook.as_ref()
    }
}
