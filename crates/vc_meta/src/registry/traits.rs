use crate::MapError;
use crate::info::{ClassMeta, FieldMeta};
use crate::native::{Object, ObjectRef};

// -----------------------------------------------------------------------------
// Class

/// A type with mapping metadata.
///
/// Implemented by [`#[derive(Mapped)]`](crate::derive::Mapped).
pub trait Class: Object + Default {
    /// The registered path, `module_path!()::Ident` unless overridden with
    /// `#[mapped(type_path = "...")]`.
    const TYPE_PATH: &'static str;

    /// Builds the metadata registered for this class.
    fn class_meta() -> ClassMeta;
}

// -----------------------------------------------------------------------------
// MetadataProvider

/// Supplies field metadata to the drivers.
///
/// A missing entry is not an error: the field is handled with no declared
/// type, no directives and no hook.
pub trait MetadataProvider {
    fn lookup(&self, type_path: &str, field: &str) -> Option<&FieldMeta>;
}

// -----------------------------------------------------------------------------
// ObjectFactory

/// Resolves type paths to fresh, default-initialized objects.
///
/// This is the single point where the deserializer instantiates objects.
pub trait ObjectFactory {
    fn contains(&self, type_path: &str) -> bool;

    /// Fails with [`MapError::UnknownType`] if `type_path` is not known.
    fn create(&self, type_path: &str) -> Result<ObjectRef, MapError>;
}
