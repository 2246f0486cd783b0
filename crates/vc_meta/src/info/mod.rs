//! Per-field and per-class mapping metadata.
//!
//! ## Menu
//!
//! - [`TypeDescriptor`]: the parsed declared type of a field.
//! - [`SerializeDirectives`] / [`DeserializeDirectives`]: ignore, rename and optional flags.
//! - [`FieldMeta`]: declared type, directives and hooks of one field.
//! - [`ClassMeta`]: the ordered [`FieldMeta`]s of a class plus its factory.

// -----------------------------------------------------------------------------
// Modules

mod class_meta;
mod directives;
mod field_meta;
mod type_desc;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use class_meta::namespace_of;

pub use class_meta::ClassMeta;
pub use directives::{DeserializeDirectives, DeserializeFlags};
pub use directives::{SerializeDirectives, SerializeFlags};
pub use field_meta::FieldMeta;
pub use type_desc::{TypeDescriptor, TypeKind};
