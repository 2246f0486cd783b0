//! The native side of a mapping: objects, handles and dynamically typed values.
//!
//! ## Menu
//!
//! - [`Object`]: reflective field access of one class instance.
//! - [`ObjectRef`]: a shared, identity-bearing handle to any [`Object`].
//! - [`Handle`]: the typed counterpart of [`ObjectRef`].
//! - [`Native`]: a field value as seen by the drivers.
//! - [`FieldValue`]: conversion between concrete field types and [`Native`].

// -----------------------------------------------------------------------------
// Modules

mod convert;
mod native;
mod object;

// -----------------------------------------------------------------------------
// Exports

pub use convert::{ConvertError, FieldValue};
pub use native::{Native, NativeKind};
pub use object::{Handle, Object, ObjectRef};
