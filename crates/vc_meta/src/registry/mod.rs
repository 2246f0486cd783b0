//! Class registration, metadata lookup and object instantiation.
//!
//! ## Menu
//!
//! - [`Class`]: a type with mapping metadata, implemented by the derive.
//! - [`MetadataProvider`]: supplies [`FieldMeta`] per (type path, field).
//! - [`ObjectFactory`]: instantiates objects by type path.
//! - [`ClassRegistry`]: a store of [`ClassMeta`] implementing both traits.
//! - [`ClassRegistryArc`]: a registry shared across threads.
//!
//! ## auto_register
//!
//! See [`ClassRegistry::auto_register`].
//!
//! We use the [`inventory`] crate for static registration. Not every
//! platform supports it, in which case the call returns `false` and
//! classes must be registered by hand.
//!
//! [`FieldMeta`]: crate::info::FieldMeta
//! [`ClassMeta`]: crate::info::ClassMeta
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod class_registry;
mod traits;

// -----------------------------------------------------------------------------
// Exports

pub use class_registry::{ClassRegistry, ClassRegistryArc};
pub use traits::{Class, MetadataProvider, ObjectFactory};
