#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// `vc_meta_derive` emits `::vc_meta::...` paths, which must also resolve
// inside this crate's own tests and doc tests.
extern crate self as vc_meta;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod hash;

pub mod de;
pub mod info;
pub mod native;
pub mod policy;
pub mod registry;
pub mod ser;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::MapError;
pub use vc_meta_derive as derive;
pub use vc_value::{Mapping, Value};

/// The default limit of nested object expansions for both drivers.
///
/// Deep graphs fail with [`MapError::DepthLimitExceeded`] instead of
/// exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;
