#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod hash;
mod mapping;
mod serde;
mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use mapping::{IntoIter, Iter, Mapping};
pub use value::{Value, ValueKind};
