//! Building native objects from value trees.
//!
//! ## Menu
//!
//! - [`DeserializeDriver`]: the entry point, configured with a policy and a depth limit.
//! - [`DeserializeContext`]: the state of one call, handed to hooks.
//! - [`DeserializeHook`]: a per-field routine replacing the default assignment.
//! - [`DeserializePolicy`]: decisions on missing and null values.

// -----------------------------------------------------------------------------
// Modules

mod coerce;
mod driver;
mod hook;
mod trail;

// -----------------------------------------------------------------------------
// Exports

pub use crate::policy::DeserializePolicy;
pub use driver::{DeserializeContext, DeserializeDriver};
pub use hook::DeserializeHook;
