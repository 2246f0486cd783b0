//! Native objects to value trees.
//!
//! See [`SerializeDriver`] for the rules.

// -----------------------------------------------------------------------------
// Modules

mod driver;
mod hook;

// -----------------------------------------------------------------------------
// Exports

pub use crate::policy::SerializePolicy;
pub use driver::{DateTimeFormat, SerializeContext, SerializeDriver};
pub use hook::SerializeHook;
