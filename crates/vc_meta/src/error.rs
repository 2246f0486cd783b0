use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Display;

use thiserror::Error;

// -----------------------------------------------------------------------------
// MapError

/// Errors raised by [`SerializeDriver`] and [`DeserializeDriver`].
///
/// Errors raised while a field is processed are wrapped in
/// [`MapError::Field`] with the enclosing type and field, so a failure deep
/// inside a graph reads as a chain of fields down to its [root cause].
///
/// [`SerializeDriver`]: crate::ser::SerializeDriver
/// [`DeserializeDriver`]: crate::de::DeserializeDriver
/// [root cause]: MapError::root_cause
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum MapError {
    #[error("object of type `{type_path}` references itself")]
    RecursiveReference { type_path: String },

    #[error("no value provided for field `{field}`")]
    MissingValue { field: String },

    #[error("null is not allowed for type `{ty}`")]
    NullNotAllowed { ty: String },

    #[error("expected `{expected}` for field `{field}`, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
        field: String,
    },

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("invalid date/time value for field `{field}`: {value}")]
    InvalidTemporalValue { field: String, value: String },

    #[error("type `{type_path}` has no field `{field}`")]
    UnknownField { type_path: String, field: String },

    #[error("object nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("{0}")]
    Custom(String),

    #[error("hook `{hook}` failed: {source}")]
    HookInvocation {
        hook: String,
        source: Box<MapError>,
    },

    #[error("`{type_path}.{field}`: {source}")]
    Field {
        type_path: String,
        field: String,
        source: Box<MapError>,
    },
}

impl MapError {
    /// Creates a [`MapError::Custom`], for use in hooks and policies.
    #[inline]
    pub fn custom(msg: impl Display) -> Self {
        Self::Custom(msg.to_string())
    }

    /// Wraps `self` with the field it was raised in.
    pub fn in_field(self, type_path: &str, field: &str) -> Self {
        Self::Field {
            type_path: type_path.into(),
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Wraps `self` as the failure of the hook `hook`.
    pub fn in_hook(self, hook: &str) -> Self {
        Self::HookInvocation {
            hook: hook.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field and hook context.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_meta::MapError;
    ///
    /// let err = MapError::MissingValue { field: "id".into() }
    ///     .in_field("app::User", "id")
    ///     .in_field("app::Order", "owner");
    ///
    /// assert_eq!(err.field_path(), ["owner", "id"]);
    /// assert!(matches!(err.root_cause(), MapError::MissingValue { .. }));
    /// ```
    pub fn root_cause(&self) -> &MapError {
        let mut current = self;
        loop {
            match current {
                MapError::Field { source, .. } | MapError::HookInvocation { source, .. } => {
                    current = &**source;
                }
                _ => return current,
            }
        }
    }

    /// Returns the fields this error travelled through, outermost first.
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        loop {
            match current {
                MapError::Field { field, source, .. } => {
                    path.push(field.as_str());
                    current = &**source;
                }
                MapError::HookInvocation { source, .. } => current = &**source,
                _ => return path,
            }
        }
    }

    /// Returns `true` if the root cause is a [`MapError::RecursiveReference`].
    #[inline]
    pub fn is_recursive_reference(&self) -> bool {
        matches!(self.root_cause(), MapError::RecursiveReference { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::MapError;
    use alloc::string::ToString;

    #[test]
    fn display_chains_context() {
        let err = MapError::UnknownType("a::B".into())
            .in_hook("decode_b")
            .in_field("a::A", "b");

        assert_eq!(
            err.to_string(),
            "`a::A.b`: hook `decode_b` failed: unknown type `a::B`"
        );
        assert_eq!(err.field_path(), ["b"]);
        assert_eq!(err.root_cause(), &MapError::UnknownType("a::B".into()));
    }

    #[test]
    fn bare_error_has_empty_path() {
        let err = MapError::custom("boom");
        assert!(err.field_path().is_empty());
        assert_eq!(err.root_cause().to_string(), "boom");
        assert!(!err.is_recursive_reference());
    }
}
