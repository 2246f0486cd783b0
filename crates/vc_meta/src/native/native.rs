use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use chrono::{DateTime, Utc};
use vc_value::{Mapping, Value};

use super::ObjectRef;

// -----------------------------------------------------------------------------
// NativeKind

/// The variant tag of a [`Native`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    DateTime,
    Sequence,
    Mapping,
    Object,
}

impl NativeKind {
    pub const fn name(self) -> &'static str {
        match self {
            NativeKind::Null => "null",
            NativeKind::Bool => "bool",
            NativeKind::Int => "int",
            NativeKind::Float => "float",
            NativeKind::String => "string",
            NativeKind::DateTime => "datetime",
            NativeKind::Sequence => "sequence",
            NativeKind::Mapping => "mapping",
            NativeKind::Object => "object",
        }
    }
}

impl fmt::Display for NativeKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// Native

/// A dynamically typed field value.
///
/// Compared with [`Value`], a `Native` may hold a date/time and references
/// to live objects. Untyped `array` and `object` declarations deserialize to
/// the [`Sequence`](Native::Sequence) and [`Mapping`](Native::Mapping)
/// variants.
///
/// Equality of [`Native::Object`] is identity, see [`ObjectRef::ptr_eq`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Native {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Sequence(Vec<Native>),
    Mapping(Mapping<Native>),
    Object(ObjectRef),
}

impl Native {
    pub const fn kind(&self) -> NativeKind {
        match self {
            Native::Null => NativeKind::Null,
            Native::Bool(_) => NativeKind::Bool,
            Native::Int(_) => NativeKind::Int,
            Native::Float(_) => NativeKind::Float,
            Native::String(_) => NativeKind::String,
            Native::DateTime(_) => NativeKind::DateTime,
            Native::Sequence(_) => NativeKind::Sequence,
            Native::Mapping(_) => NativeKind::Mapping,
            Native::Object(_) => NativeKind::Object,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Native::Null)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Native::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Native::Object(v) => Some(v),
            _ => None,
        }
    }
}

/// Takes a value tree as-is, without any declared type.
impl From<Value> for Native {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Native::Null,
            Value::Bool(v) => Native::Bool(v),
            Value::Int(v) => Native::Int(v),
            Value::Float(v) => Native::Float(v),
            Value::String(v) => Native::String(v),
            Value::Sequence(v) => Native::Sequence(v.into_iter().map(Native::from).collect()),
            Value::Mapping(v) => Native::Mapping(
                v.into_iter()
                    .map(|(key, value)| (key, Native::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for Native {
    #[inline]
    fn from(value: &Value) -> Self {
        Native::from(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{Native, NativeKind};
    use vc_value::{Mapping, Value};

    #[test]
    fn from_value_keeps_shape() {
        let mut map = Mapping::new();
        map.insert("b", Value::Sequence(vec![Value::Int(1), Value::Null]));
        map.insert("a", Value::from("x"));

        let native = Native::from(Value::Mapping(map));
        let Native::Mapping(native) = native else {
            panic!("expected a mapping");
        };

        assert_eq!(native.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(
            native.get("b"),
            Some(&Native::Sequence(vec![Native::Int(1), Native::Null]))
        );
        assert_eq!(native.get("a").map(Native::kind), Some(NativeKind::String));
    }
}
