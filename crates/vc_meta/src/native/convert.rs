use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, Utc};
use thiserror::Error;
use vc_value::{Mapping, Value};

use super::{Handle, Native, NativeKind, ObjectRef};
use crate::registry::Class;

// -----------------------------------------------------------------------------
// ConvertError

/// Failure to assign a [`Native`] to a concrete field.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConvertError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: NativeKind,
    },

    #[error("{value} is out of range for `{target}`")]
    OutOfRange { value: i64, target: &'static str },

    #[error("no field named `{0}`")]
    UnknownField(String),
}

impl ConvertError {
    #[inline]
    pub fn mismatch(expected: &'static str, found: &Native) -> Self {
        Self::Mismatch {
            expected,
            found: found.kind(),
        }
    }

    #[inline]
    pub fn unknown_field(name: &str) -> Self {
        Self::UnknownField(String::from(name))
    }
}

// -----------------------------------------------------------------------------
// FieldValue

/// Conversion between a concrete field type and [`Native`].
///
/// `from_native` is strict about kinds: coercion of input data happens in the
/// deserializer according to the declared type, before a value reaches the
/// field. The only widening accepted here is integer to float.
pub trait FieldValue: Sized {
    fn to_native(&self) -> Native;

    fn from_native(native: Native) -> Result<Self, ConvertError>;
}

impl FieldValue for Native {
    #[inline]
    fn to_native(&self) -> Native {
        self.clone()
    }

    #[inline]
    fn from_native(native: Native) -> Result<Self, ConvertError> {
        Ok(native)
    }
}

impl FieldValue for bool {
    #[inline]
    fn to_native(&self) -> Native {
        Native::Bool(*self)
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::Bool(v) => Ok(v),
            other => Err(ConvertError::mismatch("bool", &other)),
        }
    }
}

macro_rules! impl_integer {
    (lossless: $($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                #[inline]
                fn to_native(&self) -> Native {
                    Native::Int(i64::from(*self))
                }

                fn from_native(native: Native) -> Result<Self, ConvertError> {
                    integer_from_native(native, stringify!($ty))
                }
            }
        )*
    };
    (wide: $($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                // Values beyond `i64` degrade to floats.
                #[inline]
                fn to_native(&self) -> Native {
                    i64::try_from(*self).map_or(Native::Float(*self as f64), Native::Int)
                }

                fn from_native(native: Native) -> Result<Self, ConvertError> {
                    integer_from_native(native, stringify!($ty))
                }
            }
        )*
    };
}

fn integer_from_native<T: TryFrom<i64>>(
    native: Native,
    target: &'static str,
) -> Result<T, ConvertError> {
    match native {
        Native::Int(value) => {
            T::try_from(value).map_err(|_| ConvertError::OutOfRange { value, target })
        }
        other => Err(ConvertError::mismatch(target, &other)),
    }
}

impl_integer!(lossless: i8, i16, i32, i64, u8, u16, u32);
impl_integer!(wide: isize, u64, usize);

impl FieldValue for f64 {
    #[inline]
    fn to_native(&self) -> Native {
        Native::Float(*self)
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::Float(v) => Ok(v),
            Native::Int(v) => Ok(v as f64),
            other => Err(ConvertError::mismatch("f64", &other)),
        }
    }
}

impl FieldValue for f32 {
    #[inline]
    fn to_native(&self) -> Native {
        Native::Float(f64::from(*self))
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::Float(v) => Ok(v as f32),
            Native::Int(v) => Ok(v as f32),
            other => Err(ConvertError::mismatch("f32", &other)),
        }
    }
}

impl FieldValue for String {
    #[inline]
    fn to_native(&self) -> Native {
        Native::String(self.clone())
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::String(v) => Ok(v),
            other => Err(ConvertError::mismatch("string", &other)),
        }
    }
}

impl FieldValue for DateTime<Utc> {
    #[inline]
    fn to_native(&self) -> Native {
        Native::DateTime(*self)
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::DateTime(v) => Ok(v),
            other => Err(ConvertError::mismatch("datetime", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_native(&self) -> Native {
        match self {
            Some(v) => v.to_native(),
            None => Native::Null,
        }
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::Null => Ok(None),
            other => T::from_native(other).map(Some),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_native(&self) -> Native {
        Native::Sequence(self.iter().map(FieldValue::to_native).collect())
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::Sequence(items) => items.into_iter().map(T::from_native).collect(),
            other => Err(ConvertError::mismatch("sequence", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Mapping<T> {
    fn to_native(&self) -> Native {
        Native::Mapping(
            self.iter()
                .map(|(key, value)| (key, value.to_native()))
                .collect(),
        )
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::Mapping(map) => map
                .into_iter()
                .map(|(key, value)| T::from_native(value).map(|value| (key, value)))
                .collect(),
            other => Err(ConvertError::mismatch("mapping", &other)),
        }
    }
}

/// Holds plain data only; objects and date/times are rejected.
impl FieldValue for Value {
    #[inline]
    fn to_native(&self) -> Native {
        Native::from(self)
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        Ok(match native {
            Native::Null => Value::Null,
            Native::Bool(v) => Value::Bool(v),
            Native::Int(v) => Value::Int(v),
            Native::Float(v) => Value::Float(v),
            Native::String(v) => Value::String(v),
            Native::Sequence(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::from_native)
                    .collect::<Result<_, _>>()?,
            ),
            Native::Mapping(map) => Value::Mapping(Mapping::from_native(Native::Mapping(map))?),
            other @ (Native::DateTime(_) | Native::Object(_)) => {
                return Err(ConvertError::mismatch("plain value", &other));
            }
        })
    }
}

impl FieldValue for ObjectRef {
    #[inline]
    fn to_native(&self) -> Native {
        Native::Object(self.clone())
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::Object(v) => Ok(v),
            other => Err(ConvertError::mismatch("object", &other)),
        }
    }
}

impl<T: Class> FieldValue for Handle<T> {
    #[inline]
    fn to_native(&self) -> Native {
        Native::Object(self.to_object_ref())
    }

    fn from_native(native: Native) -> Result<Self, ConvertError> {
        match native {
            Native::Object(object) => object
                .downcast::<T>()
                .ok_or_else(|| ConvertError::mismatch(T::TYPE_PATH, &Native::Object(object))),
            other => Err(ConvertError::mismatch(T::TYPE_PATH, &other)),
        }
    }
}
