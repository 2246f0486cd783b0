//! Decision points the drivers delegate instead of failing outright.
//!
//! Every method has a default body returning the strict error, so a policy
//! can replace one decision and keep the others. `()` is the strict policy
//! both drivers use unless configured otherwise.

use alloc::string::ToString;

use vc_value::Value;

use crate::MapError;
use crate::info::TypeDescriptor;
use crate::native::{Native, ObjectRef};
use crate::registry::ObjectFactory;

// -----------------------------------------------------------------------------
// SerializePolicy

/// Decisions of the [`SerializeDriver`](crate::ser::SerializeDriver).
pub trait SerializePolicy {
    /// Called when `object` is reached again below itself.
    ///
    /// The returned value replaces the object in the output. Fails with
    /// [`MapError::RecursiveReference`] by default.
    fn on_recursive_reference(&self, object: &ObjectRef) -> Result<Value, MapError> {
        Err(MapError::RecursiveReference {
            type_path: object.type_path().to_string(),
        })
    }
}

impl SerializePolicy for () {}

// -----------------------------------------------------------------------------
// DeserializePolicy

/// Decisions of the [`DeserializeDriver`](crate::de::DeserializeDriver).
pub trait DeserializePolicy {
    /// Called when the input has no key for a required field.
    ///
    /// The returned value is assigned to the field. Fails with
    /// [`MapError::MissingValue`] by default.
    fn on_no_value_provided(
        &self,
        field: &str,
        ty: Option<&TypeDescriptor>,
        factory: &dyn ObjectFactory,
    ) -> Result<Native, MapError> {
        let _ = (ty, factory);
        Err(MapError::MissingValue {
            field: field.to_string(),
        })
    }

    /// Called when the input holds null for a non-nullable type.
    ///
    /// Fails with [`MapError::NullNotAllowed`] by default.
    fn on_null_not_allowed(
        &self,
        ty: &TypeDescriptor,
        factory: &dyn ObjectFactory,
    ) -> Result<Native, MapError> {
        let _ = factory;
        Err(MapError::NullNotAllowed { ty: ty.to_string() })
    }
}

impl DeserializePolicy for () {}

// -----------------------------------------------------------------------------
// Lenient

/// A policy that never fails on the decision points.
///
/// - Recursive references serialize as null.
/// - Missing and null values become the type default, see
///   [`TypeDescriptor::default_native`]. Fields without a declared type
///   become null.
///
/// # Examples
///
/// ```
/// use vc_meta::Mapping;
/// use vc_meta::derive::Mapped;
/// use vc_meta::de::DeserializeDriver;
/// use vc_meta::policy::Lenient;
/// use vc_meta::registry::ClassRegistry;
///
/// #[derive(Mapped, Default)]
/// struct Account {
///     #[mapped(ty = "int")]
///     id: i64,
///     #[mapped(ty = "string")]
///     owner: String,
/// }
///
/// let mut registry = ClassRegistry::new();
/// registry.register::<Account>();
///
/// let mut input = Mapping::new();
/// input.insert("owner", vc_meta::Value::Null);
///
/// let account = DeserializeDriver::new(&registry)
///     .with_policy(&Lenient)
///     .deserialize::<Account>(&input)
///     .unwrap();
///
/// assert_eq!(account.read().id, 0);
/// assert_eq!(account.read().owner, "");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Lenient;

impl SerializePolicy for Lenient {
    #[inline]
    fn on_recursive_reference(&self, _object: &ObjectRef) -> Result<Value, MapError> {
        Ok(Value::Null)
    }
}

impl DeserializePolicy for Lenient {
    fn on_no_value_provided(
        &self,
        _field: &str,
        ty: Option<&TypeDescriptor>,
        factory: &dyn ObjectFactory,
    ) -> Result<Native, MapError> {
        match ty {
            Some(ty) => ty.default_native(factory),
            None => Ok(Native::Null),
        }
    }

    #[inline]
    fn on_null_not_allowed(
        &self,
        ty: &TypeDescriptor,
        factory: &dyn ObjectFactory,
    ) -> Result<Native, MapError> {
        ty.default_native(factory)
    }
}
