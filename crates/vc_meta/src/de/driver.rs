use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use vc_value::{Mapping, Value};

use super::coerce;
use super::trail::FieldTrail;
use crate::info::{DeserializeDirectives, FieldMeta, TypeDescriptor, TypeKind, namespace_of};
use crate::native::{ConvertError, Handle, Native, ObjectRef};
use crate::policy::DeserializePolicy;
use crate::registry::{Class, MetadataProvider, ObjectFactory};
use crate::{DEFAULT_MAX_DEPTH, MapError};

// -----------------------------------------------------------------------------
// DeserializeDriver

/// Builds native objects from value trees.
///
/// # Deserialization Rules
///
/// Objects are created through the [`ObjectFactory`], then every field, in
/// declaration order (or in the order of an explicit field list), is
/// assigned as follows:
///
/// 1. **Hook Priority**: if the field has a [`DeserializeHook`], the hook
///    alone decides what is assigned.
/// 2. `ignore` leaves the field at its default.
/// 3. The value is read from the `source_name` key, or the field name.
/// 4. An absent value is null for an `optional` field (or the type default
///    if the declared type is not nullable), otherwise the
///    [`DeserializePolicy`] decides. The strict policy fails with
///    [`MapError::MissingValue`].
/// 5. A present value is coerced to the declared type, see
///    [`deserialize_value`](Self::deserialize_value).
///
/// Errors are wrapped with the field they were raised in.
///
/// # Examples
///
/// ```
/// use vc_meta::{Mapping, Value};
/// use vc_meta::derive::Mapped;
/// use vc_meta::de::DeserializeDriver;
/// use vc_meta::registry::ClassRegistry;
///
/// #[derive(Mapped, Default)]
/// struct User {
///     #[mapped(ty = "string")]
///     name: String,
///     #[mapped(ty = "int", de(source_name = "years"))]
///     age: u32,
/// }
///
/// let mut registry = ClassRegistry::new();
/// registry.register::<User>();
///
/// let input: Mapping = [("name", Value::from("ann")), ("years", Value::from("41"))]
///     .into_iter()
///     .collect();
///
/// let user = DeserializeDriver::new(&registry).deserialize::<User>(&input).unwrap();
/// assert_eq!(user.read().name, "ann");
/// assert_eq!(user.read().age, 41);
/// ```
///
/// [`DeserializeHook`]: crate::de::DeserializeHook
#[derive(Clone, Copy)]
pub struct DeserializeDriver<'a> {
    provider: &'a dyn MetadataProvider,
    factory: &'a dyn ObjectFactory,
    policy: &'a dyn DeserializePolicy,
    max_depth: usize,
}

impl<'a> DeserializeDriver<'a> {
    /// Creates a driver reading metadata from and creating objects with
    /// `registry`, usually a [`ClassRegistry`](crate::registry::ClassRegistry).
    #[inline]
    pub fn new<R: MetadataProvider + ObjectFactory>(registry: &'a R) -> Self {
        Self::from_parts(registry, registry)
    }

    /// Creates a driver from a separate provider and factory.
    #[inline]
    pub fn from_parts(provider: &'a dyn MetadataProvider, factory: &'a dyn ObjectFactory) -> Self {
        Self {
            provider,
            factory,
            policy: &(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replaces the strict policy, see [`DeserializePolicy`].
    #[inline]
    pub fn with_policy(mut self, policy: &'a dyn DeserializePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Limits how many objects may be nested, see [`DEFAULT_MAX_DEPTH`].
    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn context(&self) -> DeserializeContext<'a> {
        DeserializeContext {
            driver: *self,
            trail: FieldTrail::new(),
            depth: 0,
        }
    }

    /// Creates an object of `type_path` and assigns `fields` from `src`, or
    /// all of its fields if `None`.
    pub fn deserialize_object(
        &self,
        src: &Mapping,
        type_path: &str,
        fields: Option<&[&str]>,
    ) -> Result<ObjectRef, MapError> {
        self.context().deserialize_object(src, type_path, fields)
    }

    /// Assigns `fields` of an existing `object` from `src`, or all of its
    /// fields if `None`.
    pub fn deserialize_into(
        &self,
        src: &Mapping,
        object: &ObjectRef,
        fields: Option<&[&str]>,
    ) -> Result<(), MapError> {
        self.context().deserialize_into(src, object, fields)
    }

    /// Coerces `value` to `ty`, or converts it unchanged without a type.
    pub fn deserialize_value(
        &self,
        value: &Value,
        ty: Option<&TypeDescriptor>,
    ) -> Result<Native, MapError> {
        self.context().deserialize_value(value, ty)
    }

    /// Creates a `T` from `src`.
    ///
    /// Fails with [`MapError::TypeMismatch`] if the factory registered for
    /// `T::TYPE_PATH` produces another type.
    pub fn deserialize<T: Class>(&self, src: &Mapping) -> Result<Handle<T>, MapError> {
        let object = self.deserialize_object(src, T::TYPE_PATH, None)?;
        object.downcast::<T>().ok_or_else(|| MapError::TypeMismatch {
            expected: T::TYPE_PATH.to_string(),
            found: object.type_path(),
            field: String::from("<root>"),
        })
    }
}

// -----------------------------------------------------------------------------
// DeserializeContext

/// The state of one top-level deserialization call.
///
/// Hooks receive the context to deserialize nested values with the same
/// policy and depth limit.
pub struct DeserializeContext<'a> {
    driver: DeserializeDriver<'a>,
    trail: FieldTrail,
    depth: usize,
}

impl<'a> DeserializeContext<'a> {
    #[inline]
    pub fn provider(&self) -> &'a dyn MetadataProvider {
        self.driver.provider
    }

    #[inline]
    pub fn factory(&self) -> &'a dyn ObjectFactory {
        self.driver.factory
    }

    /// The field currently being assigned, `<root>` outside of any object.
    #[inline]
    pub fn current_field(&self) -> &str {
        self.trail.current()
    }

    /// Number of objects currently being populated.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Creates an object of `type_path` and assigns `fields` from `src`.
    pub fn deserialize_object(
        &mut self,
        src: &Mapping,
        type_path: &str,
        fields: Option<&[&str]>,
    ) -> Result<ObjectRef, MapError> {
        let object = self.driver.factory.create(type_path)?;
        self.deserialize_into(src, &object, fields)?;
        Ok(object)
    }

    /// Assigns `fields` of an existing `object` from `src`.
    pub fn deserialize_into(
        &mut self,
        src: &Mapping,
        object: &ObjectRef,
        fields: Option<&[&str]>,
    ) -> Result<(), MapError> {
        if self.depth >= self.driver.max_depth {
            return Err(MapError::DepthLimitExceeded {
                limit: self.driver.max_depth,
            });
        }

        self.depth += 1;
        let result = self.deserialize_fields(src, object, fields);
        self.depth -= 1;
        result
    }

    /// Coerces `value` to `ty`.
    ///
    /// - Without a type the value is converted unchanged.
    /// - Null is kept for nullable types; otherwise the policy decides, and
    ///   the strict policy fails with [`MapError::NullNotAllowed`].
    /// - Arrays require a sequence or mapping and coerce each element, keeping
    ///   keys and order.
    /// - `string`, `int` and `float` cast scalars loosely and reject
    ///   structured values. `bool` accepts anything by truthiness.
    /// - `array` and `object` take containers as they are.
    /// - Date/time accepts Unix timestamps and date strings.
    /// - Classes require a mapping and are deserialized recursively.
    pub fn deserialize_value(
        &mut self,
        value: &Value,
        ty: Option<&TypeDescriptor>,
    ) -> Result<Native, MapError> {
        let Some(ty) = ty else {
            return Ok(Native::from(value));
        };

        if value.is_null() {
            if ty.is_nullable() {
                return Ok(Native::Null);
            }
            return self
                .driver
                .policy
                .on_null_not_allowed(ty, self.driver.factory);
        }

        if let Some(element) = ty.element() {
            return match value {
                Value::Sequence(items) => items
                    .iter()
                    .map(|item| self.deserialize_value(item, Some(&element)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Native::Sequence),
                Value::Mapping(map) => map
                    .try_map(|item| self.deserialize_value(item, Some(&element)))
                    .map(Native::Mapping),
                _ => Err(self.mismatch(ty, value)),
            };
        }

        match ty.kind() {
            TypeKind::String => coerce::to_string(value)
                .map(Native::String)
                .ok_or_else(|| self.mismatch(ty, value)),
            TypeKind::Int => coerce::to_int(value)
                .map(Native::Int)
                .ok_or_else(|| self.mismatch(ty, value)),
            TypeKind::Float => coerce::to_float(value)
                .map(Native::Float)
                .ok_or_else(|| self.mismatch(ty, value)),
            TypeKind::Bool => Ok(Native::Bool(coerce::to_bool(value))),
            TypeKind::Array => match value {
                Value::Sequence(_) | Value::Mapping(_) => Ok(Native::from(value)),
                _ => Err(self.mismatch(ty, value)),
            },
            TypeKind::Object => match value {
                Value::Mapping(_) => Ok(Native::from(value)),
                _ => Err(self.mismatch(ty, value)),
            },
            TypeKind::DateTime => coerce::to_datetime(value)
                .map(Native::DateTime)
                .ok_or_else(|| MapError::InvalidTemporalValue {
                    field: self.trail.current().to_string(),
                    value: describe(value),
                }),
            TypeKind::Named(type_path) => match value {
                Value::Mapping(map) => self
                    .deserialize_object(map, type_path, None)
                    .map(Native::Object),
                _ => Err(self.mismatch(ty, value)),
            },
        }
    }

    fn mismatch(&self, ty: &TypeDescriptor, value: &Value) -> MapError {
        MapError::TypeMismatch {
            expected: ty.to_string(),
            found: value.kind().name(),
            field: self.trail.current().to_string(),
        }
    }

    fn deserialize_fields(
        &mut self,
        src: &Mapping,
        object: &ObjectRef,
        fields: Option<&[&str]>,
    ) -> Result<(), MapError> {
        let type_path = object.type_path();
        let declared = object.read().field_names();

        let names = match fields {
            Some(fields) => {
                if let Some(unknown) = fields
                    .iter()
                    .find(|&&field| !declared.iter().any(|&name| name == field))
                {
                    return Err(MapError::UnknownField {
                        type_path: type_path.to_string(),
                        field: unknown.to_string(),
                    });
                }
                fields
            }
            None => declared,
        };

        log::trace!("deserialize `{type_path}`, {} field(s)", names.len());

        for &field in names {
            self.trail.push(field);
            let result = self.deserialize_field(src, object, field);
            self.trail.pop();
            result.map_err(|err| err.in_field(type_path, field))?;
        }
        Ok(())
    }

    fn deserialize_field(
        &mut self,
        src: &Mapping,
        object: &ObjectRef,
        field: &str,
    ) -> Result<(), MapError> {
        let type_path = object.type_path();
        let provider = self.driver.provider;
        let meta = provider.lookup(type_path, field);

        if let Some(hook) = meta.and_then(FieldMeta::deserialize_hook) {
            log::trace!("`{type_path}.{field}` is assigned by hook `{}`", hook.name());
            let mut guard = object.write();
            return hook
                .call(src, &mut *guard, field, self)
                .map_err(|err| err.in_hook(hook.name()));
        }

        let directives = meta.map(FieldMeta::deserialize);
        if directives.is_some_and(DeserializeDirectives::is_ignore) {
            return Ok(());
        }

        let ty = meta.and_then(|meta| meta.type_descriptor(namespace_of(type_path)));
        let key = directives.map_or(field, |directives| directives.input_key(field));

        let native = match src.get(key) {
            Some(value) => self.deserialize_value(value, ty.as_ref())?,
            None if directives.is_some_and(DeserializeDirectives::is_optional) => match &ty {
                Some(ty) => ty.default_native(self.driver.factory)?,
                None => Native::Null,
            },
            None => self
                .driver
                .policy
                .on_no_value_provided(field, ty.as_ref(), self.driver.factory)?,
        };

        object
            .write()
            .set_field(field, native)
            .map_err(|err| assignment_error(err, type_path, field))
    }
}

fn assignment_error(err: ConvertError, type_path: &str, field: &str) -> MapError {
    match err {
        ConvertError::Mismatch { expected, found } => MapError::TypeMismatch {
            expected: expected.to_string(),
            found: found.name(),
            field: field.to_string(),
        },
        ConvertError::UnknownField(field) => MapError::UnknownField {
            type_path: type_path.to_string(),
            field,
        },
        err => MapError::custom(err),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(v) => format!("{v:?}"),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        other => other.kind().name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::DeserializeDriver;
    use crate::MapError;
    use crate::info::TypeDescriptor;
    use crate::native::Native;
    use crate::policy::Lenient;
    use crate::registry::ClassRegistry;
    use alloc::vec;
    use vc_value::{Mapping, Value};

    fn ty(raw: &str) -> TypeDescriptor {
        TypeDescriptor::parse(raw, "").unwrap()
    }

    #[test]
    fn untyped_values_pass_through() {
        let registry = ClassRegistry::new();
        let driver = DeserializeDriver::new(&registry);

        let value = Value::Sequence(vec![Value::Int(1), Value::from("a")]);
        assert_eq!(driver.deserialize_value(&value, None), Ok(Native::from(&value)));
    }

    #[test]
    fn typed_arrays() {
        let registry = ClassRegistry::new();
        let driver = DeserializeDriver::new(&registry);

        let value = Value::Sequence(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let strings = driver.deserialize_value(&value, Some(&ty("string[]")));
        assert_eq!(
            strings,
            Ok(Native::Sequence(vec![
                Native::String("1".into()),
                Native::String("2".into()),
                Native::String("3".into()),
            ]))
        );

        let err = driver
            .deserialize_value(&Value::from("x"), Some(&ty("string[]")))
            .unwrap_err();
        assert!(matches!(err, MapError::TypeMismatch { found: "string", .. }));

        let mut keyed = Mapping::new();
        keyed.insert("b", Value::from("2"));
        keyed.insert("a", Value::from("1"));
        let ints = driver.deserialize_value(&Value::Mapping(keyed), Some(&ty("int[]")));
        let mut expected = Mapping::new();
        expected.insert("b", Native::Int(2));
        expected.insert("a", Native::Int(1));
        assert_eq!(ints, Ok(Native::Mapping(expected)));
    }

    #[test]
    fn nested_arrays() {
        let registry = ClassRegistry::new();
        let driver = DeserializeDriver::new(&registry);

        let value = Value::Sequence(vec![Value::Sequence(vec![Value::from("7")])]);
        assert_eq!(
            driver.deserialize_value(&value, Some(&ty("int[][]"))),
            Ok(Native::Sequence(vec![Native::Sequence(vec![Native::Int(7)])]))
        );

        let flat = Value::Sequence(vec![Value::Int(7)]);
        assert!(matches!(
            driver.deserialize_value(&flat, Some(&ty("int[][]"))),
            Err(MapError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn structured_values_do_not_become_scalars() {
        let registry = ClassRegistry::new();
        let driver = DeserializeDriver::new(&registry);
        let seq = Value::Sequence(vec![]);

        for raw in ["string", "int", "float"] {
            assert!(matches!(
                driver.deserialize_value(&seq, Some(&ty(raw))),
                Err(MapError::TypeMismatch { .. })
            ));
        }
        assert_eq!(
            driver.deserialize_value(&seq, Some(&ty("bool"))),
            Ok(Native::Bool(false))
        );
        assert!(matches!(
            driver.deserialize_value(&seq, Some(&ty("object"))),
            Err(MapError::TypeMismatch { .. })
        ));
        assert_eq!(
            driver.deserialize_value(&seq, Some(&ty("array"))),
            Ok(Native::Sequence(vec![]))
        );
    }

    #[test]
    fn null_handling() {
        let registry = ClassRegistry::new();
        let strict = DeserializeDriver::new(&registry);

        assert_eq!(
            strict.deserialize_value(&Value::Null, Some(&ty("?int"))),
            Ok(Native::Null)
        );
        assert_eq!(
            strict.deserialize_value(&Value::Null, Some(&ty("int"))),
            Err(MapError::NullNotAllowed { ty: "int".into() })
        );
        assert_eq!(
            strict.deserialize_value(&Value::Null, None),
            Ok(Native::Null)
        );

        let lenient = strict.with_policy(&Lenient);
        assert_eq!(
            lenient.deserialize_value(&Value::Null, Some(&ty("int"))),
            Ok(Native::Int(0))
        );
    }

    #[test]
    fn invalid_datetime() {
        let registry = ClassRegistry::new();
        let driver = DeserializeDriver::new(&registry);

        assert_eq!(
            driver.deserialize_value(&Value::from("soon"), Some(&ty("DateTime"))),
            Err(MapError::InvalidTemporalValue {
                field: "<root>".into(),
                value: "\"soon\"".into(),
            })
        );
    }

    #[test]
    fn unknown_class() {
        let registry = ClassRegistry::new();
        let driver = DeserializeDriver::new(&registry);

        assert_eq!(
            driver
                .deserialize_object(&Mapping::new(), "nowhere::Thing", None)
                .unwrap_err(),
            MapError::UnknownType("nowhere::Thing".into())
        );
    }
}
