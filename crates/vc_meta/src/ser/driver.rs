use alloc::vec::Vec;

use chrono::{DateTime, SecondsFormat, Utc};
use vc_value::{Mapping, Value};

use crate::hash::HashSet;
use crate::info::{FieldMeta, SerializeDirectives};
use crate::native::{Native, Object, ObjectRef};
use crate::policy::SerializePolicy;
use crate::registry::MetadataProvider;
use crate::{DEFAULT_MAX_DEPTH, MapError};

// -----------------------------------------------------------------------------
// DateTimeFormat

/// How [`Native::DateTime`] values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateTimeFormat {
    /// An RFC 3339 string in UTC, e.g. `2024-05-01T12:00:00Z`.
    #[default]
    Rfc3339,
    /// Seconds since the Unix epoch, a float if there are sub-seconds.
    Timestamp,
}

impl DateTimeFormat {
    /// Writes `datetime` in this format.
    pub fn format(self, datetime: &DateTime<Utc>) -> Value {
        match self {
            DateTimeFormat::Rfc3339 => {
                Value::String(datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            DateTimeFormat::Timestamp => match datetime.timestamp_subsec_nanos() {
                0 => Value::Int(datetime.timestamp()),
                nanos => Value::Float(datetime.timestamp() as f64 + f64::from(nanos) / 1e9),
            },
        }
    }
}

// -----------------------------------------------------------------------------
// SerializeDriver

/// Converts native objects into value trees.
///
/// # Serialization Rules
///
/// For every field of an object, in declaration order (or in the order of
/// an explicit field list):
///
/// 1. **Hook Priority**: if the field has a [`SerializeHook`], the hook alone
///    decides what is written.
/// 2. `ignore` skips the field.
/// 3. `ignore_if_null` skips the field while its value is null.
/// 4. Otherwise the value is written under `rename_to`, or the field name.
///
/// Scalars pass through unchanged, sequences and mappings are converted
/// element-wise, and nested objects are expanded recursively.
///
/// # Cycles
///
/// An object reached again below itself is handed to
/// [`SerializePolicy::on_recursive_reference`], which fails by default. An
/// object shared by two siblings (a diamond) is not a cycle and is written
/// twice.
///
/// # Examples
///
/// ```
/// use vc_meta::{Mapping, Value};
/// use vc_meta::derive::Mapped;
/// use vc_meta::native::Handle;
/// use vc_meta::registry::ClassRegistry;
/// use vc_meta::ser::SerializeDriver;
///
/// #[derive(Mapped, Default)]
/// struct User {
///     name: String,
///     #[mapped(ser(ignore_if_null))]
///     email: Option<String>,
/// }
///
/// let mut registry = ClassRegistry::new();
/// registry.register::<User>();
///
/// let user = Handle::new(User { name: "ann".into(), email: None });
/// let output = SerializeDriver::new(&registry)
///     .serialize_object(&user.to_object_ref(), None)
///     .unwrap();
///
/// let expected: Mapping = [("name", Value::from("ann"))].into_iter().collect();
/// assert_eq!(output, expected);
/// ```
///
/// [`SerializeHook`]: crate::ser::SerializeHook
#[derive(Clone, Copy)]
pub struct SerializeDriver<'a> {
    provider: &'a dyn MetadataProvider,
    policy: &'a dyn SerializePolicy,
    max_depth: usize,
    datetime_format: DateTimeFormat,
}

impl<'a> SerializeDriver<'a> {
    /// Creates a driver with the strict policy and default options.
    #[inline]
    pub fn new(provider: &'a dyn MetadataProvider) -> Self {
        Self {
            provider,
            policy: &(),
            max_depth: DEFAULT_MAX_DEPTH,
            datetime_format: DateTimeFormat::Rfc3339,
        }
    }

    /// Replaces the strict policy, see [`SerializePolicy`].
    #[inline]
    pub fn with_policy(mut self, policy: &'a dyn SerializePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Limits how many objects may be nested, see [`DEFAULT_MAX_DEPTH`].
    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets how date/time values are written, RFC 3339 by default.
    #[inline]
    pub fn with_datetime_format(mut self, format: DateTimeFormat) -> Self {
        self.datetime_format = format;
        self
    }

    fn context(&self) -> SerializeContext<'a> {
        SerializeContext {
            driver: *self,
            visited: HashSet::default(),
            depth: 0,
        }
    }

    /// Serializes `fields` of `object`, or all of its fields if `None`.
    pub fn serialize_object(
        &self,
        object: &ObjectRef,
        fields: Option<&[&str]>,
    ) -> Result<Mapping, MapError> {
        self.context().serialize_object(object, fields)
    }

    /// Serializes any native value.
    pub fn serialize_value(&self, value: &Native) -> Result<Value, MapError> {
        self.context().serialize_value(value)
    }
}

// -----------------------------------------------------------------------------
// SerializeContext

/// The state of one top-level serialization call.
///
/// It owns the set of objects currently being expanded. Hooks receive the
/// context and must re-enter through it, so that cycles passing through a
/// hook are still detected.
pub struct SerializeContext<'a> {
    driver: SerializeDriver<'a>,
    visited: HashSet<usize>,
    depth: usize,
}

impl<'a> SerializeContext<'a> {
    /// The metadata provider of the driver.
    #[inline]
    pub fn provider(&self) -> &'a dyn MetadataProvider {
        self.driver.provider
    }

    /// Number of objects currently being expanded.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Serializes `fields` of `object`, or all of its fields if `None`.
    ///
    /// If `object` is already being expanded, the policy decides; a
    /// non-mapping replacement yields an empty mapping.
    pub fn serialize_object(
        &mut self,
        object: &ObjectRef,
        fields: Option<&[&str]>,
    ) -> Result<Mapping, MapError> {
        if self.visited.contains(&object.addr()) {
            return match self.driver.policy.on_recursive_reference(object)? {
                Value::Mapping(map) => Ok(map),
                other => {
                    log::debug!(
                        "`{}` is already being expanded, its {} replacement is written as an empty mapping",
                        object.type_path(),
                        other.kind().name(),
                    );
                    Ok(Mapping::new())
                }
            };
        }
        self.expand(object, fields)
    }

    /// Serializes any native value.
    pub fn serialize_value(&mut self, value: &Native) -> Result<Value, MapError> {
        Ok(match value {
            Native::Null => Value::Null,
            Native::Bool(v) => Value::Bool(*v),
            Native::Int(v) => Value::Int(*v),
            Native::Float(v) => Value::Float(*v),
            Native::String(v) => Value::String(v.clone()),
            Native::DateTime(v) => self.driver.datetime_format.format(v),
            Native::Sequence(items) => Value::Sequence(
                items
                    .iter()
                    .map(|item| self.serialize_value(item))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Native::Mapping(map) => Value::Mapping(map.try_map(|item| self.serialize_value(item))?),
            Native::Object(object) => {
                if self.visited.contains(&object.addr()) {
                    return self.driver.policy.on_recursive_reference(object);
                }
                Value::Mapping(self.expand(object, None)?)
            }
        })
    }

    // The visited set holds the objects on the current path only, so
    // siblings may share an object.
    fn expand(&mut self, object: &ObjectRef, fields: Option<&[&str]>) -> Result<Mapping, MapError> {
        if self.depth >= self.driver.max_depth {
            return Err(MapError::DepthLimitExceeded {
                limit: self.driver.max_depth,
            });
        }

        let addr = object.addr();
        self.visited.insert(addr);
        self.depth += 1;

        let result = self.serialize_fields(object, fields);

        self.depth -= 1;
        self.visited.remove(&addr);
        result
    }

    fn serialize_fields(
        &mut self,
        object: &ObjectRef,
        fields: Option<&[&str]>,
    ) -> Result<Mapping, MapError> {
        let type_path = object.type_path();
        let guard = object.read();
        let names = fields.unwrap_or_else(|| guard.field_names());

        log::trace!("serialize `{type_path}`, {} field(s)", names.len());

        let mut output = Mapping::with_capacity(names.len());
        for &field in names {
            self.serialize_field(&*guard, field, &mut output)
                .map_err(|err| err.in_field(type_path, field))?;
        }
        Ok(output)
    }

    fn serialize_field(
        &mut self,
        object: &dyn Object,
        field: &str,
        output: &mut Mapping,
    ) -> Result<(), MapError> {
        let type_path = object.type_path();
        let provider = self.driver.provider;
        let meta = provider.lookup(type_path, field);

        if let Some(hook) = meta.and_then(FieldMeta::serialize_hook) {
            log::trace!("`{type_path}.{field}` is written by hook `{}`", hook.name());
            return hook
                .call(object, output, field, self)
                .map_err(|err| err.in_hook(hook.name()));
        }

        let directives = meta.map(FieldMeta::serialize);
        if directives.is_some_and(SerializeDirectives::is_ignore) {
            return Ok(());
        }

        let Some(value) = object.field(field) else {
            return Err(MapError::UnknownField {
                type_path: type_path.into(),
                field: field.into(),
            });
        };

        if value.is_null() && directives.is_some_and(SerializeDirectives::is_ignore_if_null) {
            return Ok(());
        }

        let key = directives.map_or(field, |directives| directives.output_key(field));
        let value = self.serialize_value(&value)?;
        output.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DateTimeFormat, SerializeContext, SerializeDriver};
    use crate::MapError;
    use crate::derive::Mapped;
    use crate::native::{Handle, Native};
    use crate::registry::ClassRegistry;
    use chrono::{TimeZone, Utc};
    use vc_value::{Mapping, Value};

    #[test]
    fn scalars_pass_through() {
        let registry = ClassRegistry::new();
        let driver = SerializeDriver::new(&registry);

        for (native, value) in [
            (Native::Null, Value::Null),
            (Native::Bool(true), Value::Bool(true)),
            (Native::Int(-3), Value::Int(-3)),
            (Native::Float(0.5), Value::Float(0.5)),
            (Native::String("s".into()), Value::from("s")),
        ] {
            assert_eq!(driver.serialize_value(&native), Ok(value));
        }
    }

    #[test]
    fn containers_keep_order() {
        let registry = ClassRegistry::new();
        let driver = SerializeDriver::new(&registry);

        let mut map = Mapping::new();
        map.insert("z", Native::Int(1));
        map.insert("a", Native::Sequence(vec![Native::Bool(false)]));

        let output = driver.serialize_value(&Native::Mapping(map)).unwrap();
        let output = output.as_mapping().unwrap();
        assert_eq!(output.keys().collect::<Vec<_>>(), ["z", "a"]);
        assert_eq!(output.get("a"), Some(&Value::Sequence(vec![Value::Bool(false)])));
    }

    #[test]
    fn datetime_formats() {
        let registry = ClassRegistry::new();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let rfc = SerializeDriver::new(&registry).serialize_value(&Native::DateTime(at));
        assert_eq!(rfc, Ok(Value::from("2024-05-01T12:00:00Z")));

        let stamp = SerializeDriver::new(&registry)
            .with_datetime_format(DateTimeFormat::Timestamp)
            .serialize_value(&Native::DateTime(at));
        assert_eq!(stamp, Ok(Value::Int(1_714_564_800)));

        let half = at + chrono::Duration::milliseconds(500);
        assert_eq!(
            DateTimeFormat::Timestamp.format(&half),
            Value::Float(1_714_564_800.5)
        );
    }

    #[derive(Mapped, Default)]
    #[mapped(type_path = "tests::Account")]
    struct Account {
        name: String,
        #[mapped(ser(ignore))]
        secret: String,
        #[mapped(ser(ignore, with = "Account::pin_out"))]
        pin: u16,
    }

    impl Account {
        fn pin_out(
            &self,
            output: &mut Mapping,
            _field: &str,
            _ctx: &mut SerializeContext<'_>,
        ) -> Result<(), MapError> {
            output.insert("pin", Value::from("*".repeat(self.pin.to_string().len())));
            Ok(())
        }
    }

    #[test]
    fn ignored_fields_are_not_written() {
        let mut registry = ClassRegistry::new();
        registry.register::<Account>();

        let account = Handle::new(Account {
            name: "ann".into(),
            secret: "hunter2".into(),
            pin: 1234,
        });
        let output = SerializeDriver::new(&registry)
            .serialize_object(&account.to_object_ref(), None)
            .unwrap();

        assert_eq!(output.keys().collect::<Vec<_>>(), ["name", "pin"]);
        assert!(!output.contains_key("secret"));
        assert_eq!(output.get("pin"), Some(&Value::from("****")));
    }
}
