use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::type_name;
use core::fmt;

use vc_value::Mapping;

use super::DeserializeContext;
use crate::MapError;
use crate::native::Object;

type DeserializeHookFn = dyn Fn(&Mapping, &mut dyn Object, &str, &mut DeserializeContext<'_>) -> Result<(), MapError>
    + Send
    + Sync;

// -----------------------------------------------------------------------------
// DeserializeHook

/// A user routine that replaces the default assignment of one field.
///
/// The hook receives the whole source mapping, the target object, the field
/// name and the context. It decides alone whether and what to assign, and
/// may re-enter the driver through the context.
///
/// # Examples
///
/// ```
/// use vc_meta::{MapError, Mapping, Value};
/// use vc_meta::derive::Mapped;
/// use vc_meta::de::{DeserializeContext, DeserializeDriver};
/// use vc_meta::registry::ClassRegistry;
///
/// #[derive(Mapped, Default)]
/// struct Tag {
///     #[mapped(de(with = "Tag::label_in"))]
///     label: String,
/// }
///
/// impl Tag {
///     fn label_in(
///         &mut self,
///         src: &Mapping,
///         _field: &str,
///         _ctx: &mut DeserializeContext<'_>,
///     ) -> Result<(), MapError> {
///         let raw = src.get("LABEL").and_then(|v| v.as_str()).unwrap_or_default();
///         self.label = raw.to_lowercase();
///         Ok(())
///     }
/// }
///
/// let mut registry = ClassRegistry::new();
/// registry.register::<Tag>();
///
/// let src: Mapping = [("LABEL", Value::from("RED"))].into_iter().collect();
/// let tag = DeserializeDriver::new(&registry).deserialize::<Tag>(&src).unwrap();
/// assert_eq!(tag.read().label, "red");
/// ```
#[derive(Clone)]
pub struct DeserializeHook {
    name: Cow<'static, str>,
    func: Arc<DeserializeHookFn>,
}

impl DeserializeHook {
    /// Creates a hook from a type-erased routine.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&Mapping, &mut dyn Object, &str, &mut DeserializeContext<'_>) -> Result<(), MapError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Creates a hook from a method of the concrete class `T`.
    pub fn of<T: Object>(
        name: impl Into<Cow<'static, str>>,
        func: fn(&mut T, &Mapping, &str, &mut DeserializeContext<'_>) -> Result<(), MapError>,
    ) -> Self {
        Self::new(name, move |src, object, field, ctx| {
            let found = object.type_path();
            match object.as_any_mut().downcast_mut::<T>() {
                Some(object) => func(object, src, field, ctx),
                None => Err(MapError::custom(format_args!(
                    "hook expects `{}`, found `{found}`",
                    type_name::<T>(),
                ))),
            }
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn call(
        &self,
        src: &Mapping,
        object: &mut dyn Object,
        field: &str,
        ctx: &mut DeserializeContext<'_>,
    ) -> Result<(), MapError> {
        (self.func)(src, object, field, ctx)
    }
}

impl fmt::Debug for DeserializeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeserializeHook").field(&self.name).finish()
    }
}
