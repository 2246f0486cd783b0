use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::type_name;
use core::fmt;

use vc_value::Mapping;

use super::SerializeContext;
use crate::MapError;
use crate::native::Object;

type SerializeHookFn = dyn Fn(&dyn Object, &mut Mapping, &str, &mut SerializeContext<'_>) -> Result<(), MapError>
    + Send
    + Sync;

// -----------------------------------------------------------------------------
// SerializeHook

/// A user routine that replaces the default handling of one field.
///
/// The hook receives the object, the output mapping built so far, the field
/// name and the context. It may write any number of keys, and re-enter the
/// driver through the context. Directives of the field are not applied.
///
/// # Examples
///
/// ```
/// use vc_meta::{MapError, Mapping, Value};
/// use vc_meta::derive::Mapped;
/// use vc_meta::ser::SerializeContext;
///
/// #[derive(Mapped, Default)]
/// struct Tag {
///     #[mapped(ser(with = "Tag::label_out"))]
///     label: String,
/// }
///
/// impl Tag {
///     fn label_out(
///         &self,
///         output: &mut Mapping,
///         _field: &str,
///         _ctx: &mut SerializeContext<'_>,
///     ) -> Result<(), MapError> {
///         output.insert("LABEL", Value::String(self.label.to_uppercase()));
///         Ok(())
///     }
/// }
/// ```
#[derive(Clone)]
pub struct SerializeHook {
    name: Cow<'static, str>,
    func: Arc<SerializeHookFn>,
}

impl SerializeHook {
    /// Creates a hook from a type-erased routine.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&dyn Object, &mut Mapping, &str, &mut SerializeContext<'_>) -> Result<(), MapError>
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
        func: fn(&T, &mut Mapping, &str, &mut SerializeContext<'_>) -> Result<(), MapError>,
    ) -> Self {
        Self::new(name, move |object, output, field, ctx| {
            match object.as_any().downcast_ref::<T>() {
                Some(object) => func(object, output, field, ctx),
                None => Err(MapError::custom(format_args!(
                    "hook expects `{}`, found `{}`",
                    type_name::<T>(),
                    object.type_path(),
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
        object: &dyn Object,
        output: &mut Mapping,
        field: &str,
        ctx: &mut SerializeContext<'_>,
    ) -> Result<(), MapError> {
        (self.func)(object, output, field, ctx)
    }
}

impl fmt::Debug for SerializeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SerializeHook").field(&self.name).finish()
    }
}
