use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ConvertError, Native};

// -----------------------------------------------------------------------------
// Object

/// Reflective field access of one class instance.
///
/// Usually implemented through [`#[derive(Mapped)]`](crate::derive::Mapped),
/// which also implements [`Class`](crate::registry::Class).
///
/// Field order of [`field_names`](Object::field_names) is the declaration
/// order, and is the order in which the drivers visit fields.
pub trait Object: Any + Send + Sync {
    /// The registered path of the runtime type, e.g. `app::model::User`.
    fn type_path(&self) -> &'static str;

    /// Names of all mapped fields, in declaration order.
    fn field_names(&self) -> &'static [&'static str];

    /// Reads a field, `None` if there is no such field.
    fn field(&self, name: &str) -> Option<Native>;

    /// Assigns a field.
    fn set_field(&mut self, name: &str, value: Native) -> Result<(), ConvertError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Object {
    /// Downcasts to the concrete type `T`.
    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcasts to the concrete type `T`.
    #[inline]
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Returns `true` if the concrete type is `T`.
    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

// -----------------------------------------------------------------------------
// ObjectRef

/// A shared, type-erased reference to an [`Object`].
///
/// Cloning an `ObjectRef` clones the reference, not the object. Two refs
/// are equal only if they point at the same object, which is the identity
/// the serializer uses for cycle detection.
///
/// Lock poisoning is ignored: a panicked writer leaves the object readable.
#[derive(Clone)]
pub struct ObjectRef {
    object: Arc<RwLock<dyn Object>>,
    any: Arc<dyn Any + Send + Sync>,
    type_path: &'static str,
}

impl ObjectRef {
    /// Moves `value` into a new shared object.
    pub fn new<T: Object>(value: T) -> Self {
        Handle::new(value).into_object_ref()
    }

    /// The type path of the referenced object, read without locking.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The address of the shared allocation, the identity of the object.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.any).cast::<()>().addr()
    }

    /// Returns `true` if both refs point at the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.addr() == other.addr()
    }

    /// Takes a read lock on the object.
    pub fn read(&self) -> RwLockReadGuard<'_, dyn Object> {
        self.object.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the object.
    pub fn write(&self) -> RwLockWriteGuard<'_, dyn Object> {
        self.object.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a typed handle if the object is a `T`.
    pub fn downcast<T: Object>(&self) -> Option<Handle<T>> {
        let inner = self.any.clone().downcast::<RwLock<T>>().ok()?;
        Some(Handle {
            inner,
            type_path: self.type_path,
        })
    }

    /// Returns `true` if the object is a `T`.
    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        self.any.is::<RwLock<T>>()
    }
}

impl PartialEq for ObjectRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef(`{}` @ {:#x})", self.type_path, self.addr())
    }
}

// -----------------------------------------------------------------------------
// Handle

/// A shared, typed reference to an object of type `T`.
///
/// Object fields that point at other objects are declared as `Handle<T>`
/// (or `Option<Handle<T>>`), which lets graphs share nodes and form cycles.
///
/// # Examples
///
/// ```
/// use vc_meta::derive::Mapped;
/// use vc_meta::native::Handle;
///
/// #[derive(Mapped, Default)]
/// struct Node {
///     value: i64,
///     next: Option<Handle<Node>>,
/// }
///
/// let node = Handle::new(Node::default());
/// node.write().next = Some(node.clone());
///
/// let next = node.read().next.clone().unwrap();
/// assert!(next.ptr_eq(&node));
/// ```
pub struct Handle<T> {
    inner: Arc<RwLock<T>>,
    type_path: &'static str,
}

impl<T: Object> Handle<T> {
    /// Moves `value` into a new shared object.
    pub fn new(value: T) -> Self {
        let type_path = value.type_path();
        Self {
            inner: Arc::new(RwLock::new(value)),
            type_path,
        }
    }

    /// Takes a read lock on the object.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the object.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles point at the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a type-erased reference to the same object.
    #[inline]
    pub fn to_object_ref(&self) -> ObjectRef {
        self.clone().into_object_ref()
    }

    /// Converts into a type-erased reference to the same object.
    pub fn into_object_ref(self) -> ObjectRef {
        let object: Arc<RwLock<dyn Object>> = self.inner.clone();
        let any: Arc<dyn Any + Send + Sync> = self.inner;
        ObjectRef {
            object,
            any,
            type_path: self.type_path,
        }
    }
}

impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            type_path: self.type_path,
        }
    }
}

/// Deep comparison, short-circuited on identity.
///
/// Comparing two distinct cyclic graphs does not terminate.
impl<T: Object + PartialEq> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(`{}` @ {:p})", self.type_path, Arc::as_ptr(&self.inner))
    }
}

#[cfg(test)]
mod tests {
    use super::{Handle, ObjectRef};
    use crate::derive::Mapped;

    #[derive(Mapped, Default, Debug, PartialEq)]
    #[mapped(type_path = "tests::Leaf")]
    struct Leaf {
        value: i64,
    }

    #[derive(Mapped, Default)]
    #[mapped(type_path = "tests::Other")]
    struct Other {}

    #[test]
    fn identity_and_downcast() {
        let leaf = Handle::new(Leaf { value: 3 });
        let a = leaf.to_object_ref();
        let b = a.clone();
        let c = ObjectRef::new(Leaf { value: 3 });

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.type_path(), "tests::Leaf");
        assert!(a.is::<Leaf>());
        assert!(!a.is::<Other>());
        assert!(a.downcast::<Other>().is_none());

        let typed = a.downcast::<Leaf>().unwrap();
        assert!(typed.ptr_eq(&leaf));

        typed.write().value = 9;
        assert_eq!(leaf.read().value, 9);
        assert_eq!(a.read().field_names(), ["value"]);
    }

    #[test]
    fn handle_eq_is_deep() {
        let a = Handle::new(Leaf { value: 1 });
        let b = Handle::new(Leaf { value: 1 });
        let c = Handle::new(Leaf { value: 2 });

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, a.clone());
    }
}
