//! Items used by `vc_meta_derive` generated code. Not a public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::{Class, ClassRegistry};

    /// A registration function submitted by `#[mapped(auto_register)]`.
    pub struct AutoRegisterFn(pub fn(&mut ClassRegistry));

    inventory::collect!(AutoRegisterFn);

    /// Registers `T` without overwriting an existing class.
    pub fn register_class<T: Class>(registry: &mut ClassRegistry) {
        registry.register::<T>();
    }

    // Only runs if `inventory` works on this platform.
    fn mark_available(registry: &mut ClassRegistry) {
        registry.auto_register_available = true;
    }

    inventory::submit! {
        AutoRegisterFn(mark_available)
    }

    pub(crate) fn register_classes(registry: &mut ClassRegistry) {
        for AutoRegisterFn(func) in inventory::iter::<AutoRegisterFn> {
            func(registry);
        }
    }
}
