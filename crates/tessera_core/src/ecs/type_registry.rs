//! # Type Registry
//!
//! Assigns a small, dense integer slot to each distinct Rust type the first
//! time it is seen.
//!
//! Each registry instance is an independent counter scoped to one root
//! category (`R`), so component types and system types are numbered
//! separately:
//!
//! ```text
//! TypeRegistry<dyn Component>:  Position -> 0, Velocity -> 1, Health -> 2
//! TypeRegistry<dyn System>:     Physics  -> 0, Render   -> 1
//! ```

use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Dense integer identity of a component or system type.
pub type TypeSlot = usize;

/// Lazy, monotonic type-to-slot map for one root category `R`.
///
/// The map sits in a `RefCell` so lookups work through shared references.
/// Like the world that owns it, a registry stays on one thread.
pub struct TypeRegistry<R: ?Sized> {
    /// Slots handed out so far, keyed by the Rust type identity.
    slots: RefCell<HashMap<TypeId, TypeSlot>>,
    /// Root category marker.
    _root: PhantomData<fn(&R)>,
}

impl<R: ?Sized> TypeRegistry<R> {
    /// Creates an empty registry. The first type seen gets slot 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
            _root: PhantomData,
        }
    }

    /// Returns the slot of `T`, allocating the next free slot on first use.
    ///
    /// Repeated calls for the same type return the same slot; distinct
    /// types never share a slot.
    pub fn id_of<T: ?Sized + 'static>(&self) -> TypeSlot {
        let mut slots = self.slots.borrow_mut();
        let next = slots.len();
        let slot = *slots.entry(TypeId::of::<T>()).or_insert(next);
        if slot == next {
            tracing::trace!(ty = type_name::<T>(), slot, "type slot assigned");
        }
        slot
    }

    /// Returns the slot of `T` without allocating one.
    #[must_use]
    pub fn get<T: ?Sized + 'static>(&self) -> Option<TypeSlot> {
        self.slots.borrow().get(&TypeId::of::<T>()).copied()
    }

    /// Number of types registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Returns `true` if no type has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: ?Sized> Default for TypeRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> fmt::Debug for TypeRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("root", &type_name::<R>())
            .field("types", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Base {}
    trait Other {}

    struct A;
    struct B;
    struct C;

    #[test]
    fn test_slots_increment_from_zero() {
        let registry: TypeRegistry<dyn Base> = TypeRegistry::new();
        assert_eq!(registry.id_of::<dyn Base>(), 0);
        assert_eq!(registry.id_of::<A>(), 1);
        assert_eq!(registry.id_of::<B>(), 2);
        assert_eq!(registry.id_of::<C>(), 3);
    }

    #[test]
    fn test_known_types_are_stable() {
        let registry: TypeRegistry<dyn Base> = TypeRegistry::new();
        let a = registry.id_of::<A>();
        let b = registry.id_of::<B>();

        for _ in 0..4 {
            assert_eq!(registry.id_of::<B>(), b);
            assert_eq!(registry.id_of::<A>(), a);
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_roots_are_independent() {
        let base: TypeRegistry<dyn Base> = TypeRegistry::new();
        let other: TypeRegistry<dyn Other> = TypeRegistry::new();

        assert_eq!(base.id_of::<A>(), 0);
        assert_eq!(other.id_of::<C>(), 0);
        assert_eq!(base.id_of::<B>(), 1);
        assert_eq!(other.id_of::<A>(), 1);
        assert_eq!(base.id_of::<C>(), 2);
        assert_eq!(other.id_of::<B>(), 2);
    }

    #[test]
    fn test_get_does_not_allocate() {
        let registry: TypeRegistry<dyn Base> = TypeRegistry::new();
        assert_eq!(registry.get::<A>(), None);
        assert!(registry.is_empty());

        let a = registry.id_of::<A>();
        assert_eq!(registry.get::<A>(), Some(a));
    }
}
