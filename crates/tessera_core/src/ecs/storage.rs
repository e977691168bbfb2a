//! # Component Storage
//!
//! Per-entity, per-slot storage of component instances.
//!
//! Each entity row holds one optional boxed instance per component slot
//! and a [`ComponentMask`] recording which slots are occupied:
//!
//! ```text
//!   row 0   mask 0b101   [ Some(Position), None, Some(Health) ]
//!   row 1   mask 0b010   [ None, Some(Velocity) ]
//!   row 2   mask 0b000   [ ]
//! ```
//!
//! Instances are boxed, so a reference obtained from [`ComponentStore::get`]
//! never moves when other rows or slots are added. Replacing a component
//! allocates the new instance before the old one is released, so the new
//! instance always lives at a different address.
//!
//! Capacity only grows through [`ComponentStore::resize`]; the owning world
//! resizes before it hands out an id.

use std::any::{type_name, Any};

use crate::ecs::component::Component;
use crate::ecs::entity::EntityId;
use crate::ecs::filter::{ComponentMask, MAX_COMPONENTS};
use crate::ecs::type_registry::{TypeRegistry, TypeSlot};
use crate::error::{EcsError, EcsResult};

type Slot = Option<Box<dyn Any>>;

/// Owner of every component instance in a world.
#[derive(Default)]
pub struct ComponentStore {
    /// Slot assignment for component types.
    types: TypeRegistry<dyn Component>,
    /// Instances per entity row; inner vectors grow to the highest slot used.
    rows: Vec<Vec<Slot>>,
    /// Occupied slots per entity row.
    masks: Vec<ComponentMask>,
}

impl ComponentStore {
    /// Creates an empty store with no rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry mapping component types to slots.
    #[inline]
    #[must_use]
    pub fn types(&self) -> &TypeRegistry<dyn Component> {
        &self.types
    }

    /// Number of entity rows the store can address.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.masks.len()
    }

    fn slot_of<T: Component>(&self, origin: &'static str) -> EcsResult<TypeSlot> {
        let slot = self.types.id_of::<T>();
        if slot >= MAX_COMPONENTS {
            return Err(EcsError::ComponentLimitExceeded {
                component: type_name::<T>(),
                slot,
                max: MAX_COMPONENTS,
                origin,
            });
        }
        Ok(slot)
    }

    /// Stores `component` for `id`, replacing any previous `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidComponent`] if `id` is beyond capacity and
    /// [`EcsError::ComponentLimitExceeded`] if `T` has no room in a mask.
    pub fn add<T: Component>(&mut self, id: EntityId, component: T) -> EcsResult<&mut T> {
        const ORIGIN: &str = "ComponentStore::add";

        let slot = self.slot_of::<T>(ORIGIN)?;
        let missing = EcsError::InvalidComponent {
            entity: id,
            component: type_name::<T>(),
            origin: ORIGIN,
        };
        let (Some(row), Some(mask)) = (self.rows.get_mut(id.index()), self.masks.get_mut(id.index()))
        else {
            return Err(missing);
        };

        if row.len() <= slot {
            row.resize_with(slot + 1, || None);
        }

        let fresh: Box<dyn Any> = Box::new(component);
        let previous = row[slot].replace(fresh);
        drop(previous);
        mask.insert(slot);

        row[slot]
            .as_mut()
            .and_then(|instance| instance.downcast_mut::<T>())
            .ok_or(missing)
    }

    fn instance<T: Component>(&self, id: EntityId) -> Option<&T> {
        let slot = self.types.get::<T>()?;
        self.rows
            .get(id.index())?
            .get(slot)?
            .as_ref()?
            .downcast_ref::<T>()
    }

    fn instance_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        let slot = self.types.get::<T>()?;
        self.rows
            .get_mut(id.index())?
            .get_mut(slot)?
            .as_mut()?
            .downcast_mut::<T>()
    }

    /// Borrows the `T` stored for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidComponent`] if `id` holds no `T` or is
    /// beyond capacity.
    pub fn get<T: Component>(&self, id: EntityId) -> EcsResult<&T> {
        self.instance(id).ok_or(EcsError::InvalidComponent {
            entity: id,
            component: type_name::<T>(),
            origin: "ComponentStore::get",
        })
    }

    /// Mutably borrows the `T` stored for `id`.
    ///
    /// # Errors
    ///
    /// Same as [`ComponentStore::get`].
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> EcsResult<&mut T> {
        self.instance_mut(id).ok_or(EcsError::InvalidComponent {
            entity: id,
            component: type_name::<T>(),
            origin: "ComponentStore::get_mut",
        })
    }

    /// Returns `true` if `id` holds a `T`. Never fails.
    #[must_use]
    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.types
            .get::<T>()
            .is_some_and(|slot| self.mask(id).contains(slot))
    }

    /// Releases the `T` stored for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidComponent`] if `id` holds no `T`.
    pub fn remove<T: Component>(&mut self, id: EntityId) -> EcsResult<()> {
        let missing = EcsError::InvalidComponent {
            entity: id,
            component: type_name::<T>(),
            origin: "ComponentStore::remove",
        };
        let slot = self.types.get::<T>().ok_or_else(|| missing.clone())?;
        let (Some(row), Some(mask)) = (self.rows.get_mut(id.index()), self.masks.get_mut(id.index()))
        else {
            return Err(missing);
        };

        match row.get_mut(slot).and_then(Option::take) {
            Some(_) => {
                mask.remove(slot);
                Ok(())
            }
            None => Err(missing),
        }
    }

    /// Releases every component of `id`. Out-of-range ids are ignored.
    pub fn remove_all(&mut self, id: EntityId) {
        if let (Some(row), Some(mask)) = (self.rows.get_mut(id.index()), self.masks.get_mut(id.index())) {
            row.clear();
            *mask = ComponentMask::empty();
        }
    }

    /// The occupied slots of `id`; empty for out-of-range ids.
    #[inline]
    #[must_use]
    pub fn mask(&self, id: EntityId) -> ComponentMask {
        self.masks.get(id.index()).copied().unwrap_or_default()
    }

    /// Grows the store to at least `rows` entity rows. Never shrinks.
    pub fn resize(&mut self, rows: usize) {
        if rows > self.rows.len() {
            self.rows.resize_with(rows, Vec::new);
            self.masks.resize(rows, ComponentMask::empty());
        }
    }

    /// Reserves room for `additional` more rows without adding them.
    pub fn reserve(&mut self, additional: usize) {
        self.rows.reserve(additional);
        self.masks.reserve(additional);
    }

    /// Releases every instance and drops every row.
    ///
    /// Slot assignments survive, so a type keeps its slot across clears.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.masks.clear();
    }
}

impl std::fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentStore")
            .field("rows", &self.rows.len())
            .field("types", &self.types.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Name(String);
    impl Component for Name {}

    fn id(raw: u32) -> EntityId {
        EntityId::new(raw)
    }

    #[test]
    fn test_add_get_remove() {
        let mut store = ComponentStore::new();
        store.resize(4);

        store.add(id(2), Position { x: 1.0, y: 2.0 }).unwrap();
        assert!(store.has::<Position>(id(2)));
        assert!(!store.has::<Position>(id(1)));
        assert_eq!(store.get::<Position>(id(2)).unwrap(), &Position { x: 1.0, y: 2.0 });

        store.get_mut::<Position>(id(2)).unwrap().x = 5.0;
        assert_eq!(store.get::<Position>(id(2)).unwrap().x, 5.0);

        store.remove::<Position>(id(2)).unwrap();
        assert!(!store.has::<Position>(id(2)));
        assert!(store.mask(id(2)).is_empty());
    }

    #[test]
    fn test_add_beyond_capacity_fails() {
        let mut store = ComponentStore::new();
        store.resize(1);

        let err = store.add(id(1), Name("x".into())).unwrap_err();
        assert!(matches!(err, EcsError::InvalidComponent { .. }));
    }

    #[test]
    fn test_missing_component_errors() {
        let mut store = ComponentStore::new();
        store.resize(2);

        assert!(matches!(
            store.get::<Name>(id(0)),
            Err(EcsError::InvalidComponent { .. })
        ));
        assert!(matches!(
            store.remove::<Name>(id(0)),
            Err(EcsError::InvalidComponent { .. })
        ));
        assert!(!store.has::<Name>(id(99)));
    }

    #[test]
    fn test_replace_moves_to_new_address() {
        let mut store = ComponentStore::new();
        store.resize(1);

        let first: *const Name = store.add(id(0), Name("old".into())).unwrap();
        let second: *const Name = store.add(id(0), Name("new".into())).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.get::<Name>(id(0)).unwrap(), &Name("new".into()));
    }

    #[test]
    fn test_address_stable_across_growth() {
        let mut store = ComponentStore::new();
        store.resize(1);

        let before: *const Position = store.add(id(0), Position { x: 1.0, y: 1.0 }).unwrap();
        store.resize(1024);
        for raw in 1..1024 {
            store.add(id(raw), Position { x: 0.0, y: 0.0 }).unwrap();
        }
        store.add(id(0), Name("n".into())).unwrap();

        let after: *const Position = store.get::<Position>(id(0)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_all_and_clear() {
        let mut store = ComponentStore::new();
        store.resize(2);
        store.add(id(0), Position { x: 0.0, y: 0.0 }).unwrap();
        store.add(id(0), Name("a".into())).unwrap();

        store.remove_all(id(0));
        assert!(!store.has::<Position>(id(0)));
        assert!(!store.has::<Name>(id(0)));
        store.remove_all(id(50));

        store.add(id(1), Name("b".into())).unwrap();
        store.clear();
        assert_eq!(store.capacity(), 0);
        assert!(!store.has::<Name>(id(1)));
    }

    #[test]
    fn test_resize_never_shrinks() {
        let mut store = ComponentStore::new();
        store.resize(8);
        store.resize(2);
        assert_eq!(store.capacity(), 8);
    }
}
