//! # Entity Handles
//!
//! An entity is a numeric id plus the identity of the world that minted it.
//! The handle owns nothing: validity, enabled state, name and components
//! all live in the [`World`] row the id points at.
//!
//! Handles are plain values. Copies are interchangeable and stay usable
//! after the entity is removed; they simply stop being valid.

use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ecs::component::Component;
use crate::ecs::world::World;
use crate::error::EcsResult;

/// Numeric row index of an entity inside its world.
///
/// Ids are recycled: once an entity is removed its id may be handed to a
/// later entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an id from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the row index this id addresses.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-unique identity of a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldId(NonZeroU64);

impl WorldId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);

        let raw = NEXT.fetch_add(1, Ordering::Relaxed);
        // The counter starts at 1 and would need 2^64 worlds to wrap.
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0.get()
    }
}

/// Lightweight handle to an entity row owned by a [`World`].
///
/// The default handle belongs to no world; every operation on it fails
/// with [`EcsError::NotAttachedToWorld`](crate::EcsError::NotAttachedToWorld).
/// Two handles are equal when they name the same id in the same world.
///
/// The convenience methods below take the owning world explicitly and
/// forward to the matching [`World`] operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Entity {
    id: EntityId,
    world: Option<WorldId>,
}

impl Entity {
    #[inline]
    pub(crate) const fn new(id: EntityId, world: WorldId) -> Self {
        Self {
            id,
            world: Some(world),
        }
    }

    /// The entity's numeric id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> EntityId {
        self.id
    }

    /// The world that minted this handle, if any.
    #[inline]
    #[must_use]
    pub const fn world_id(self) -> Option<WorldId> {
        self.world
    }

    /// Returns `true` if the handle was minted by a world.
    #[inline]
    #[must_use]
    pub const fn is_attached(self) -> bool {
        self.world.is_some()
    }

    /// Returns `true` if the entity belongs to `world` and was not removed.
    #[must_use]
    pub fn is_valid(self, world: &World) -> bool {
        world.is_entity_valid(self)
    }

    /// Returns `true` if the entity is valid and enabled.
    #[must_use]
    pub fn is_enabled(self, world: &World) -> bool {
        world.is_entity_enabled(self)
    }

    /// Queues the entity to be enabled on the next update.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn enable(self, world: &mut World) -> EcsResult<()> {
        world.enable_entity(self)
    }

    /// Queues the entity to be disabled on the next update.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn disable(self, world: &mut World) -> EcsResult<()> {
        world.disable_entity(self)
    }

    /// Queues the entity for removal on the next update.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn remove(self, world: &mut World) -> EcsResult<()> {
        world.remove_entity(self)
    }

    /// The entity's name, if it was created with one.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn name(self, world: &World) -> EcsResult<Option<&str>> {
        world.entity_name(self)
    }

    /// Attaches `component`, replacing any previous instance of `T`.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached, the entity is invalid, or `T` does
    /// not fit in a component mask.
    pub fn add_component<T: Component>(self, world: &mut World, component: T) -> EcsResult<&mut T> {
        world.add_component(self, component)
    }

    /// Borrows the entity's `T`.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached, the entity is invalid, or it holds
    /// no `T`.
    pub fn component<T: Component>(self, world: &World) -> EcsResult<&T> {
        world.component(self)
    }

    /// Mutably borrows the entity's `T`.
    ///
    /// # Errors
    ///
    /// Same as [`Entity::component`].
    pub fn component_mut<T: Component>(self, world: &mut World) -> EcsResult<&mut T> {
        world.component_mut(self)
    }

    /// Returns `true` if the entity is valid and holds a `T`.
    #[must_use]
    pub fn has_component<T: Component>(self, world: &World) -> bool {
        world.has_component::<T>(self)
    }

    /// Detaches the entity's `T`.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached, the entity is invalid, or it holds
    /// no `T`.
    pub fn remove_component<T: Component>(self, world: &mut World) -> EcsResult<()> {
        world.remove_component::<T>(self)
    }

    /// Detaches every component of the entity.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn remove_all_components(self, world: &mut World) -> EcsResult<()> {
        world.remove_all_components(self)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.world {
            Some(world) => write!(f, "Entity({}@{})", self.id, world.raw()),
            None => write!(f, "Entity({}, detached)", self.id),
        }
    }
}
