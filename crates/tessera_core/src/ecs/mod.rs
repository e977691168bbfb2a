//! # Entity Component System
//!
//! Entities are ids, components are plain data, systems are behavior
//! selected by which components an entity carries.
//!
//! ## Layout
//!
//! - [`TypeRegistry`] numbers component and system types on first use
//! - [`ComponentFilter`] decides system membership from a [`ComponentMask`]
//! - [`ComponentStore`] owns every component instance
//! - [`World`] owns everything and applies queued entity actions once per
//!   update

mod component;
mod entity;
mod filter;
mod registry;
mod storage;
mod system;
mod type_registry;
mod world;

pub use component::Component;
pub use entity::{Entity, EntityId, WorldId};
pub use filter::{ComponentFilter, ComponentMask, FilterBuilder, MAX_COMPONENTS};
pub use storage::ComponentStore;
pub use system::{AsAny, EntityStatus, System, SystemContext};
pub use type_registry::{TypeRegistry, TypeSlot};
pub use world::{ActionStats, World};
