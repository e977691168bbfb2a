//! # ECS Error Types
//!
//! All errors that signal misuse of the world, its entities, components
//! and systems.
//!
//! Every variant except [`EcsError::InvalidConfig`] carries an `origin`:
//! the name of the operation that detected the problem.

use thiserror::Error;

use crate::ecs::{EntityId, TypeSlot};

/// Errors that can occur in the ECS core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity id is out of range, was removed, or belongs to another world.
    #[error("{origin}: invalid entity {entity}")]
    InvalidEntity {
        /// The offending entity id.
        entity: EntityId,
        /// Operation that rejected the entity.
        origin: &'static str,
    },

    /// The component is not present on the entity, or the entity row is
    /// beyond the store's capacity.
    #[error("{origin}: invalid component {component} on entity {entity}")]
    InvalidComponent {
        /// The entity that was addressed.
        entity: EntityId,
        /// Type name of the component.
        component: &'static str,
        /// Operation that rejected the component.
        origin: &'static str,
    },

    /// The system type is not registered in the world.
    #[error("{origin}: system {system} is not registered")]
    InvalidSystem {
        /// Type name of the system.
        system: &'static str,
        /// Operation that looked the system up.
        origin: &'static str,
    },

    /// An entity with this name already exists.
    #[error("{origin}: entity name {name:?} is already in use")]
    DuplicateName {
        /// The requested name.
        name: String,
        /// Operation that rejected the name.
        origin: &'static str,
    },

    /// A handle was used without belonging to any world.
    #[error("{origin}: not attached to any world")]
    NotAttachedToWorld {
        /// Operation that needed the world.
        origin: &'static str,
    },

    /// A component type was assigned a slot beyond the mask width.
    #[error("{origin}: component {component} got slot {slot}, but masks hold only {max} slots")]
    ComponentLimitExceeded {
        /// Type name of the component.
        component: &'static str,
        /// Slot the registry assigned.
        slot: TypeSlot,
        /// Maximum number of component slots.
        max: usize,
        /// Operation that needed the slot.
        origin: &'static str,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EcsError {
    /// Returns the operation that raised this error, if recorded.
    #[must_use]
    pub const fn origin(&self) -> Option<&'static str> {
        match self {
            Self::InvalidEntity { origin, .. }
            | Self::InvalidComponent { origin, .. }
            | Self::InvalidSystem { origin, .. }
            | Self::DuplicateName { origin, .. }
            | Self::NotAttachedToWorld { origin }
            | Self::ComponentLimitExceeded { origin, .. } => Some(*origin),
            Self::InvalidConfig(_) => None,
        }
    }
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_includes_origin() {
        let err = EcsError::InvalidEntity {
            entity: EntityId::new(3),
            origin: "World::enable_entity",
        };
        assert_eq!(err.to_string(), "World::enable_entity: invalid entity 3");
        assert_eq!(err.origin(), Some("World::enable_entity"));
    }

    #[test]
    fn test_config_error_has_no_origin() {
        let err = EcsError::InvalidConfig("bad level".into());
        assert_eq!(err.origin(), None);
        assert_eq!(err.to_string(), "invalid configuration: bad level");
    }
}
