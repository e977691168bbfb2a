//! # System Registry
//!
//! Owns every system instance of a world, keyed by system type slot and
//! kept sorted by priority.
//!
//! Higher priorities run first. Systems with equal priority run in the
//! order they were added.
//!
//! While one of its hooks runs, a system is *checked out*: its entry stays
//! in place but the instance is lent to the caller. Checking it back in
//! fails when the entry was removed or replaced meanwhile, and the caller
//! then owns the orphaned instance.

use crate::ecs::filter::ComponentFilter;
use crate::ecs::system::{System, SystemSlot};
use crate::ecs::type_registry::TypeSlot;

/// One registered system.
#[derive(Debug)]
pub(crate) struct SystemEntry {
    pub(crate) type_slot: TypeSlot,
    pub(crate) name: &'static str,
    pub(crate) priority: i32,
    pub(crate) filter: ComponentFilter,
    /// `None` while the system is checked out.
    pub(crate) slot: Option<SystemSlot>,
}

/// Priority-ordered list of system entries.
#[derive(Debug, Default)]
pub(crate) struct SystemRegistry {
    entries: Vec<SystemEntry>,
}

impl SystemRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn position(&self, type_slot: TypeSlot) -> Option<usize> {
        self.entries.iter().position(|e| e.type_slot == type_slot)
    }

    fn entry(&self, type_slot: TypeSlot) -> Option<&SystemEntry> {
        self.entries.iter().find(|e| e.type_slot == type_slot)
    }

    /// Inserts an entry after every entry of equal or higher priority.
    ///
    /// The caller removes any previous entry of the same type first.
    pub(crate) fn insert(&mut self, entry: SystemEntry) {
        let at = self
            .entries
            .iter()
            .position(|e| e.priority < entry.priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, entry);
    }

    /// Unlinks the entry of `type_slot`. Its slot is `None` if the system
    /// is currently checked out.
    pub(crate) fn remove(&mut self, type_slot: TypeSlot) -> Option<SystemEntry> {
        let index = self.position(type_slot)?;
        Some(self.entries.remove(index))
    }

    /// Unlinks every entry, in priority order.
    pub(crate) fn drain(&mut self) -> Vec<SystemEntry> {
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn contains(&self, type_slot: TypeSlot) -> bool {
        self.position(type_slot).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Type slots of every entry, in run order.
    pub(crate) fn ordered_ids(&self) -> Vec<TypeSlot> {
        self.entries.iter().map(|e| e.type_slot).collect()
    }

    pub(crate) fn filter(&self, type_slot: TypeSlot) -> Option<ComponentFilter> {
        self.entry(type_slot).map(|e| e.filter)
    }

    /// Type slots of every system currently checked out.
    pub(crate) fn lent_ids(&self) -> Vec<TypeSlot> {
        self.entries
            .iter()
            .filter(|e| e.slot.is_none())
            .map(|e| e.type_slot)
            .collect()
    }

    pub(crate) fn get<T: System>(&self, type_slot: TypeSlot) -> Option<&T> {
        self.entry(type_slot)?.slot.as_ref()?.downcast_ref::<T>()
    }

    pub(crate) fn get_mut<T: System>(&mut self, type_slot: TypeSlot) -> Option<&mut T> {
        let index = self.position(type_slot)?;
        self.entries[index].slot.as_mut()?.downcast_mut::<T>()
    }

    /// Lends the instance of `type_slot` out of its entry.
    pub(crate) fn checkout(&mut self, type_slot: TypeSlot) -> Option<SystemSlot> {
        let index = self.position(type_slot)?;
        self.entries[index].slot.take()
    }

    /// Returns a lent instance to its entry.
    ///
    /// Gives the instance back when there is no vacant entry for it.
    pub(crate) fn checkin(&mut self, type_slot: TypeSlot, slot: SystemSlot) -> Option<SystemSlot> {
        match self
            .entries
            .iter_mut()
            .find(|e| e.type_slot == type_slot && e.slot.is_none())
        {
            Some(entry) => {
                entry.slot = Some(slot);
                None
            }
            None => Some(slot),
        }
    }
}
