//! # Entity Id Pool
//!
//! Recycling allocator for entity ids.
//!
//! Fresh ids are minted in increasing order starting at zero. Ids returned
//! with [`EntityPool::store`] are handed out again before any new id is
//! minted, most recently stored first.

use crate::ecs::EntityId;

/// Free-list allocator for [`EntityId`]s.
///
/// # Example
///
/// ```rust
/// use tessera_core::{EntityId, EntityPool};
///
/// let mut pool = EntityPool::new();
/// let a = pool.create();
/// let b = pool.create();
/// pool.store(a);
///
/// assert_eq!(pool.create(), a);
/// assert_eq!(pool.create(), EntityId::new(2));
/// # let _ = b;
/// ```
#[derive(Debug, Default)]
pub struct EntityPool {
    /// Ids available for reuse, popped from the back.
    free_list: Vec<EntityId>,
    /// Next id to mint when the free list is empty.
    next_id: u32,
}

impl EntityPool {
    /// Creates an empty pool whose first id is 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            free_list: Vec::new(),
            next_id: 0,
        }
    }

    /// Hands out a stored id if one exists, otherwise mints a new one.
    pub fn create(&mut self) -> EntityId {
        if let Some(id) = self.free_list.pop() {
            return id;
        }

        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Returns an id to the pool.
    ///
    /// Ids this pool never minted are ignored.
    pub fn store(&mut self, id: EntityId) {
        if id.raw() < self.next_id {
            self.free_list.push(id);
        }
    }

    /// Forgets every stored id and restarts minting at 0.
    pub fn reset(&mut self) {
        self.free_list.clear();
        self.next_id = 0;
    }

    /// Number of ids minted since the last reset.
    #[inline]
    #[must_use]
    pub const fn minted(&self) -> usize {
        self.next_id as usize
    }

    /// Number of ids waiting for reuse.
    #[inline]
    #[must_use]
    pub fn stored(&self) -> usize {
        self.free_list.len()
    }
}
