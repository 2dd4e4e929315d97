//! Fixed-capacity placement arena for decorative objects.
//!
//! Every slot exists up front; placing an object enables the lowest free slot
//! and gives it a position, releasing disables it again. The host mirrors the
//! enabled slots onto whatever objects it actually renders.

use glam::Vec3;

/// Index of an enabled slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle(usize);

impl SlotHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSlot {
    pub enabled: bool,
    pub position: Vec3,
}

#[derive(Debug, Clone)]
pub struct PlacementPool {
    slots: Vec<PlacementSlot>,
    /// Free slot indices, lowest index last so `pop` hands it out first
    free_list: Vec<usize>,
}

impl PlacementPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![
                PlacementSlot {
                    enabled: false,
                    position: Vec3::ZERO,
                };
                capacity
            ],
            free_list: (0..capacity).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub fn is_full(&self) -> bool {
        self.free_list.is_empty()
    }

    /// Enable a slot at `position`; `None` once every slot is in use
    pub fn allocate(&mut self, position: Vec3) -> Option<SlotHandle> {
        let index = self.free_list.pop()?;
        self.slots[index] = PlacementSlot {
            enabled: true,
            position,
        };
        Some(SlotHandle(index))
    }

    /// Returns false if the slot was already free
    pub fn release(&mut self, handle: SlotHandle) -> bool {
        match self.slots.get_mut(handle.0) {
            Some(slot) if slot.enabled => {
                slot.enabled = false;
                self.free_list.push(handle.0);
                // Keep the lowest free index on top
                self.free_list.sort_unstable_by(|a, b| b.cmp(a));
                true
            }
            _ => false,
        }
    }

    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.enabled = false;
        }
        self.free_list = (0..self.slots.len()).rev().collect();
    }

    pub fn get(&self, handle: SlotHandle) -> Option<&PlacementSlot> {
        self.slots.get(handle.0).filter(|slot| slot.enabled)
    }

    /// Enabled slots in index order
    pub fn active(&self) -> impl Iterator<Item = (SlotHandle, &PlacementSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.enabled)
            .map(|(i, slot)| (SlotHandle(i), slot))
    }

    pub fn slots(&self) -> &[PlacementSlot] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_lowest_first() {
        let mut pool = PlacementPool::new(3);
        let a = pool.allocate(Vec3::X).unwrap();
        let b = pool.allocate(Vec3::Y).unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.get(b).unwrap().position, Vec3::Y);
    }

    #[test]
    fn test_exhaustion() {
        let mut pool = PlacementPool::new(2);
        assert!(pool.allocate(Vec3::ZERO).is_some());
        assert!(pool.allocate(Vec3::ZERO).is_some());
        assert!(pool.is_full());
        assert!(pool.allocate(Vec3::ZERO).is_none());
    }

    #[test]
    fn test_release_reuses_slot() {
        let mut pool = PlacementPool::new(3);
        let a = pool.allocate(Vec3::X).unwrap();
        let _b = pool.allocate(Vec3::Y).unwrap();
        assert!(pool.release(a));
        assert!(!pool.release(a));
        assert!(pool.get(a).is_none());
        assert_eq!(pool.allocate(Vec3::Z).unwrap().index(), 0);
    }

    #[test]
    fn test_release_all() {
        let mut pool = PlacementPool::new(4);
        for _ in 0..4 {
            pool.allocate(Vec3::ONE);
        }
        pool.release_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.active().count(), 0);
        assert_eq!(pool.allocate(Vec3::ONE).unwrap().index(), 0);
    }

    #[test]
    fn test_zero_capacity() {
        let mut pool = PlacementPool::new(0);
        assert!(pool.allocate(Vec3::ZERO).is_none());
    }
}
