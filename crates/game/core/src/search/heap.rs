//! Indexed binary min-heap over grid cells.
//!
//! The heap stores only [`CellId`]s. Priorities and the back-pointer to each
//! element's slot live in a [`HeapStore`], normally the grid's search scratch
//! fields, so membership tests and priority updates are O(1) lookups followed
//! by an O(log n) sift instead of a linear scan.

use core::cmp::Ordering;

use crate::grid::{CellId, Grid};

use super::SearchError;

/// Ordering key of a heap element.
///
/// Lower `f_cost` comes first; on equal `f_cost` the lower `h_cost` (the cell
/// closer to the goal) comes first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Priority {
    pub f_cost: u32,
    pub h_cost: u32,
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            .then(self.h_cost.cmp(&other.h_cost))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Backing storage for element priorities and slot indices.
pub trait HeapStore {
    fn priority(&self, id: CellId) -> Priority;
    fn heap_index(&self, id: CellId) -> usize;
    fn set_heap_index(&mut self, id: CellId, index: usize);
}

impl HeapStore for Grid {
    fn priority(&self, id: CellId) -> Priority {
        let fields = self.scratch(id);
        Priority {
            f_cost: fields.f_cost(),
            h_cost: fields.h_cost,
        }
    }

    fn heap_index(&self, id: CellId) -> usize {
        self.scratch(id).heap_index
    }

    fn set_heap_index(&mut self, id: CellId, index: usize) {
        self.scratch_mut(id).heap_index = index;
    }
}

/// Binary min-heap of cells with in-place priority updates.
#[derive(Clone, Debug, Default)]
pub struct CellHeap {
    items: Vec<CellId>,
}

impl CellHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the minimum element without removing it.
    pub fn peek(&self) -> Option<CellId> {
        self.items.first().copied()
    }

    /// O(1) membership test: the stored index must point back at `id`.
    pub fn contains<S: HeapStore + ?Sized>(&self, store: &S, id: CellId) -> bool {
        self.items.get(store.heap_index(id)) == Some(&id)
    }

    /// Inserts `id` using its current priority. Already queued cells are ignored.
    pub fn push<S: HeapStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: CellId,
    ) -> Result<(), SearchError> {
        if self.contains(store, id) {
            return Ok(());
        }
        let index = self.items.len();
        self.items.push(id);
        store.set_heap_index(id, index);
        self.sift_up(store, index)
    }

    /// Removes and returns the minimum element.
    pub fn pop<S: HeapStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<Option<CellId>, SearchError> {
        if self.items.is_empty() {
            return Ok(None);
        }
        let top = self.items.swap_remove(0);
        store.set_heap_index(top, 0);
        if let Some(&moved) = self.items.first() {
            store.set_heap_index(moved, 0);
            self.sift_down(store, 0)?;
        }
        Ok(Some(top))
    }

    /// Restores heap order after the priority of a queued cell decreased.
    pub fn update<S: HeapStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: CellId,
    ) -> Result<(), SearchError> {
        if !self.contains(store, id) {
            return Err(SearchError::HeapCorrupted {
                operation: "update",
                cell: id,
            });
        }
        let index = store.heap_index(id);
        self.sift_up(store, index)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn swap<S: HeapStore + ?Sized>(&mut self, store: &mut S, a: usize, b: usize) {
        self.items.swap(a, b);
        store.set_heap_index(self.items[a], a);
        store.set_heap_index(self.items[b], b);
    }

    /// Verifies that the element at `index` knows where it lives.
    fn check_slot<S: HeapStore + ?Sized>(
        &self,
        store: &S,
        index: usize,
        operation: &'static str,
    ) -> Result<(), SearchError> {
        let id = self.items[index];
        if store.heap_index(id) == index {
            Ok(())
        } else {
            Err(SearchError::HeapCorrupted {
                operation,
                cell: id,
            })
        }
    }

    // A sift moves one level per iteration, so more iterations than elements
    // means the index bookkeeping is broken.
    fn sift_up<S: HeapStore + ?Sized>(
        &mut self,
        store: &mut S,
        mut index: usize,
    ) -> Result<(), SearchError> {
        let limit = self.items.len();
        let mut iterations = 0;
        while index > 0 {
            self.check_slot(store, index, "sift_up")?;
            let parent = (index - 1) / 2;
            if store.priority(self.items[index]) >= store.priority(self.items[parent]) {
                break;
            }
            self.swap(store, index, parent);
            index = parent;

            iterations += 1;
            if iterations > limit {
                return Err(SearchError::HeapCorrupted {
                    operation: "sift_up",
                    cell: self.items[index],
                });
            }
        }
        Ok(())
    }

    fn sift_down<S: HeapStore + ?Sized>(
        &mut self,
        store: &mut S,
        mut index: usize,
    ) -> Result<(), SearchError> {
        let len = self.items.len();
        let mut iterations = 0;
        loop {
            self.check_slot(store, index, "sift_down")?;
            let left = index * 2 + 1;
            let right = left + 1;
            if left >= len {
                break;
            }
            let mut child = left;
            if right < len
                && store.priority(self.items[right]) < store.priority(self.items[left])
            {
                child = right;
            }
            if store.priority(self.items[child]) >= store.priority(self.items[index]) {
                break;
            }
            self.swap(store, index, child);
            index = child;

            iterations += 1;
            if iterations > len {
                return Err(SearchError::HeapCorrupted {
                    operation: "sift_down",
                    cell: self.items[index],
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat priority table standing in for the grid's scratch fields.
    #[derive(Default)]
    struct Table {
        priorities: Vec<Priority>,
        slots: Vec<usize>,
    }

    impl Table {
        fn with(entries: &[(u32, u32)]) -> Self {
            Self {
                priorities: entries
                    .iter()
                    .map(|&(f_cost, h_cost)| Priority { f_cost, h_cost })
                    .collect(),
                slots: vec![0; entries.len()],
            }
        }
    }

    impl HeapStore for Table {
        fn priority(&self, id: CellId) -> Priority {
            self.priorities[id.index()]
        }

        fn heap_index(&self, id: CellId) -> usize {
            self.slots[id.index()]
        }

        fn set_heap_index(&mut self, id: CellId, index: usize) {
            self.slots[id.index()] = index;
        }
    }

    fn drain(heap: &mut CellHeap, table: &mut Table) -> Vec<u32> {
        let mut order = Vec::new();
        while let Some(id) = heap.pop(table).unwrap() {
            order.push(id.0);
        }
        order
    }

    #[test]
    fn pops_in_priority_order_with_h_cost_tie_break() {
        let mut table = Table::with(&[(50, 10), (30, 20), (30, 5), (70, 0), (10, 10)]);
        let mut heap = CellHeap::new();
        for id in 0..5 {
            heap.push(&mut table, CellId(id)).unwrap();
        }

        assert_eq!(heap.peek(), Some(CellId(4)));
        assert_eq!(drain(&mut heap, &mut table), vec![4, 2, 1, 0, 3]);
    }

    #[test]
    fn membership_tracks_stored_index() {
        let mut table = Table::with(&[(10, 0), (20, 0), (30, 0)]);
        let mut heap = CellHeap::new();
        heap.push(&mut table, CellId(0)).unwrap();
        heap.push(&mut table, CellId(1)).unwrap();

        assert!(heap.contains(&table, CellId(0)));
        assert!(heap.contains(&table, CellId(1)));
        assert!(!heap.contains(&table, CellId(2)));

        heap.pop(&mut table).unwrap();
        assert!(!heap.contains(&table, CellId(0)));
        assert!(heap.contains(&table, CellId(1)));
    }

    #[test]
    fn update_moves_improved_element_to_front() {
        let mut table = Table::with(&[(10, 0), (20, 0), (30, 0), (40, 0)]);
        let mut heap = CellHeap::new();
        for id in 0..4 {
            heap.push(&mut table, CellId(id)).unwrap();
        }

        table.priorities[3] = Priority {
            f_cost: 5,
            h_cost: 0,
        };
        heap.update(&mut table, CellId(3)).unwrap();

        assert_eq!(drain(&mut heap, &mut table), vec![3, 0, 1, 2]);
    }

    #[test]
    fn pushing_twice_keeps_a_single_entry() {
        let mut table = Table::with(&[(10, 0)]);
        let mut heap = CellHeap::new();
        heap.push(&mut table, CellId(0)).unwrap();
        heap.push(&mut table, CellId(0)).unwrap();
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn corrupted_index_is_reported() {
        let mut table = Table::with(&[(10, 0), (20, 0), (30, 0)]);
        let mut heap = CellHeap::new();
        for id in 0..3 {
            heap.push(&mut table, CellId(id)).unwrap();
        }

        table.slots[2] = 0;
        assert!(matches!(
            heap.update(&mut table, CellId(2)),
            Err(SearchError::HeapCorrupted { .. })
        ));
    }
}
