use std::collections::HashSet;

use crate::actor::Role;
use crate::grid::{CellId, Grid};

/// Cells an agent can enter within a fixed number of steps, in discovery order.
///
/// The origin cell is always the first member.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReachableSet {
    origin: Option<CellId>,
    order: Vec<CellId>,
    members: HashSet<CellId>,
}

impl ReachableSet {
    pub fn from_cells(origin: CellId, cells: impl IntoIterator<Item = CellId>) -> Self {
        let mut set = Self {
            origin: Some(origin),
            ..Self::default()
        };
        set.insert(origin);
        for cell in cells {
            set.insert(cell);
        }
        set
    }

    fn insert(&mut self, cell: CellId) -> bool {
        if self.members.insert(cell) {
            self.order.push(cell);
            true
        } else {
            false
        }
    }

    pub fn origin(&self) -> Option<CellId> {
        self.origin
    }

    pub fn contains(&self, cell: CellId) -> bool {
        self.members.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        self.order.iter().copied()
    }

    /// Keeps only the cells matching `keep`, preserving order.
    pub fn filtered(&self, mut keep: impl FnMut(CellId) -> bool) -> Self {
        let order: Vec<CellId> = self.order.iter().copied().filter(|&c| keep(c)).collect();
        Self {
            origin: self.origin,
            members: order.iter().copied().collect(),
            order,
        }
    }
}

/// Breadth-first expansion from `start` for `steps` layers.
///
/// A neighbour joins the set when it is traversable for `role` and its height
/// differs from the cell it was reached from by at most `jump`. This is an
/// enumeration of cells, not a shortest-path computation, and does not touch
/// the search scratch fields.
pub fn reachable_cells(
    grid: &Grid,
    start: CellId,
    role: Role,
    jump: u32,
    steps: u32,
) -> ReachableSet {
    let mut set = ReachableSet::from_cells(start, std::iter::empty());
    let mut frontier = vec![start];

    for _ in 0..steps {
        let mut next = Vec::new();
        for &cell in &frontier {
            for &neighbour in grid.neighbours(cell) {
                if set.contains(neighbour)
                    || !grid.is_traversable(neighbour, role)
                    || !grid.within_jump(cell, neighbour, jump)
                {
                    continue;
                }
                set.insert(neighbour);
                next.push(neighbour);
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    tracing::debug!(start = %start, %role, steps, cells = set.len(), "computed reachable set");
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::open_grid;
    use crate::grid::{Coord, Occupancy};

    #[test]
    fn expands_one_ring_per_step() {
        let grid = open_grid(5, 5);
        let centre = grid.cell_at(Coord::new(2, 2)).unwrap();

        assert_eq!(reachable_cells(&grid, centre, Role::Player, 1, 0).len(), 1);
        assert_eq!(reachable_cells(&grid, centre, Role::Player, 1, 1).len(), 9);
        assert_eq!(reachable_cells(&grid, centre, Role::Player, 1, 2).len(), 25);
    }

    #[test]
    fn respects_jump_and_opponents() {
        // Column 1 is a wall of height 4 except for an enemy-held cell on row 2.
        let heights = vec![1, 4, 1, 1, 4, 1, 1, 1, 1];
        let mut grid = Grid::from_heights(3, 3, &heights).unwrap();
        grid.build_adjacency(false);
        let gap = grid.cell_at(Coord::new(2, 1)).unwrap();
        grid.set_occupancy(gap, Occupancy::Occupied(Role::Enemy))
            .unwrap();

        let start = grid.cell_at(Coord::new(0, 0)).unwrap();
        let set = reachable_cells(&grid, start, Role::Player, 1, 10);
        assert_eq!(set.len(), 3);
        assert!(!set.contains(gap));
        assert_eq!(set.origin(), Some(start));

        let enemy_view = reachable_cells(&grid, start, Role::Enemy, 1, 10);
        assert_eq!(enemy_view.len(), 7);
        assert!(enemy_view.contains(gap));

        let jumper = reachable_cells(&grid, start, Role::Player, 3, 10);
        assert_eq!(jumper.len(), 8);
    }
}
