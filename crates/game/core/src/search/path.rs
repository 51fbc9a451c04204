use crate::grid::{CellId, Grid};

use super::ReachableSet;

/// Ordered route produced by a search, start cell first.
///
/// The last cell is either the requested target or the closest cell the
/// search could reach.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cells: Vec<CellId>,
    hops: u32,
}

impl Path {
    pub fn new(cells: Vec<CellId>) -> Self {
        let hops = cells.len().saturating_sub(1) as u32;
        Self { cells, hops }
    }

    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Number of steps along the path (cells minus the start cell).
    pub fn hop_count(&self) -> u32 {
        self.hops
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first(&self) -> Option<CellId> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<CellId> {
        self.cells.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.iter().copied()
    }

    /// Sum of octile distances between consecutive cells.
    pub fn path_distance(&self, grid: &Grid) -> u32 {
        self.cells
            .windows(2)
            .map(|pair| grid.distance(pair[0], pair[1]))
            .sum()
    }

    /// True only if the path ends on `target`.
    pub fn is_complete(&self, target: CellId) -> bool {
        self.last() == Some(target)
    }

    /// Truncates the path before the first cell outside `allowed`.
    pub fn restrict_to(&mut self, allowed: &ReachableSet) {
        let keep = self
            .cells
            .iter()
            .position(|cell| !allowed.contains(*cell))
            .unwrap_or(self.cells.len());
        self.cells.truncate(keep);
        self.hops = self.cells.len().saturating_sub(1) as u32;
    }
}

impl IntoIterator for Path {
    type Item = CellId;
    type IntoIter = std::vec::IntoIter<CellId>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;
    use crate::grid::tests::open_grid;

    fn cells(grid: &Grid, coords: &[(i32, i32)]) -> Vec<CellId> {
        coords
            .iter()
            .map(|&(row, column)| grid.cell_at(Coord::new(row, column)).unwrap())
            .collect()
    }

    #[test]
    fn distance_weighs_diagonals() {
        let grid = open_grid(3, 3);
        let path = Path::new(cells(&grid, &[(0, 0), (1, 1), (1, 2)]));

        assert_eq!(path.hop_count(), 2);
        assert_eq!(path.path_distance(&grid), 24);
        assert!(path.is_complete(grid.cell_at(Coord::new(1, 2)).unwrap()));
        assert!(!path.is_complete(grid.cell_at(Coord::new(2, 2)).unwrap()));
    }

    #[test]
    fn restrict_truncates_at_first_disallowed_cell() {
        let grid = open_grid(1, 5);
        let all = cells(&grid, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        let allowed = ReachableSet::from_cells(all[0], all[..3].iter().copied());

        let mut path = Path::new(all);
        path.restrict_to(&allowed);

        assert_eq!(path.len(), 3);
        assert_eq!(path.hop_count(), 2);
    }

    #[test]
    fn empty_path_is_never_complete() {
        let path = Path::default();
        assert!(path.is_empty());
        assert_eq!(path.hop_count(), 0);
        assert!(!path.is_complete(CellId(0)));
    }
}
