//! A* path search and reachability over the grid graph.
//!
//! [`find_path`] borrows the grid mutably because it uses the grid's per-cell
//! scratch fields as its working memory. Every cell it touches is reset before
//! it returns, on success and on error alike, so consecutive searches start
//! from clean state.
mod heap;
mod path;
mod reachable;

pub use heap::{CellHeap, HeapStore, Priority};
pub use path::Path;
pub use reachable::{ReachableSet, reachable_cells};

use arrayvec::ArrayVec;

use crate::actor::Role;
use crate::config::EngineConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::grid::{CellId, Grid};

/// Errors raised by the path search.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Start or target does not name an existing cell.
    #[error("search endpoint {0} is not a cell")]
    UnknownCell(CellId),

    /// A heap element's stored index no longer points at its slot, or a sift
    /// exceeded its iteration bound.
    #[error("heap corrupted during {operation} at cell {cell}")]
    HeapCorrupted {
        operation: &'static str,
        cell: CellId,
    },

    /// The search expanded more cells than the grid holds.
    #[error("search exceeded its iteration limit of {limit}")]
    IterationLimit { limit: usize },
}

impl GameError for SearchError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SearchError::UnknownCell(_) => ErrorSeverity::Validation,
            SearchError::HeapCorrupted { .. } | SearchError::IterationLimit { .. } => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SearchError::UnknownCell(_) => "SEARCH_UNKNOWN_CELL",
            SearchError::HeapCorrupted { .. } => "SEARCH_HEAP_CORRUPTED",
            SearchError::IterationLimit { .. } => "SEARCH_ITERATION_LIMIT",
        }
    }
}

/// Least-cost route from `start` to `target` for an agent of `role`.
///
/// A neighbour is expanded only if it is traversable for `role` and its
/// height differs from the current cell by at most `jump`. When the target
/// cannot be reached the path leads to the closest cell found instead (lowest
/// heuristic, first seen wins), so an unreachable target is never an error.
/// The returned path starts with `start`.
pub fn find_path(
    grid: &mut Grid,
    start: CellId,
    target: CellId,
    role: Role,
    jump: u32,
) -> Result<Path, SearchError> {
    if !grid.contains(start) {
        return Err(SearchError::UnknownCell(start));
    }
    if !grid.contains(target) {
        return Err(SearchError::UnknownCell(target));
    }

    let mut touched = Vec::new();
    let result = run_search(grid, start, target, role, jump, &mut touched);
    grid.reset_scratch(&touched);

    match &result {
        Ok(path) => tracing::debug!(
            %start,
            %target,
            %role,
            hops = path.hop_count(),
            complete = path.is_complete(target),
            touched = touched.len(),
            "found path"
        ),
        Err(error) => tracing::error!(%start, %target, %role, %error, "path search failed"),
    }
    result
}

fn run_search(
    grid: &mut Grid,
    start: CellId,
    target: CellId,
    role: Role,
    jump: u32,
    touched: &mut Vec<CellId>,
) -> Result<Path, SearchError> {
    let limit = grid.cell_count() + 1;
    let mut open = CellHeap::with_capacity(limit.min(64));

    let start_h = grid.distance(start, target);
    grid.scratch_mut(start).h_cost = start_h;
    open.push(grid, start)?;
    touched.push(start);

    let mut closest = (start, start_h);
    let mut goal = target;
    let mut iterations = 0usize;

    while let Some(current) = open.pop(grid)? {
        grid.scratch_mut(current).closed = true;
        if current == target {
            break;
        }

        let current_g = grid.scratch(current).g_cost;
        let neighbours: ArrayVec<CellId, { EngineConfig::MAX_NEIGHBOURS }> =
            grid.neighbours(current).iter().copied().collect();
        for neighbour in neighbours {
            if !grid.is_traversable(neighbour, role)
                || grid.scratch(neighbour).closed
                || !grid.within_jump(current, neighbour, jump)
            {
                continue;
            }

            let tentative = current_g + grid.distance(current, neighbour);
            let queued = open.contains(&*grid, neighbour);
            if queued && tentative >= grid.scratch(neighbour).g_cost {
                continue;
            }

            let h_cost = grid.distance(neighbour, target);
            let fields = grid.scratch_mut(neighbour);
            fields.g_cost = tentative;
            fields.h_cost = h_cost;
            fields.parent = Some(current);

            if queued {
                open.update(grid, neighbour)?;
            } else {
                open.push(grid, neighbour)?;
                touched.push(neighbour);
                if h_cost < closest.1 {
                    closest = (neighbour, h_cost);
                }
            }
        }

        if open.is_empty() {
            goal = closest.0;
            break;
        }

        iterations += 1;
        if iterations > limit {
            return Err(SearchError::IterationLimit { limit });
        }
    }

    backtrack(grid, start, goal, limit)
}

/// Follows parent links from `goal` back to `start`.
fn backtrack(grid: &Grid, start: CellId, goal: CellId, limit: usize) -> Result<Path, SearchError> {
    let mut cells = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        let Some(parent) = grid.scratch(cursor).parent else {
            // Goal was never reached from start; only the start itself remains.
            return Ok(Path::new(vec![start]));
        };
        cells.push(parent);
        cursor = parent;
        if cells.len() > limit {
            return Err(SearchError::IterationLimit { limit });
        }
    }
    cells.reverse();
    Ok(Path::new(cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::open_grid;
    use crate::grid::{Coord, Occupancy, SearchFields};

    fn at(grid: &Grid, row: i32, column: i32) -> CellId {
        grid.cell_at(Coord::new(row, column)).unwrap()
    }

    #[test]
    fn diagonal_route_on_open_grid() {
        let mut grid = open_grid(5, 5);
        let (start, target) = (at(&grid, 0, 0), at(&grid, 4, 4));

        let path = find_path(&mut grid, start, target, Role::Player, 1).unwrap();

        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(start));
        assert!(path.is_complete(target));
        assert_eq!(path.path_distance(&grid), 56);
        for (i, cell) in path.iter().enumerate() {
            assert_eq!(grid.coord_of(cell), Coord::new(i as i32, i as i32));
        }
    }

    #[test]
    fn same_start_and_target() {
        let mut grid = open_grid(3, 3);
        let cell = at(&grid, 1, 1);
        let path = find_path(&mut grid, cell, cell, Role::Enemy, 1).unwrap();
        assert_eq!(path.cells(), &[cell]);
        assert!(path.is_complete(cell));
        assert_eq!(path.hop_count(), 0);
    }

    #[test]
    fn orthogonal_grid_routes_around_a_wall() {
        let mut grid = Grid::from_heights(3, 3, &[1; 9]).unwrap();
        grid.set_occupancy(at(&grid, 0, 1), Occupancy::Blocked)
            .unwrap();
        grid.set_occupancy(at(&grid, 1, 1), Occupancy::Blocked)
            .unwrap();
        grid.build_adjacency(false);

        let (start, target) = (at(&grid, 0, 0), at(&grid, 0, 2));
        let path = find_path(&mut grid, start, target, Role::Player, 1).unwrap();

        assert!(path.is_complete(target));
        assert_eq!(path.hop_count(), 6);
        assert_eq!(path.path_distance(&grid), 60);
    }

    #[test]
    fn height_steps_beyond_jump_are_not_taken() {
        // A ridge of height 5 splits the grid except at row 2.
        let heights = vec![1, 5, 1, 1, 5, 1, 1, 1, 1];
        let mut grid = Grid::from_heights(3, 3, &heights).unwrap();
        grid.build_adjacency(true);
        let (start, target) = (at(&grid, 0, 0), at(&grid, 0, 2));

        let path = find_path(&mut grid, start, target, Role::Player, 1).unwrap();
        assert!(path.is_complete(target));
        assert!(path.iter().all(|cell| grid.height(cell) == Some(1)));

        let high_jumper = find_path(&mut grid, start, target, Role::Player, 4).unwrap();
        assert_eq!(high_jumper.hop_count(), 2);
    }

    #[test]
    fn unreachable_target_falls_back_to_closest_cell() {
        let mut grid = open_grid(1, 5);
        let wall = at(&grid, 0, 2);
        grid.set_occupancy(wall, Occupancy::Occupied(Role::Player))
            .unwrap();
        let (start, target) = (at(&grid, 0, 0), at(&grid, 0, 4));

        let path = find_path(&mut grid, start, target, Role::Enemy, 1).unwrap();

        assert!(!path.is_complete(target));
        assert_eq!(path.last(), Some(at(&grid, 0, 1)));
    }

    #[test]
    fn isolated_start_returns_only_start() {
        let mut grid = open_grid(1, 3);
        let blocker = at(&grid, 0, 1);
        grid.set_occupancy(blocker, Occupancy::Blocked).unwrap();
        let (start, target) = (at(&grid, 0, 0), at(&grid, 0, 2));

        let path = find_path(&mut grid, start, target, Role::Player, 1).unwrap();
        assert_eq!(path.cells(), &[start]);
    }

    #[test]
    fn scratch_is_reset_after_search() {
        let mut grid = open_grid(4, 4);
        let (start, target) = (at(&grid, 0, 0), at(&grid, 3, 2));
        find_path(&mut grid, start, target, Role::Player, 1).unwrap();

        for cell in grid.cells() {
            assert_eq!(grid.search_fields(cell.id()), SearchFields::default());
        }
    }

    #[test]
    fn unknown_endpoints_are_rejected() {
        let mut grid = Grid::from_heights(1, 2, &[1, 0]).unwrap();
        grid.build_adjacency(true);
        let start = at(&grid, 0, 0);

        let error = find_path(&mut grid, start, CellId(1), Role::Player, 1).unwrap_err();
        assert_eq!(error, SearchError::UnknownCell(CellId(1)));
        assert_eq!(error.severity(), ErrorSeverity::Validation);
    }
}
