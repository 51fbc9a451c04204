//! Enemy approach policy.

use crate::actor::Role;
use crate::grid::{CellId, Grid};
use crate::search::{Path, ReachableSet, SearchError, find_path};

/// Picks the path `role` should walk to end up next to `opponent_cell`.
///
/// Every neighbour of the opponent's cell that `role` may enter (and that is
/// within `jump` of the opponent's height) is tried as a destination. Paths
/// reaching their destination win over best-effort approaches; within each
/// group the fewest hops win, then the shortest path distance, then the
/// first candidate found. The chosen path is clipped to `reachable` so the
/// agent never walks further than its budget allows this turn.
///
/// Returns `None` when the opponent has no enterable neighbour.
pub fn choose_approach_path(
    grid: &mut Grid,
    mover_cell: CellId,
    opponent_cell: CellId,
    role: Role,
    jump: u32,
    reachable: &ReachableSet,
) -> Result<Option<Path>, SearchError> {
    let destinations: Vec<CellId> = grid
        .neighbours(opponent_cell)
        .iter()
        .copied()
        .filter(|&cell| {
            grid.is_traversable(cell, role) && grid.within_jump(cell, opponent_cell, jump)
        })
        .collect();

    let mut best_complete: Option<(u32, u32, Path)> = None;
    let mut best_incomplete: Option<(u32, u32, Path)> = None;

    for destination in destinations {
        let path = find_path(grid, mover_cell, destination, role, jump)?;
        let key = (path.hop_count(), path.path_distance(grid));
        let slot = if path.is_complete(destination) {
            &mut best_complete
        } else {
            &mut best_incomplete
        };
        let better = match slot {
            Some((hops, distance, _)) => key < (*hops, *distance),
            None => true,
        };
        if better {
            *slot = Some((key.0, key.1, path));
        }
    }

    let chosen = best_complete.or(best_incomplete).map(|(_, _, mut path)| {
        path.restrict_to(reachable);
        path
    });

    if let Some(path) = &chosen {
        tracing::debug!(
            %role,
            from = %mover_cell,
            toward = %opponent_cell,
            hops = path.hop_count(),
            "chose approach path"
        );
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::open_grid;
    use crate::grid::{Coord, Occupancy};
    use crate::search::reachable_cells;

    fn at(grid: &Grid, row: i32, column: i32) -> CellId {
        grid.cell_at(Coord::new(row, column)).unwrap()
    }

    #[test]
    fn approaches_nearest_free_neighbour() {
        let mut grid = open_grid(1, 6);
        let player = at(&grid, 0, 5);
        let enemy = at(&grid, 0, 0);
        grid.set_occupancy(player, Occupancy::Occupied(Role::Player))
            .unwrap();
        grid.set_occupancy(enemy, Occupancy::Occupied(Role::Enemy))
            .unwrap();

        let reachable = reachable_cells(&grid, enemy, Role::Enemy, 1, 10);
        let path = choose_approach_path(&mut grid, enemy, player, Role::Enemy, 1, &reachable)
            .unwrap()
            .unwrap();

        assert_eq!(path.last(), Some(at(&grid, 0, 4)));
        assert_eq!(path.hop_count(), 4);
    }

    #[test]
    fn clips_to_reachable_cells() {
        let mut grid = open_grid(1, 6);
        let player = at(&grid, 0, 5);
        let enemy = at(&grid, 0, 0);
        grid.set_occupancy(player, Occupancy::Occupied(Role::Player))
            .unwrap();

        let reachable = reachable_cells(&grid, enemy, Role::Enemy, 1, 2);
        let path = choose_approach_path(&mut grid, enemy, player, Role::Enemy, 1, &reachable)
            .unwrap()
            .unwrap();

        assert_eq!(path.hop_count(), 2);
        assert_eq!(path.last(), Some(at(&grid, 0, 2)));
    }

    #[test]
    fn falls_back_to_best_partial_path() {
        // A blocked row separates the enemy from the player.
        let mut grid = Grid::from_heights(4, 3, &[1; 12]).unwrap();
        for column in 0..3 {
            let cell = at(&grid, 2, column);
            grid.set_occupancy(cell, Occupancy::Blocked).unwrap();
        }
        grid.build_adjacency(true);
        let player = at(&grid, 1, 1);
        let enemy = at(&grid, 3, 1);
        grid.set_occupancy(player, Occupancy::Occupied(Role::Player))
            .unwrap();

        let reachable = reachable_cells(&grid, enemy, Role::Enemy, 1, 5);
        let path = choose_approach_path(&mut grid, enemy, player, Role::Enemy, 1, &reachable)
            .unwrap()
            .unwrap();

        assert_eq!(path.cells(), &[enemy]);
    }

    #[test]
    fn adjacent_mover_stays_put() {
        let mut grid = open_grid(3, 3);
        let player = at(&grid, 1, 1);
        let enemy = at(&grid, 0, 0);
        grid.set_occupancy(player, Occupancy::Occupied(Role::Player))
            .unwrap();
        grid.set_occupancy(enemy, Occupancy::Occupied(Role::Enemy))
            .unwrap();

        let reachable = reachable_cells(&grid, enemy, Role::Enemy, 1, 3);
        let path = choose_approach_path(&mut grid, enemy, player, Role::Enemy, 1, &reachable)
            .unwrap()
            .unwrap();

        assert_eq!(path.cells(), &[enemy]);
        assert!(path.is_complete(enemy));
    }
}
