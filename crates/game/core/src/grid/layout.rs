//! Level layout arrays and their conversion into a ready-to-search grid.
//!
//! Layout data arrives from an external asset as two row-major integer arrays
//! indexed `row * columns + column`: cell heights and obstacle codes.

use crate::actor::Role;

use super::{CellId, Grid, LayoutError, Occupancy, WorldPoint};

/// Meaning of an entry in the obstacle array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleCode {
    None,
    Blocked,
    /// Traversable, but no action may target it.
    NoAction,
    EnemySpawn,
    PlayerSpawn,
}

impl ObstacleCode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ObstacleCode::None),
            1 => Some(ObstacleCode::Blocked),
            2 => Some(ObstacleCode::NoAction),
            3 => Some(ObstacleCode::EnemySpawn),
            4 => Some(ObstacleCode::PlayerSpawn),
            _ => None,
        }
    }
}

/// Raw layout data for one level.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelLayout {
    pub name: String,
    pub rows: u32,
    pub columns: u32,
    /// Cell heights; `<= 0` marks a hole.
    pub heights: Vec<i32>,
    /// Obstacle codes; empty means no obstacles.
    #[cfg_attr(feature = "serde", serde(default))]
    pub obstacles: Vec<u8>,
}

/// Spawn cells available to each side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpawnPools {
    player: Vec<CellId>,
    enemy: Vec<CellId>,
}

impl SpawnPools {
    /// Registers a spawn cell. Duplicates are ignored.
    pub fn add(&mut self, cell: CellId, is_enemy_pool: bool) {
        let pool = if is_enemy_pool {
            &mut self.enemy
        } else {
            &mut self.player
        };
        if !pool.contains(&cell) {
            pool.push(cell);
        }
    }

    pub fn pool(&self, role: Role) -> &[CellId] {
        match role {
            Role::Player => &self.player,
            Role::Enemy => &self.enemy,
        }
    }

    pub fn contains(&self, role: Role, cell: CellId) -> bool {
        self.pool(role).contains(&cell)
    }
}

/// A grid with obstacles applied and adjacency built, plus its spawn pools.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub grid: Grid,
    pub spawns: SpawnPools,
}

impl LevelLayout {
    pub fn new(name: impl Into<String>, rows: u32, columns: u32, heights: Vec<i32>) -> Self {
        Self {
            name: name.into(),
            rows,
            columns,
            heights,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacles(mut self, obstacles: Vec<u8>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Builds the level anchored at the world origin.
    pub fn build(&self, diagonal_motion: bool) -> Result<Level, LayoutError> {
        self.build_at(WorldPoint::ORIGIN, diagonal_motion)
    }

    /// Creates the grid, applies obstacle codes, then builds adjacency so
    /// Blocked cells never receive edges.
    pub fn build_at(&self, origin: WorldPoint, diagonal_motion: bool) -> Result<Level, LayoutError> {
        let mut grid = Grid::new(self.rows, self.columns, &self.heights, origin)?;
        let mut spawns = SpawnPools::default();

        if !self.obstacles.is_empty() {
            let expected = self.heights.len();
            if self.obstacles.len() != expected {
                return Err(LayoutError::ObstacleCountMismatch {
                    expected,
                    actual: self.obstacles.len(),
                });
            }

            for (index, &code) in self.obstacles.iter().enumerate() {
                let id = CellId(index as u32);
                if !grid.contains(id) {
                    continue;
                }
                match ObstacleCode::from_code(code) {
                    Some(ObstacleCode::None) => {}
                    Some(ObstacleCode::Blocked) => {
                        let _ = grid.set_occupancy(id, Occupancy::Blocked);
                    }
                    Some(ObstacleCode::NoAction) => {
                        let _ = grid.set_can_act(id, false);
                    }
                    Some(ObstacleCode::EnemySpawn) => spawns.add(id, true),
                    Some(ObstacleCode::PlayerSpawn) => spawns.add(id, false),
                    None => {
                        tracing::debug!(cell = %id, code, "ignoring unknown obstacle code");
                    }
                }
            }
        }

        grid.build_adjacency(diagonal_motion);

        Ok(Level {
            name: self.name.clone(),
            grid,
            spawns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;

    #[test]
    fn applies_obstacle_codes() {
        let layout = LevelLayout::new("yard", 2, 3, vec![1, 1, 1, 1, 0, 2])
            .with_obstacles(vec![1, 2, 3, 4, 1, 9]);
        let level = layout.build(true).unwrap();
        let grid = &level.grid;

        let blocked = grid.cell_at(Coord::new(0, 0)).unwrap();
        assert_eq!(grid.occupancy(blocked), Some(Occupancy::Blocked));
        assert!(grid.neighbours(blocked).is_empty());

        let no_action = grid.cell_at(Coord::new(0, 1)).unwrap();
        assert!(!grid.cell(no_action).unwrap().can_act());
        assert!(grid.is_traversable(no_action, Role::Player));

        assert_eq!(
            level.spawns.pool(Role::Enemy),
            &[grid.cell_at(Coord::new(0, 2)).unwrap()]
        );
        assert_eq!(
            level.spawns.pool(Role::Player),
            &[grid.cell_at(Coord::new(1, 0)).unwrap()]
        );
    }

    #[test]
    fn rejects_obstacle_size_mismatch() {
        let layout = LevelLayout::new("bad", 1, 2, vec![1, 1]).with_obstacles(vec![0]);
        assert!(matches!(
            layout.build(true),
            Err(LayoutError::ObstacleCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn spawn_pools_deduplicate() {
        let mut pools = SpawnPools::default();
        pools.add(CellId(3), false);
        pools.add(CellId(3), false);
        pools.add(CellId(3), true);

        assert_eq!(pools.pool(Role::Player).len(), 1);
        assert!(pools.contains(Role::Enemy, CellId(3)));
    }
}
