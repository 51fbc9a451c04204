//! Deterministic tactics rules shared by the runtime and offline tools.
//!
//! `tactics-core` defines the grid graph, the A* search with its closest-cell
//! fallback, reachability, the initiative scheduler and the turn/phase state
//! machine. Everything here is synchronous and free of I/O; all match state
//! mutation flows through [`turn::TurnMachine`].
pub mod actor;
pub mod ai;
pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod search;
pub mod turn;

pub use actor::{ActionBudget, Actor, ActorTemplate, Role};
pub use ai::choose_approach_path;
pub use config::{EngineConfig, InitiativeConfig};
pub use direction::CardinalDirection;
pub use error::{ErrorSeverity, GameError};
pub use grid::{
    Cell, CellId, Coord, DIAGONAL_COST, Grid, GridError, LayoutError, Level, LevelLayout,
    ORTHOGONAL_COST, ObstacleCode, Occupancy, SearchFields, SpawnPools, WorldPoint,
    octile_distance,
};
pub use search::{CellHeap, Path, ReachableSet, SearchError, find_path, reachable_cells};
pub use turn::{
    Hint, InitiativeScheduler, Order, Phase, TurnError, TurnEvent, TurnMachine, TurnState,
};
