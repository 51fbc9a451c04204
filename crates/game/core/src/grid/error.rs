//! Grid construction and lookup errors.

use crate::error::{ErrorSeverity, GameError};

use super::{CellId, Coord};

/// Errors raised while turning layout arrays into a grid.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutError {
    /// Rows or columns is zero.
    #[error("layout must have at least one row and one column (got {rows}x{columns})")]
    EmptyDimensions { rows: u32, columns: u32 },

    /// Height array length does not equal `rows * columns`.
    #[error("height array has {actual} entries, expected {expected}")]
    HeightCountMismatch { expected: usize, actual: usize },

    /// Obstacle array length does not equal `rows * columns`.
    #[error("obstacle array has {actual} entries, expected {expected}")]
    ObstacleCountMismatch { expected: usize, actual: usize },
}

impl GameError for LayoutError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use LayoutError::*;
        match self {
            EmptyDimensions { .. } => "LAYOUT_EMPTY_DIMENSIONS",
            HeightCountMismatch { .. } => "LAYOUT_HEIGHT_COUNT_MISMATCH",
            ObstacleCountMismatch { .. } => "LAYOUT_OBSTACLE_COUNT_MISMATCH",
        }
    }
}

/// Errors raised by grid lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    /// Coordinate lies outside the grid or on a hole.
    #[error("no cell at {0}")]
    NoCellAt(Coord),

    /// Cell identifier does not name an existing cell.
    #[error("unknown cell {0}")]
    UnknownCell(CellId),
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            GridError::NoCellAt(_) => "GRID_NO_CELL_AT",
            GridError::UnknownCell(_) => "GRID_UNKNOWN_CELL",
        }
    }
}
