use crate::grid::Coord;

/// Facing axis on the ground plane.
///
/// North points toward increasing rows, East toward increasing columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::East,
        CardinalDirection::West,
    ];

    /// Offset as `(column, row)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, 1),
            CardinalDirection::South => (0, -1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }

    /// Snaps a ground-plane vector onto the dominant axis.
    ///
    /// Ties go to the row axis. Returns `None` for the zero vector.
    pub fn from_vector(dx: f32, dz: f32) -> Option<Self> {
        if dx == 0.0 && dz == 0.0 {
            return None;
        }
        let direction = if dx.abs() > dz.abs() {
            if dx > 0.0 {
                CardinalDirection::East
            } else {
                CardinalDirection::West
            }
        } else if dz > 0.0 {
            CardinalDirection::North
        } else {
            CardinalDirection::South
        };
        Some(direction)
    }

    /// Direction that best faces `to` when standing on `from`.
    pub fn toward(from: Coord, to: Coord) -> Option<Self> {
        Self::from_vector(
            (to.column - from.column) as f32,
            (to.row - from.row) as f32,
        )
    }
}
