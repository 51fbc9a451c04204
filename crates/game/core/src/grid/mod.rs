//! Height-varying grid graph.
//!
//! A [`Grid`] owns one slot per `(row, column)` coordinate. Slots whose layout
//! height is not positive are holes and hold no cell. Each cell keeps a static
//! adjacency list built once by [`Grid::build_adjacency`]; occupancy is checked
//! dynamically by the searches instead of being baked into adjacency.
//!
//! The grid also owns the per-cell search scratch fields (`g`, `h`, parent and
//! heap index). They form a single-search arena: a search borrows the grid
//! mutably, fills the fields of the cells it touches and resets them before it
//! returns. Two searches can therefore never interleave on the same grid.
mod error;
pub mod layout;

pub use error::{GridError, LayoutError};
pub use layout::{Level, LevelLayout, ObstacleCode, SpawnPools};

use core::fmt;

use arrayvec::ArrayVec;

use crate::actor::Role;
use crate::config::EngineConfig;

/// Cost of an orthogonal step.
pub const ORTHOGONAL_COST: u32 = 10;
/// Cost of a diagonal step (≈ √2 scaled by 10).
pub const DIAGONAL_COST: u32 = 14;

/// Integer grid coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: i32,
    pub column: i32,
}

impl Coord {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Stable identity of a cell: its slot index `row * columns + column`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub u32);

impl CellId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point in world space. `y` is elevation; the ground plane is `x`/`z`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPoint {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance on the ground plane, ignoring elevation.
    pub fn planar_distance(&self, other: &WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// What currently stands on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occupancy {
    #[default]
    Empty,
    Blocked,
    Occupied(Role),
}

/// One node of the grid graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    id: CellId,
    coord: Coord,
    anchor: WorldPoint,
    height: i32,
    occupancy: Occupancy,
    can_act: bool,
    neighbours: ArrayVec<CellId, { EngineConfig::MAX_NEIGHBOURS }>,
}

impl Cell {
    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn anchor(&self) -> WorldPoint {
        self.anchor
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// Whether actions may target this cell.
    pub fn can_act(&self) -> bool {
        self.can_act
    }

    pub fn neighbours(&self) -> &[CellId] {
        &self.neighbours
    }

    /// Returns false if the cell is Blocked or held by the opponent of `role`.
    pub fn is_traversable(&self, role: Role) -> bool {
        match self.occupancy {
            Occupancy::Blocked => false,
            Occupancy::Occupied(occupant) => occupant != role.opponent(),
            Occupancy::Empty => true,
        }
    }
}

/// Transient A* bookkeeping for one cell.
///
/// All fields are back at their defaults whenever no search is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchFields {
    pub g_cost: u32,
    pub h_cost: u32,
    pub parent: Option<CellId>,
    pub heap_index: usize,
    pub closed: bool,
}

impl SearchFields {
    #[inline]
    pub fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }
}

/// Octile distance: diagonal steps cost 14, orthogonal steps 10.
pub fn octile_distance(a: Coord, b: Coord) -> u32 {
    let dx = a.column.abs_diff(b.column);
    let dz = a.row.abs_diff(b.row);
    let diagonal = dx.min(dz);
    let straight = dx.max(dz) - diagonal;
    DIAGONAL_COST * diagonal + ORTHOGONAL_COST * straight
}

/// Grid graph with static adjacency and dynamic occupancy.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: u32,
    columns: u32,
    origin: WorldPoint,
    cells: Vec<Option<Cell>>,
    scratch: Vec<SearchFields>,
}

impl Grid {
    /// Builds a grid from a row-major height array anchored at the world origin.
    pub fn from_heights(rows: u32, columns: u32, heights: &[i32]) -> Result<Self, LayoutError> {
        Self::new(rows, columns, heights, WorldPoint::ORIGIN)
    }

    /// Builds a grid from a row-major height array.
    ///
    /// Heights `<= 0` produce holes. The anchor of the cell at `(row, column)`
    /// is `origin + (column, height, row)`.
    pub fn new(
        rows: u32,
        columns: u32,
        heights: &[i32],
        origin: WorldPoint,
    ) -> Result<Self, LayoutError> {
        if rows == 0 || columns == 0 {
            return Err(LayoutError::EmptyDimensions { rows, columns });
        }
        let expected = rows as usize * columns as usize;
        if heights.len() != expected {
            return Err(LayoutError::HeightCountMismatch {
                expected,
                actual: heights.len(),
            });
        }

        let cells = heights
            .iter()
            .enumerate()
            .map(|(index, &height)| {
                if height <= 0 {
                    return None;
                }
                let coord = Coord::new(
                    (index / columns as usize) as i32,
                    (index % columns as usize) as i32,
                );
                Some(Cell {
                    id: CellId(index as u32),
                    coord,
                    anchor: WorldPoint::new(
                        origin.x + coord.column as f32,
                        origin.y + height as f32,
                        origin.z + coord.row as f32,
                    ),
                    height,
                    occupancy: Occupancy::Empty,
                    can_act: true,
                    neighbours: ArrayVec::new(),
                })
            })
            .collect();

        Ok(Self {
            rows,
            columns,
            origin,
            cells,
            scratch: vec![SearchFields::default(); expected],
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Number of existing cells (holes excluded).
    pub fn cell_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// Iterates over existing cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())?.as_ref()
    }

    fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.index())?.as_mut()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.cell(id).is_some()
    }

    /// Looks up the cell at a grid coordinate.
    pub fn cell_at(&self, coord: Coord) -> Option<CellId> {
        if coord.row < 0
            || coord.column < 0
            || coord.row >= self.rows as i32
            || coord.column >= self.columns as i32
        {
            return None;
        }
        let index = coord.row as usize * self.columns as usize + coord.column as usize;
        self.cells.get(index)?.as_ref().map(Cell::id)
    }

    /// Maps a world position to the cell underneath it by rounding.
    pub fn cell_at_world(&self, x: f32, z: f32) -> Option<CellId> {
        let column = (x - self.origin.x).round() as i32;
        let row = (z - self.origin.z).round() as i32;
        self.cell_at(Coord::new(row, column))
    }

    /// Coordinate named by a cell identifier. Valid for holes as well.
    pub fn coord_of(&self, id: CellId) -> Coord {
        let columns = self.columns as usize;
        Coord::new((id.index() / columns) as i32, (id.index() % columns) as i32)
    }

    pub fn height(&self, id: CellId) -> Option<i32> {
        self.cell(id).map(Cell::height)
    }

    pub fn anchor(&self, id: CellId) -> Option<WorldPoint> {
        self.cell(id).map(Cell::anchor)
    }

    pub fn occupancy(&self, id: CellId) -> Option<Occupancy> {
        self.cell(id).map(Cell::occupancy)
    }

    /// Graph neighbours of a cell; empty for holes and unknown ids.
    pub fn neighbours(&self, id: CellId) -> &[CellId] {
        self.cell(id).map(Cell::neighbours).unwrap_or(&[])
    }

    pub fn set_occupancy(&mut self, id: CellId, occupancy: Occupancy) -> Result<(), GridError> {
        let cell = self.cell_mut(id).ok_or(GridError::UnknownCell(id))?;
        cell.occupancy = occupancy;
        Ok(())
    }

    pub fn set_can_act(&mut self, id: CellId, can_act: bool) -> Result<(), GridError> {
        let cell = self.cell_mut(id).ok_or(GridError::UnknownCell(id))?;
        cell.can_act = can_act;
        Ok(())
    }

    /// Whether an agent of `role` may enter the cell right now.
    pub fn is_traversable(&self, id: CellId, role: Role) -> bool {
        self.cell(id).is_some_and(|cell| cell.is_traversable(role))
    }

    /// Whether the height difference between two cells is within `jump`.
    pub fn within_jump(&self, a: CellId, b: CellId, jump: u32) -> bool {
        match (self.height(a), self.height(b)) {
            (Some(ha), Some(hb)) => ha.abs_diff(hb) <= jump,
            _ => false,
        }
    }

    /// Heuristic and step cost between two cells.
    pub fn distance(&self, a: CellId, b: CellId) -> u32 {
        octile_distance(self.coord_of(a), self.coord_of(b))
    }

    /// Computes the adjacency list of every cell.
    ///
    /// Only cells that are not Blocked get neighbours, and only non-Blocked
    /// cells are linked. Scanned coordinates are clamped to the grid bounds.
    /// Calling this again rebuilds the lists from scratch.
    pub fn build_adjacency(&mut self, diagonal_motion: bool) {
        let last_row = self.rows as i32 - 1;
        let last_column = self.columns as i32 - 1;
        let mut edges = 0usize;

        for index in 0..self.cells.len() {
            let Some(cell) = self.cells[index].as_ref() else {
                continue;
            };
            let (id, coord) = (cell.id, cell.coord);
            let mut neighbours: ArrayVec<CellId, { EngineConfig::MAX_NEIGHBOURS }> =
                ArrayVec::new();

            if cell.occupancy != Occupancy::Blocked {
                for dr in -1..=1 {
                    for dc in -1..=1 {
                        if (dr == 0 && dc == 0) || (!diagonal_motion && dr != 0 && dc != 0) {
                            continue;
                        }
                        let target = Coord::new(
                            (coord.row + dr).clamp(0, last_row),
                            (coord.column + dc).clamp(0, last_column),
                        );
                        let Some(neighbour) = self.cell_at(target) else {
                            continue;
                        };
                        if neighbour == id
                            || neighbours.contains(&neighbour)
                            || self.occupancy(neighbour) == Some(Occupancy::Blocked)
                        {
                            continue;
                        }
                        neighbours.push(neighbour);
                    }
                }
            }

            edges += neighbours.len();
            if let Some(cell) = self.cells[index].as_mut() {
                cell.neighbours = neighbours;
            }
        }

        tracing::debug!(
            rows = self.rows,
            columns = self.columns,
            diagonal_motion,
            edges,
            "built grid adjacency"
        );
    }

    /// Current scratch fields of a cell (defaults outside of a search).
    pub fn search_fields(&self, id: CellId) -> SearchFields {
        self.scratch.get(id.index()).copied().unwrap_or_default()
    }

    pub(crate) fn scratch(&self, id: CellId) -> &SearchFields {
        &self.scratch[id.index()]
    }

    pub(crate) fn scratch_mut(&mut self, id: CellId) -> &mut SearchFields {
        &mut self.scratch[id.index()]
    }

    pub(crate) fn reset_scratch(&mut self, touched: &[CellId]) {
        for id in touched {
            if let Some(fields) = self.scratch.get_mut(id.index()) {
                *fields = SearchFields::default();
            }
        }
    }
}
