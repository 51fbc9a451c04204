//! Motion playback along a computed path.
//!
//! [`MotionPlayback`] walks an agent from cell to cell at a constant ground
//! speed. While heading to each cell a [`RotateTask`] turns the agent toward
//! it; arriving at the next cell starts a fresh rotation, replacing the one
//! still running. Elevation only starts to change when the agent is close
//! to a cell of a different height, and never leaves the band between the
//! two cells' elevations.

use std::f32::consts::{PI, TAU};

use tactics_core::{CardinalDirection, Grid, GridError, Path, Role, WorldPoint};

use crate::api::Result;
use crate::runtime::RuntimeConfig;
use crate::task::{Task, TaskSlot, TaskStatus};

/// Heading on the ground plane in radians. `0` faces North (+z), `PI / 2`
/// faces East (+x).
pub fn yaw_toward(from: &WorldPoint, to: &WorldPoint) -> Option<f32> {
    let (dx, dz) = (to.x - from.x, to.z - from.z);
    if dx == 0.0 && dz == 0.0 {
        return None;
    }
    Some(dx.atan2(dz))
}

pub fn yaw_of(direction: CardinalDirection) -> f32 {
    let (dx, dz) = direction.delta();
    (dx as f32).atan2(dz as f32)
}

/// Clamps a heading onto the nearest cardinal direction.
pub fn facing_of(yaw: f32) -> CardinalDirection {
    CardinalDirection::from_vector(yaw.sin(), yaw.cos()).unwrap_or(CardinalDirection::North)
}

fn wrap_angle(angle: f32) -> f32 {
    let angle = angle % TAU;
    if angle > PI {
        angle - TAU
    } else if angle <= -PI {
        angle + TAU
    } else {
        angle
    }
}

/// Turns a heading toward a target heading at a fixed angular speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotateTask {
    current: f32,
    target: f32,
    speed: f32,
    epsilon: f32,
}

impl RotateTask {
    pub fn new(current: f32, target: f32, speed: f32, epsilon: f32) -> Self {
        Self {
            current: wrap_angle(current),
            target: wrap_angle(target),
            speed,
            epsilon,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

impl Task for RotateTask {
    type Output = f32;

    fn poll(&mut self, dt: f32) -> TaskStatus<f32> {
        let remaining = wrap_angle(self.target - self.current);
        if remaining.abs() < self.epsilon {
            self.current = self.target;
            return TaskStatus::Done(self.current);
        }

        // Always take the short way round.
        let step = self.speed * dt;
        self.current = if remaining.abs() <= step {
            self.target
        } else {
            wrap_angle(self.current + step.copysign(remaining))
        };
        TaskStatus::Pending
    }
}

/// Where a finished playback left its agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionOutcome {
    pub role: Role,
    pub position: WorldPoint,
    pub yaw: f32,
    pub facing: CardinalDirection,
}

/// Walks one agent along a [`Path`].
#[derive(Debug)]
pub struct MotionPlayback {
    role: Role,
    waypoints: Vec<WorldPoint>,
    next: usize,
    position: WorldPoint,
    yaw: f32,
    rotation: TaskSlot<RotateTask>,
    config: RuntimeConfig,
}

impl MotionPlayback {
    /// Prepares playback from `position`. The path's first cell is the one
    /// the agent already stands on and is skipped.
    pub fn new(
        role: Role,
        path: &Path,
        grid: &Grid,
        position: WorldPoint,
        yaw: f32,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        let waypoints = path
            .iter()
            .map(|cell| grid.anchor(cell).ok_or(GridError::UnknownCell(cell)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut playback = Self {
            role,
            waypoints,
            next: 1,
            position,
            yaw,
            rotation: TaskSlot::new("rotate"),
            config: *config,
        };
        playback.face_next();
        Ok(playback)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Standing position of the agent.
    pub fn position(&self) -> WorldPoint {
        self.position
    }

    /// Position of the agent's body, which floats `max_y_offset` above the
    /// ground it stands on.
    pub fn body(&self) -> WorldPoint {
        WorldPoint::new(
            self.position.x,
            self.position.y + self.config.max_y_offset,
            self.position.z,
        )
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Number of cells still to be entered.
    pub fn remaining(&self) -> usize {
        self.waypoints.len().saturating_sub(self.next)
    }

    fn face_next(&mut self) {
        let Some(next) = self.waypoints.get(self.next) else {
            return;
        };
        if let Some(target) = yaw_toward(&self.position, next) {
            self.rotation.start(RotateTask::new(
                self.yaw,
                target,
                self.config.rotate_speed,
                self.config.angle_epsilon,
            ));
        }
    }

    fn finish(&mut self) -> MotionOutcome {
        self.rotation.cancel();
        MotionOutcome {
            role: self.role,
            position: self.position,
            yaw: self.yaw,
            facing: facing_of(self.yaw),
        }
    }
}

impl Task for MotionPlayback {
    type Output = MotionOutcome;

    fn poll(&mut self, dt: f32) -> TaskStatus<MotionOutcome> {
        match self.rotation.poll(dt) {
            Some(yaw) => self.yaw = yaw,
            None => {
                if let Some(rotation) = self.rotation.get() {
                    self.yaw = rotation.current();
                }
            }
        }

        let Some(&next) = self.waypoints.get(self.next) else {
            return TaskStatus::Done(self.finish());
        };

        let distance = self.position.planar_distance(&next);
        if distance < self.config.arrive_epsilon {
            self.position = next;
            self.next += 1;
            if self.next >= self.waypoints.len() {
                tracing::debug!(role = %self.role, "playback finished");
                return TaskStatus::Done(self.finish());
            }
            self.face_next();
            return TaskStatus::Pending;
        }

        let previous = self.waypoints[self.next - 1];
        if previous.y != next.y && distance < self.config.jump_start_distance {
            let blend = (self.config.jump_speed * dt).min(1.0);
            let (low, high) = if previous.y < next.y {
                (previous.y, next.y)
            } else {
                (next.y, previous.y)
            };
            self.position.y = (self.position.y + (next.y - previous.y) * blend).clamp(low, high);
        }

        let travel = (self.config.move_speed * dt).min(distance);
        self.position.x += (next.x - self.position.x) / distance * travel;
        self.position.z += (next.z - self.position.z) / distance * travel;
        TaskStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{Coord, find_path};

    fn walk(playback: &mut MotionPlayback, dt: f32) -> (MotionOutcome, Vec<WorldPoint>) {
        let mut trail = Vec::new();
        for _ in 0..10_000 {
            match playback.poll(dt) {
                TaskStatus::Pending => trail.push(playback.position()),
                TaskStatus::Done(outcome) => return (outcome, trail),
            }
        }
        panic!("playback never finished");
    }

    fn grid(rows: u32, columns: u32, heights: &[i32]) -> Grid {
        let mut grid = Grid::from_heights(rows, columns, heights).unwrap();
        grid.build_adjacency(true);
        grid
    }

    #[test]
    fn walks_to_the_last_cell_and_faces_along_the_path() {
        let mut grid = grid(1, 4, &[1; 4]);
        let start = grid.cell_at(Coord::new(0, 0)).unwrap();
        let target = grid.cell_at(Coord::new(0, 3)).unwrap();
        let path = find_path(&mut grid, start, target, Role::Player, 1).unwrap();
        let origin = grid.anchor(start).unwrap();

        let mut playback = MotionPlayback::new(
            Role::Player,
            &path,
            &grid,
            origin,
            0.0,
            &RuntimeConfig::default(),
        )
        .unwrap();
        assert_eq!(playback.remaining(), 3);

        let (outcome, _) = walk(&mut playback, 0.02);
        assert_eq!(outcome.position, grid.anchor(target).unwrap());
        assert_eq!(outcome.facing, CardinalDirection::East);
    }

    #[test]
    fn elevation_stays_between_the_two_cells() {
        let mut grid = grid(1, 2, &[1, 2]);
        let start = grid.cell_at(Coord::new(0, 0)).unwrap();
        let target = grid.cell_at(Coord::new(0, 1)).unwrap();
        let path = find_path(&mut grid, start, target, Role::Player, 1).unwrap();
        let origin = grid.anchor(start).unwrap();

        let mut playback = MotionPlayback::new(
            Role::Player,
            &path,
            &grid,
            origin,
            0.0,
            &RuntimeConfig::default(),
        )
        .unwrap();
        let (outcome, trail) = walk(&mut playback, 0.01);

        let far = trail.iter().filter(|p| p.x < 0.6);
        assert!(far.into_iter().all(|p| p.y == 1.0));
        assert!(trail.iter().all(|p| (1.0..=2.0).contains(&p.y)));
        assert!(trail.windows(2).all(|pair| pair[0].y <= pair[1].y));
        assert_eq!(outcome.position.y, 2.0);
    }

    #[test]
    fn single_cell_path_finishes_at_once() {
        let grid = grid(1, 1, &[1]);
        let cell = grid.cell_at(Coord::new(0, 0)).unwrap();
        let origin = grid.anchor(cell).unwrap();

        let mut playback = MotionPlayback::new(
            Role::Enemy,
            &Path::new(vec![cell]),
            &grid,
            origin,
            yaw_of(CardinalDirection::West),
            &RuntimeConfig::default(),
        )
        .unwrap();

        let TaskStatus::Done(outcome) = playback.poll(0.016) else {
            panic!("expected immediate completion");
        };
        assert_eq!(outcome.position, origin);
        assert_eq!(outcome.facing, CardinalDirection::West);
    }

    #[test]
    fn rotation_takes_the_short_way_round() {
        let mut task = RotateTask::new(3.0, -3.0, 1.0, 0.01);
        task.poll(0.1);
        assert!(task.current() > 3.0 || task.current() < -3.0);

        let mut polls = 0;
        while !task.poll(0.1).is_done() {
            polls += 1;
            assert!(polls < 10);
        }
        assert!((task.current() - task.target()).abs() < 1e-6);
    }

    #[test]
    fn cardinal_headings_round_trip() {
        for direction in CardinalDirection::ALL {
            assert_eq!(facing_of(yaw_of(direction)), direction);
        }
    }
}
