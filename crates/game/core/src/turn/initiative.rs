//! Speed-driven initiative timers feeding a bounded turn queue.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::actor::Role;
use crate::config::{EngineConfig, InitiativeConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Timer {
    role: Role,
    speed: u32,
    elapsed: u64,
}

/// Accumulates initiative per agent and queues agents as their timers fill.
///
/// Integer arithmetic keeps the carried remainder exact, so over a long run
/// the share of queue entries converges to the ratio of speeds.
#[derive(Clone, Debug)]
pub struct InitiativeScheduler {
    config: InitiativeConfig,
    timers: ArrayVec<Timer, { EngineConfig::MAX_AGENTS }>,
    queue: VecDeque<Role>,
}

impl InitiativeScheduler {
    pub fn new(config: InitiativeConfig) -> Self {
        Self {
            queue: VecDeque::with_capacity(config.queue_capacity),
            config,
            timers: ArrayVec::new(),
        }
    }

    pub fn config(&self) -> &InitiativeConfig {
        &self.config
    }

    /// Starts tracking `role`, or updates its speed if already tracked.
    pub fn register(&mut self, role: Role, speed: u32) {
        if let Some(timer) = self.timers.iter_mut().find(|timer| timer.role == role) {
            timer.speed = speed;
            return;
        }
        // At most one timer per role, so capacity is never exceeded.
        if self.timers.len() < self.timers.capacity() {
            self.timers.push(Timer {
                role,
                speed,
                elapsed: 0,
            });
        }
    }

    pub fn is_registered(&self, role: Role) -> bool {
        self.timers.iter().any(|timer| timer.role == role)
    }

    /// Advances every timer by `elapsed_ms` and returns how many entries were queued.
    ///
    /// Accumulation pauses entirely while the queue is full.
    pub fn tick(&mut self, elapsed_ms: u64) -> usize {
        let threshold = self.config.threshold.max(1);
        let scale = u64::from(self.config.scale_factor);
        let mut queued = 0;

        for timer in self.timers.iter_mut() {
            if self.queue.len() >= self.config.queue_capacity {
                break;
            }
            timer.elapsed = timer
                .elapsed
                .saturating_add(u64::from(timer.speed) * elapsed_ms * scale);
            while timer.elapsed >= threshold && self.queue.len() < self.config.queue_capacity {
                self.queue.push_back(timer.role);
                timer.elapsed -= threshold;
                queued += 1;
            }
        }

        if queued > 0 {
            tracing::debug!(queued, queue = ?self.queue, "initiative queue grew");
        }
        queued
    }

    /// Removes the agent at the head of the queue.
    pub fn pop(&mut self) -> Option<Role> {
        self.queue.pop_front()
    }

    pub fn peek(&self) -> Option<Role> {
        self.queue.front().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.config.queue_capacity
    }

    pub fn queue(&self) -> impl Iterator<Item = Role> + '_ {
        self.queue.iter().copied()
    }

    /// Initiative accumulated by `role` since its last queue entry.
    pub fn timer(&self, role: Role) -> Option<u64> {
        self.timers
            .iter()
            .find(|timer| timer.role == role)
            .map(|timer| timer.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_remainder_past_threshold() {
        let mut scheduler = InitiativeScheduler::new(InitiativeConfig::new(100, 1, 4));
        scheduler.register(Role::Player, 7);

        assert_eq!(scheduler.tick(10), 0);
        assert_eq!(scheduler.timer(Role::Player), Some(70));
        assert_eq!(scheduler.tick(10), 1);
        assert_eq!(scheduler.timer(Role::Player), Some(40));
        assert_eq!(scheduler.pop(), Some(Role::Player));
    }

    #[test]
    fn pauses_while_queue_is_full() {
        let mut scheduler = InitiativeScheduler::new(InitiativeConfig::new(10, 1, 2));
        scheduler.register(Role::Player, 5);

        assert_eq!(scheduler.tick(10), 2);
        assert!(scheduler.is_full());
        let frozen = scheduler.timer(Role::Player);

        assert_eq!(scheduler.tick(10), 0);
        assert_eq!(scheduler.timer(Role::Player), frozen);

        scheduler.pop();
        assert_eq!(scheduler.tick(1), 1);
    }

    #[test]
    fn faster_agent_appears_proportionally_more_often() {
        let mut scheduler = InitiativeScheduler::new(InitiativeConfig::new(1_000, 1, 4));
        scheduler.register(Role::Player, 3);
        scheduler.register(Role::Enemy, 1);

        let (mut player, mut enemy) = (0u32, 0u32);
        for _ in 0..20_000 {
            scheduler.tick(10);
            while let Some(role) = scheduler.pop() {
                match role {
                    Role::Player => player += 1,
                    Role::Enemy => enemy += 1,
                }
            }
        }

        let ratio = f64::from(player) / f64::from(enemy);
        assert!((ratio - 3.0).abs() < 0.01, "ratio was {ratio}");
    }

    #[test]
    fn re_registering_updates_speed() {
        let mut scheduler = InitiativeScheduler::new(InitiativeConfig::default());
        scheduler.register(Role::Enemy, 1);
        scheduler.register(Role::Enemy, 50);
        assert!(scheduler.is_registered(Role::Enemy));
        assert!(!scheduler.is_registered(Role::Player));

        scheduler.tick(20);
        assert_eq!(scheduler.len(), 1);
    }
}
