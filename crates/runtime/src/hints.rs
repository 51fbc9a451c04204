use tactics_core::Hint;

use crate::task::{Delay, TaskSlot};

/// The single transient hint currently on screen.
///
/// Showing a hint replaces the previous one and restarts the timer.
#[derive(Debug)]
pub struct HintBoard {
    duration: f32,
    current: Option<Hint>,
    timer: TaskSlot<Delay>,
}

impl HintBoard {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            current: None,
            timer: TaskSlot::new("hint"),
        }
    }

    pub fn show(&mut self, hint: Hint) {
        tracing::info!(hint = hint.message(), "hint");
        self.current = Some(hint);
        self.timer.start(Delay::new(self.duration));
    }

    pub fn current(&self) -> Option<Hint> {
        self.current
    }

    /// Advances the timer and returns the hint that just expired, if any.
    pub fn tick(&mut self, dt: f32) -> Option<Hint> {
        self.timer.poll(dt)?;
        self.current.take()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_expires_after_duration() {
        let mut board = HintBoard::new(1.0);
        board.show(Hint::InvalidTarget);

        assert_eq!(board.tick(0.6), None);
        assert_eq!(board.current(), Some(Hint::InvalidTarget));
        assert_eq!(board.tick(0.6), Some(Hint::InvalidTarget));
        assert_eq!(board.current(), None);
    }

    #[test]
    fn new_hint_restarts_the_timer() {
        let mut board = HintBoard::new(1.0);
        board.show(Hint::InvalidTarget);
        board.tick(0.8);
        board.show(Hint::NoActionsLeft);

        assert_eq!(board.tick(0.8), None);
        assert_eq!(board.current(), Some(Hint::NoActionsLeft));
    }
}
