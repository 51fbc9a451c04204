//! Cooperative tasks polled once per tick.
//!
//! Anything that takes several frames (walking a path, turning to face a
//! cell, showing a hint for a while) is a [`Task`]. The owner polls it from
//! its tick loop until it reports [`TaskStatus::Done`]. There is no
//! cancellation token: starting a new task in a [`TaskSlot`] drops the old
//! one.

/// Result of polling a task once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TaskStatus<T> {
    Pending,
    Done(T),
}

impl<T> TaskStatus<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done(_))
    }
}

/// A resumable unit of work advanced by `dt` seconds per poll.
pub trait Task {
    type Output;

    fn poll(&mut self, dt: f32) -> TaskStatus<Self::Output>;
}

/// Holds at most one running task. Last writer wins.
#[derive(Debug)]
pub struct TaskSlot<T> {
    name: &'static str,
    current: Option<T>,
}

impl<T: Task> TaskSlot<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            current: None,
        }
    }

    /// Starts `task`, returning the task it replaced.
    pub fn start(&mut self, task: T) -> Option<T> {
        let replaced = self.current.replace(task);
        if replaced.is_some() {
            tracing::trace!(slot = self.name, "task replaced");
        }
        replaced
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.current.take()
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn get(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Polls the running task. A finished task is removed from the slot and
    /// its output returned.
    pub fn poll(&mut self, dt: f32) -> Option<T::Output> {
        let task = self.current.as_mut()?;
        match task.poll(dt) {
            TaskStatus::Pending => None,
            TaskStatus::Done(output) => {
                self.current = None;
                Some(output)
            }
        }
    }
}

/// Completes after a fixed amount of time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Delay {
    remaining: f32,
}

impl Delay {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Task for Delay {
    type Output = ();

    fn poll(&mut self, dt: f32) -> TaskStatus<()> {
        self.remaining -= dt;
        if self.remaining < 0.0 {
            TaskStatus::Done(())
        } else {
            TaskStatus::Pending
        }
    }
}
