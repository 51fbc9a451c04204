//! Runtime orchestration for tick-driven tactics matches.
//!
//! This crate wires the turn machine from `tactics-core` to everything that
//! takes time: motion playback, rotation, attack animation and transient
//! hints. Consumers embed [`Runtime`] and call [`Runtime::tick`] once per
//! frame, supplying player decisions through a [`PlayerProvider`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`task`] is the cooperative task abstraction the playback is built on
//! - [`motion`] and [`hints`] are the concrete tasks
pub mod api;
pub mod hints;
pub mod motion;
pub mod runtime;
pub mod task;

pub use api::{
    ChaseProvider, PlayerCommand, PlayerProvider, Prompt, Result, RuntimeError, WaitProvider,
};
pub use hints::HintBoard;
pub use motion::{MotionOutcome, MotionPlayback, RotateTask};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use task::{Delay, Task, TaskSlot, TaskStatus};
