//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the tick loop in [`crate::runtime`] can stay focused on orchestration.

pub mod errors;
pub mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{ChaseProvider, PlayerCommand, PlayerProvider, Prompt, WaitProvider};
