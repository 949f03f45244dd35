//! rcl_lifecycle_com
//!
//! In-process communication boundary for `rcl_lifecycle`.
//! Announces transitions on a broadcast channel and answers the five lifecycle
//! services over transport-agnostic DTOs; a real middleware binding maps those
//! onto its own messages.

pub mod error;

pub mod lifecycle;
pub mod transport;

// Re-export engine types that boundary users will commonly need
pub use rcl_lifecycle::error::{CoreError, Result};
pub use rcl_lifecycle::lifecycle::{State, StateMachine, Transition};
