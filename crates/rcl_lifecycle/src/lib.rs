//! rcl_lifecycle: managed-node lifecycle engine.
//!
//! Design goals:
//! - Pure, testable logic (no transport deps).
//! - Edges refer to states by id, so the graph can grow at any time.
//! - Explicit init/fini pairs; `fini` is always safe to call.

pub mod error;

/// State machine options and their environment overrides.
pub mod config;

/// Lifecycle state machine, transition map and default topology.
pub mod lifecycle;

pub use config::StateMachineOptions;
pub use error::{CoreError, Result};
