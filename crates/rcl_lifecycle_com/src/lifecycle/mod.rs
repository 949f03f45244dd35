//! rcl_lifecycle_com::lifecycle
//!
//! Boundary-side lifecycle surface: the com interface the state machine
//! announces through, the service handlers, and their DTOs.

// DTOs for the lifecycle services.
pub mod dtos;

// Transition event (`transition_event` topic payload).
mod events;
pub use events::TransitionEvent;

// Publisher + service bring-up used by the state machine.
mod com_interface;
pub use com_interface::{LifecycleComInterface, ServiceNames, TRANSITION_EVENT_CAPACITY};

// Service handlers backed by a shared state machine.
mod service;
pub use service::{LifecycleService, SharedStateMachine};
