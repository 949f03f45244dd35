//! rcl_lifecycle::lifecycle
//!
//! Managed-node lifecycle engine: a registrable state/transition graph plus a
//! state machine that walks it. This module contains **no** transport code.
//!
//! Key ideas:
//! - `TransitionMap` owns every state and edge; edges name their endpoints by id
//! - each `State` keeps copies of its outgoing edges for lookup from the current state
//! - `StateMachine` triggers edges and asks a `ComInterface` to announce them
//! - the standard topology (unconfigured/inactive/active/finalized + transition
//!   states) is one table-driven builder on top

mod com_interface;
mod default_topology;
pub mod ids;
mod state;
mod state_machine;
mod transition;
mod transition_map;

pub use com_interface::{ComInterface, ComMode, NoopComInterface};
pub use default_topology::{register_default_topology, DEFAULT_INITIAL_STATE};
pub use state::State;
pub use state_machine::StateMachine;
pub use transition::Transition;
pub use transition_map::TransitionMap;
