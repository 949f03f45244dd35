//! Glue between the in-process boundary and whatever actually carries
//! transition events off the node.

mod transition_event;
pub use transition_event::{forward_transition_events, TransitionEventSink};
