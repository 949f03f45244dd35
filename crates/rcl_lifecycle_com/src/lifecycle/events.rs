//! Lifecycle event types.
//!
//! Payload of the `transition_event` topic. Transport layers subscribe and map
//! to their own message type (e.g. lifecycle_msgs/msg/TransitionEvent).

use rcl_lifecycle::lifecycle::State;

use super::dtos::StateDescription;

/// Emitted after the state machine takes a transition with notification enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    pub start_state: StateDescription,
    pub goal_state: StateDescription,
}

impl TransitionEvent {
    pub fn new(start: &State, goal: &State) -> Self {
        Self {
            start_state: start.into(),
            goal_state: goal.into(),
        }
    }
}
