//! Lifecycle service DTOs.
//!
//! Transport-agnostic request/response types for the five lifecycle services.
//! A middleware binding maps its real messages into these.

use rcl_lifecycle::lifecycle::{State, Transition, TransitionMap};

/// Id + label of a state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StateDescription {
    pub id: u8,
    pub label: String,
}

impl From<&State> for StateDescription {
    fn from(state: &State) -> Self {
        Self {
            id: state.id(),
            label: state.label().to_string(),
        }
    }
}

/// Id + label of a transition.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransitionInfo {
    pub id: u8,
    pub label: String,
}

/// A transition together with its endpoints.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransitionDescription {
    pub transition: TransitionInfo,
    pub start_state: StateDescription,
    pub goal_state: StateDescription,
}

impl TransitionDescription {
    /// Describe `transition` with endpoints resolved in `map`.
    ///
    /// `None` when an endpoint is not registered there.
    pub fn resolve(map: &TransitionMap, transition: &Transition) -> Option<Self> {
        let start = map.get_state(transition.start()?)?;
        let goal = map.get_state(transition.goal()?)?;
        Some(Self {
            transition: TransitionInfo {
                id: transition.id(),
                label: transition.label().to_string(),
            },
            start_state: start.into(),
            goal_state: goal.into(),
        })
    }
}

/// `ChangeState`: take a transition leaving the current state.
pub mod change_state {
    /// Which outgoing transition to take.
    #[derive(Debug, Clone, Eq, PartialEq)]
    pub enum TransitionRef {
        Id(u8),
        Label(String),
    }

    #[derive(Debug, Clone, Eq, PartialEq)]
    pub struct Request {
        pub transition: TransitionRef,
    }

    /// Response: success + human-readable message.
    #[derive(Debug, Clone, Eq, PartialEq)]
    pub struct Response {
        pub success: bool,
        pub message: String,
    }
}

/// `GetState`: the state currently occupied.
pub mod get_state {
    use super::StateDescription;

    /// Empty request.
    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct Request;

    #[derive(Debug, Clone, Eq, PartialEq)]
    pub struct Response {
        pub current_state: StateDescription,
    }
}

/// `GetAvailableStates`: every registered state.
pub mod get_available_states {
    use super::StateDescription;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct Request;

    #[derive(Debug, Clone, Eq, PartialEq)]
    pub struct Response {
        pub available_states: Vec<StateDescription>,
    }
}

/// `GetAvailableTransitions`: transitions leaving the current state.
pub mod get_available_transitions {
    use super::TransitionDescription;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct Request;

    #[derive(Debug, Clone, Eq, PartialEq)]
    pub struct Response {
        pub available_transitions: Vec<TransitionDescription>,
    }
}

/// `GetTransitionGraph`: every registered transition.
pub mod get_transition_graph {
    use super::TransitionDescription;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct Request;

    #[derive(Debug, Clone, Eq, PartialEq)]
    pub struct Response {
        pub available_transitions: Vec<TransitionDescription>,
    }
}
