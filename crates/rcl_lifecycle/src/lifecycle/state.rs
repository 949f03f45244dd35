use tracing::warn;

use crate::error::{CoreError, Domain, ErrorKind, Result};

use super::Transition;

/// Ids below this are primary (stable) states; the rest are transition states.
const FIRST_TRANSITION_STATE_ID: u8 = 10;

/// A named node of the lifecycle graph.
///
/// Once registered in a [`TransitionMap`](super::TransitionMap), a state keeps a
/// copy of every transition leaving it, so lookups from the current state only
/// scan its own out-degree. The outgoing list is append-only.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct State {
    id: u8,
    label: String,
    valid_transitions: Vec<Transition>,
}

impl State {
    /// Create a state with no outgoing transitions.
    pub fn new(id: u8, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(CoreError::error()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::InvalidArgument)
                .msgf(format_args!("state {id} label must not be empty"))
                .build());
        }

        Ok(Self {
            id,
            label,
            valid_transitions: Vec::new(),
        })
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Transitions leaving this state, in registration order.
    pub fn valid_transitions(&self) -> &[Transition] {
        &self.valid_transitions
    }

    /// True for stable (externally targetable) states.
    pub fn is_primary(&self) -> bool {
        self.id < FIRST_TRANSITION_STATE_ID
    }

    /// True when nothing leaves this state.
    pub fn is_terminal(&self) -> bool {
        self.valid_transitions.is_empty()
    }

    /// Find an outgoing transition by id.
    ///
    /// A miss is an expected event (e.g. a bad user command) and is only logged.
    pub fn transition_by_id(&self, id: u8) -> Option<&Transition> {
        let found = self.valid_transitions.iter().find(|t| t.id() == id);
        if found.is_none() {
            warn!(
                state = %self.label,
                transition_id = id,
                "no transition with this id leaves the state"
            );
        }
        found
    }

    /// Find an outgoing transition by label.
    pub fn transition_by_label(&self, label: &str) -> Option<&Transition> {
        let found = self.valid_transitions.iter().find(|t| t.label() == label);
        if found.is_none() {
            warn!(
                state = %self.label,
                transition_label = label,
                "no transition with this label leaves the state"
            );
        }
        found
    }

    /// Reserve room for one more outgoing transition without mutating the list.
    pub(crate) fn reserve_transition(&mut self) -> Result<()> {
        self.valid_transitions
            .try_reserve(1)
            .map_err(|e| CoreError::bad_alloc("state transition list", e))
    }

    /// Append an outgoing transition. Call [`State::reserve_transition`] first.
    pub(crate) fn push_transition(&mut self, transition: Transition) {
        self.valid_transitions.push(transition);
    }

    /// Reset to the zero value, releasing the outgoing list. Idempotent.
    pub fn fini(&mut self) {
        *self = Self::default();
    }
}
