use std::fmt;

use tracing::info;

use crate::error::{CoreError, Domain, ErrorKind, Result};

use super::{State, Transition};

/// Owns every registered state and transition of a lifecycle graph.
///
/// States and transitions live in registration order and are searched linearly;
/// lifecycle graphs are small (the default one has 11 states). Transitions refer
/// to their endpoints by id, so registering more states never invalidates an
/// already registered transition.
///
/// `generation` is bumped by every [`TransitionMap::fini`]; a state index taken
/// before a teardown never resolves against the states registered after it.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TransitionMap {
    states: Vec<State>,
    transitions: Vec<Transition>,
    generation: u64,
}

impl TransitionMap {
    /// Register a state.
    ///
    /// Fails with `StateAlreadyRegistered` when the id is taken; the map is left
    /// untouched on any error. Outgoing transitions carried by `state` are not
    /// copied: they are only ever added through [`TransitionMap::register_transition`].
    pub fn register_state(&mut self, state: State) -> Result<()> {
        if self.get_state(state.id()).is_some() {
            return Err(CoreError::state_already_registered(state.id()));
        }
        let state = State::new(state.id(), state.label())?;

        self.states
            .try_reserve(1)
            .map_err(|e| CoreError::bad_alloc("transition map states", e))?;
        self.states.push(state);
        Ok(())
    }

    /// Register a transition between two registered states.
    ///
    /// On success the transition is appended to the global edge list and a copy
    /// is appended to the outgoing list of its start state. Both appends are
    /// reserved before either happens, so a failure leaves the map unchanged.
    pub fn register_transition(&mut self, transition: Transition) -> Result<()> {
        let (Some(start), Some(goal)) = (transition.start(), transition.goal()) else {
            return Err(CoreError::error()
                .domain(Domain::Registry)
                .kind(ErrorKind::InvalidArgument)
                .msgf(format_args!(
                    "transition {} has no start or goal state",
                    transition.id()
                ))
                .build());
        };

        let start_idx = self
            .state_index(start)
            .ok_or_else(|| CoreError::state_not_registered(start))?;
        if self.state_index(goal).is_none() {
            return Err(CoreError::state_not_registered(goal));
        }

        self.transitions
            .try_reserve(1)
            .map_err(|e| CoreError::bad_alloc("transition map transitions", e))?;
        self.states[start_idx].reserve_transition()?;

        self.transitions.push(transition.clone());
        self.states[start_idx].push_transition(transition);
        Ok(())
    }

    /// Look up a registered state by id.
    pub fn get_state(&self, id: u8) -> Option<&State> {
        self.states.iter().find(|s| s.id() == id)
    }

    /// Look up a registered state by label (first match in registration order).
    pub fn get_state_by_label(&self, label: &str) -> Option<&State> {
        self.states.iter().find(|s| s.label() == label)
    }

    /// Look up a registered transition by its map-wide id.
    pub fn get_transition(&self, id: u8) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id() == id)
    }

    /// All registered states, in registration order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// All registered transitions, in registration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.transitions.is_empty()
    }

    /// Stable position of a state in registration order.
    pub(crate) fn state_index(&self, id: u8) -> Option<usize> {
        self.states.iter().position(|s| s.id() == id)
    }

    pub(crate) fn state_at(&self, index: usize) -> Option<&State> {
        self.states.get(index)
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Log every state with its outgoing transitions at info level.
    pub fn print(&self) {
        for state in &self.states {
            info!(
                "Primary State: {}({})\n# of valid transitions: {}",
                state.label(),
                state.id(),
                state.valid_transitions().len()
            );
            for transition in state.valid_transitions() {
                info!("\tNode {} has transition {}", state.label(), transition.label());
            }
        }
    }

    /// Release every state's outgoing list, then the states, then the
    /// transitions. Safe on a partially built or zero-initialized map.
    pub fn fini(&mut self) {
        for state in &mut self.states {
            state.fini();
        }
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        };
    }
}

impl fmt::Display for TransitionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.states {
            writeln!(
                f,
                "Primary State: {}({})",
                state.label(),
                state.id()
            )?;
            writeln!(
                f,
                "# of valid transitions: {}",
                state.valid_transitions().len()
            )?;
            for transition in state.valid_transitions() {
                writeln!(
                    f,
                    "\tNode {} has transition {}",
                    state.label(),
                    transition.label()
                )?;
            }
        }
        Ok(())
    }
}
