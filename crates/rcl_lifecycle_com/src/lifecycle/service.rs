use std::sync::{Arc, Mutex, MutexGuard};

use rcl_lifecycle::error::{CoreError, Domain, ErrorKind, Payload, Result};
use rcl_lifecycle::lifecycle::{ComInterface, State, StateMachine};

use crate::error::log_core_error;

use super::dtos::{
    change_state, get_available_states, get_available_transitions, get_state,
    get_transition_graph, TransitionDescription,
};
use super::LifecycleComInterface;

/// A state machine shared between its owner and the service handlers.
pub type SharedStateMachine = Arc<Mutex<StateMachine<LifecycleComInterface>>>;

/// Lifecycle service handlers.
///
/// Owns a shared state machine and answers the five lifecycle services on it.
/// Every handler fails with `InvalidState` when the machine's com interface was
/// not brought up with services.
pub struct LifecycleService {
    machine: SharedStateMachine,
}

impl LifecycleService {
    pub fn new(machine: SharedStateMachine) -> Self {
        Self { machine }
    }

    /// `ChangeState`: take the requested transition and announce it.
    ///
    /// A notification failure after the state changed still reports success:
    /// the node is in the new state, only observers may have missed it.
    pub fn handle_change_state(&self, req: change_state::Request) -> change_state::Response {
        let mut machine = match self.serving_machine() {
            Ok(machine) => machine,
            Err(e) => return change_state_failed(&e),
        };

        let before = machine.current_state().map(State::id);
        let result = match &req.transition {
            change_state::TransitionRef::Id(id) => machine.trigger_transition_by_id(*id, true),
            change_state::TransitionRef::Label(label) => {
                machine.trigger_transition_by_label(label, true)
            }
        };

        change_state_outcome(result, before, machine.current_state())
    }

    /// `GetState`
    pub fn handle_get_state(&self, _req: get_state::Request) -> Result<get_state::Response> {
        let machine = self.serving_machine()?;
        let current = machine.current_state().ok_or_else(|| {
            CoreError::warn()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::NotFound)
                .msg("state machine has no current state")
                .build()
        })?;

        Ok(get_state::Response {
            current_state: current.into(),
        })
    }

    /// `GetAvailableStates`
    pub fn handle_get_available_states(
        &self,
        _req: get_available_states::Request,
    ) -> Result<get_available_states::Response> {
        let machine = self.serving_machine()?;
        let available_states = machine
            .transition_map()
            .states()
            .iter()
            .map(Into::into)
            .collect();

        Ok(get_available_states::Response { available_states })
    }

    /// `GetAvailableTransitions`
    pub fn handle_get_available_transitions(
        &self,
        _req: get_available_transitions::Request,
    ) -> Result<get_available_transitions::Response> {
        let machine = self.serving_machine()?;
        let map = machine.transition_map();
        let available_transitions = machine
            .available_transitions()
            .iter()
            .filter_map(|t| TransitionDescription::resolve(map, t))
            .collect();

        Ok(get_available_transitions::Response {
            available_transitions,
        })
    }

    /// `GetTransitionGraph`
    pub fn handle_get_transition_graph(
        &self,
        _req: get_transition_graph::Request,
    ) -> Result<get_transition_graph::Response> {
        let machine = self.serving_machine()?;
        let map = machine.transition_map();
        let available_transitions = map
            .transitions()
            .iter()
            .filter_map(|t| TransitionDescription::resolve(map, t))
            .collect();

        Ok(get_transition_graph::Response {
            available_transitions,
        })
    }

    /// Lock the machine and check that it serves lifecycle services.
    fn serving_machine(&self) -> Result<MutexGuard<'_, StateMachine<LifecycleComInterface>>> {
        let machine = self.machine.lock().map_err(|_| {
            CoreError::error()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::InvalidState)
                .msg("state machine mutex poisoned")
                .payload(Payload::Context {
                    key: "where",
                    value: "LifecycleService".into(),
                })
                .build()
        })?;

        if !machine.com_interface().is_some_and(|com| com.has_services()) {
            return Err(CoreError::warn()
                .domain(Domain::Communication)
                .kind(ErrorKind::InvalidState)
                .msg("lifecycle services are not enabled on this state machine")
                .build());
        }
        Ok(machine)
    }
}

/// Map a trigger result onto a `ChangeState` response. An error after the
/// current state moved is a notification failure: the change itself stands.
fn change_state_outcome(
    result: Result<()>,
    before: Option<u8>,
    after: Option<&State>,
) -> change_state::Response {
    let current = after.map(State::label).unwrap_or_default();
    match result {
        Ok(()) => change_state::Response {
            success: true,
            message: format!("transition ok -> {current}"),
        },
        Err(e) if after.map(State::id) != before => {
            log_core_error(&e);
            change_state::Response {
                success: true,
                message: format!("transition ok -> {current}, notification failed: {e}"),
            }
        }
        Err(e) => change_state_failed(&e),
    }
}

fn change_state_failed(e: &CoreError) -> change_state::Response {
    change_state::Response {
        success: false,
        message: format!("transition failed: {e}"),
    }
}
