use std::borrow::Cow;

use tracing::{error, trace, warn};

use crate::config::StateMachineOptions;
use crate::error::{CoreError, Domain, ErrorKind, Payload, Result};

use super::default_topology::{register_default_topology, DEFAULT_INITIAL_STATE};
use super::{ComInterface, ComMode, NoopComInterface, State, Transition, TransitionMap};

/// A lifecycle state machine: a transition map, the state currently occupied,
/// and the communication boundary used to announce transitions.
///
/// Lifecycle:
/// - [`StateMachine::zero_initialized`] (or `Default`) gives an empty machine
/// - [`StateMachine::init`] brings up the boundary and, if asked, the default topology
/// - triggers move `current_state` along outgoing transitions
/// - [`StateMachine::fini`] tears everything down; safe to call repeatedly
///
/// Single owner, no internal locking. Hosts that share a machine across threads
/// wrap it themselves (see the com crate's service layer).
pub struct StateMachine<C: ComInterface = NoopComInterface> {
    current_state: Option<StateHandle>,
    options: StateMachineOptions,
    transition_map: TransitionMap,
    com_interface: Option<C>,
}

/// Index into `transition_map.states()`, tied to the map generation it was
/// taken in. States are never removed individually, so the index only goes
/// stale when the whole map is finalized.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct StateHandle {
    index: usize,
    generation: u64,
}

impl<C: ComInterface> Default for StateMachine<C> {
    fn default() -> Self {
        Self {
            current_state: None,
            options: StateMachineOptions::default(),
            transition_map: TransitionMap::default(),
            com_interface: None,
        }
    }
}

impl<C: ComInterface> std::fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current_state", &self.current_state().map(State::label))
            .field("options", &self.options)
            .field("states", &self.transition_map.state_count())
            .field("transitions", &self.transition_map.transition_count())
            .field("com_interface", &self.com_interface.is_some())
            .finish()
    }
}

impl<C: ComInterface> StateMachine<C> {
    /// An empty machine: no states, no boundary. `fini` on it is a no-op.
    pub fn zero_initialized() -> Self {
        Self::default()
    }

    /// Bring the machine up.
    ///
    /// The boundary is initialized first (full or publisher-only per
    /// `options.enable_com_interface`); if that fails nothing else is built.
    /// When `options.initialize_default_states` is set, the default topology
    /// is built next and the machine starts in `unconfigured`. A topology
    /// failure tears the boundary and the partial map down again and returns a
    /// single error carrying any teardown failure as well.
    pub fn init(&mut self, mut com_interface: C, options: StateMachineOptions) -> Result<()> {
        if self.com_interface.is_some() {
            return Err(CoreError::error()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::InvalidState)
                .msg("state machine is already initialized")
                .build());
        }

        let mode = if options.enable_com_interface {
            ComMode::Full
        } else {
            ComMode::PublisherOnly
        };
        com_interface.init(mode)?;

        self.com_interface = Some(com_interface);
        self.options = options;

        if options.initialize_default_states {
            if let Err(e) = self.init_default_topology() {
                let e = match self.com_interface.take().map(|mut com| com.fini()) {
                    Some(Err(teardown)) => CoreError::merge_unwind(e, teardown),
                    _ => e,
                };
                self.transition_map.fini();
                self.current_state = None;
                return Err(e);
            }
        }

        Ok(())
    }

    /// Build the standard managed-node topology into this machine's map and
    /// move to `unconfigured`. On failure the map is left empty and the machine
    /// has no current state.
    pub fn init_default_topology(&mut self) -> Result<()> {
        if let Err(e) = register_default_topology(&mut self.transition_map) {
            self.current_state = None;
            return Err(e);
        }
        self.set_current_state(DEFAULT_INITIAL_STATE)
    }

    /// True when a topology is present and, with the boundary enabled, its
    /// services are up.
    pub fn is_initialized(&self) -> bool {
        if self.transition_map.state_count() == 0 {
            return false;
        }
        if self.options.enable_com_interface {
            return self
                .com_interface
                .as_ref()
                .is_some_and(|com| com.has_services());
        }
        true
    }

    /// The state currently occupied, `None` before a topology exists.
    pub fn current_state(&self) -> Option<&State> {
        self.current_state.and_then(|handle| self.resolve_handle(handle))
    }

    /// Jump to a registered state without a transition. For hosts that build a
    /// custom topology through [`StateMachine::transition_map_mut`].
    pub fn set_current_state(&mut self, state_id: u8) -> Result<()> {
        let index = self
            .transition_map
            .state_index(state_id)
            .ok_or_else(|| CoreError::state_not_registered(state_id))?;
        self.current_state = Some(self.handle(index));
        Ok(())
    }

    /// Transitions leaving the current state.
    pub fn available_transitions(&self) -> &[Transition] {
        self.current_state()
            .map(State::valid_transitions)
            .unwrap_or(&[])
    }

    pub fn transition_map(&self) -> &TransitionMap {
        &self.transition_map
    }

    pub fn transition_map_mut(&mut self) -> &mut TransitionMap {
        &mut self.transition_map
    }

    pub fn options(&self) -> &StateMachineOptions {
        &self.options
    }

    pub fn com_interface(&self) -> Option<&C> {
        self.com_interface.as_ref()
    }

    pub fn com_interface_mut(&mut self) -> Option<&mut C> {
        self.com_interface.as_mut()
    }

    /// Take `transition`, moving the machine to its goal state.
    ///
    /// Both endpoints must be registered in this machine's map, otherwise
    /// `InvalidArgument` is returned and nothing changes. With
    /// `publish_notification` the boundary must be initialized (`InvalidState`
    /// otherwise, again without a change) and announces `(start, goal)`; if
    /// that fails the error is returned but the state change stands: the node
    /// is in the new state, observers may not know.
    pub fn trigger_transition(
        &mut self,
        transition: &Transition,
        publish_notification: bool,
    ) -> Result<()> {
        let start_idx = self.resolve_endpoint(transition, transition.start(), "start")?;
        let goal_idx = self.resolve_endpoint(transition, transition.goal(), "goal")?;
        if publish_notification && self.com_interface.is_none() {
            return Err(com_not_initialized());
        }

        let goal = self.handle(goal_idx);
        let previous = self.current_state.replace(goal);

        let published = if publish_notification {
            self.publish_notification(start_idx, goal_idx)
        } else {
            Ok(())
        };

        trace!(
            start = previous
                .and_then(|handle| self.resolve_handle(handle))
                .map(State::label)
                .unwrap_or_default(),
            goal = self.current_state().map(State::label).unwrap_or_default(),
            transition = transition.label(),
            "lifecycle transition"
        );

        if let Err(e) = &published {
            warn!(
                transition = transition.label(),
                "state changed but the transition notification failed: {e}"
            );
        }
        published
    }

    /// Take the outgoing transition of the current state with id `id`.
    pub fn trigger_transition_by_id(&mut self, id: u8, publish_notification: bool) -> Result<()> {
        let current = self.require_current_state()?;
        let transition = current
            .transition_by_id(id)
            .cloned()
            .ok_or_else(|| CoreError::invalid_transition_lifecycle(current.id(), id))?;
        self.trigger_transition(&transition, publish_notification)
    }

    /// Take the outgoing transition of the current state labeled `label`.
    pub fn trigger_transition_by_label(
        &mut self,
        label: &str,
        publish_notification: bool,
    ) -> Result<()> {
        let current = self.require_current_state()?;
        let transition = current.transition_by_label(label).cloned().ok_or_else(|| {
            CoreError::warn()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::InvalidArgument)
                .msgf(format_args!(
                    "no transition labeled '{label}' leaves state '{}'",
                    current.label()
                ))
                .payload(Payload::Context {
                    key: "label",
                    value: Cow::Owned(label.to_string()),
                })
                .build()
        })?;
        self.trigger_transition(&transition, publish_notification)
    }

    /// Log the whole topology at info level.
    pub fn print_state_machine(&self) {
        self.transition_map.print();
    }

    /// Tear down the boundary, then the transition map.
    ///
    /// Both steps always run. A boundary failure is logged and returned after
    /// the map is gone. Safe on a zero-initialized or already finalized machine.
    pub fn fini(&mut self) -> Result<()> {
        let com_result = match self.com_interface.take() {
            Some(mut com) => com.fini(),
            None => Ok(()),
        };
        if let Err(e) = &com_result {
            error!("failed to finalize lifecycle com interface: {e}");
        }

        self.transition_map.fini();
        self.current_state = None;
        self.options = StateMachineOptions::default();

        com_result
    }

    fn require_current_state(&self) -> Result<&State> {
        self.current_state().ok_or_else(|| {
            CoreError::error()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::InvalidArgument)
                .msg("state machine has no current state")
                .build()
        })
    }

    fn resolve_endpoint(
        &self,
        transition: &Transition,
        endpoint: Option<u8>,
        which: &'static str,
    ) -> Result<usize> {
        endpoint
            .and_then(|id| self.transition_map.state_index(id))
            .ok_or_else(|| {
                CoreError::warn()
                    .domain(Domain::Lifecycle)
                    .kind(ErrorKind::InvalidArgument)
                    .msgf(format_args!(
                        "transition '{}' ({}) has no registered {which} state",
                        transition.label(),
                        transition.id()
                    ))
                    .payload(Payload::TransitionId(transition.id()))
                    .build()
            })
    }

    fn handle(&self, index: usize) -> StateHandle {
        StateHandle {
            index,
            generation: self.transition_map.generation(),
        }
    }

    fn resolve_handle(&self, handle: StateHandle) -> Option<&State> {
        if handle.generation != self.transition_map.generation() {
            return None;
        }
        self.transition_map.state_at(handle.index)
    }

    fn publish_notification(&mut self, start_idx: usize, goal_idx: usize) -> Result<()> {
        let com = self.com_interface.as_mut().ok_or_else(com_not_initialized)?;

        match (
            self.transition_map.state_at(start_idx),
            self.transition_map.state_at(goal_idx),
        ) {
            (Some(start), Some(goal)) => com.publish_notification(start, goal),
            _ => Err(CoreError::error()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::InvalidState)
                .msg("transition endpoints vanished from the transition map")
                .build()),
        }
    }
}

fn com_not_initialized() -> CoreError {
    CoreError::error()
        .domain(Domain::Communication)
        .kind(ErrorKind::InvalidState)
        .msg("cannot publish transition: com interface is not initialized")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::ids::{state_ids, state_labels, transition_ids, transition_labels};

    /// Boundary that records notifications and can be told to fail.
    #[derive(Default)]
    struct RecordingCom {
        mode: Option<ComMode>,
        published: Vec<(u8, u8)>,
        fail_init: bool,
        fail_publish: bool,
        fail_fini: bool,
        fini_calls: usize,
    }

    fn boom(msg: &'static str) -> CoreError {
        CoreError::error()
            .domain(Domain::Communication)
            .kind(ErrorKind::Transport)
            .msg(msg)
            .build()
    }

    impl ComInterface for RecordingCom {
        fn init(&mut self, mode: ComMode) -> Result<()> {
            if self.fail_init {
                return Err(boom("init refused"));
            }
            self.mode = Some(mode);
            Ok(())
        }
        fn has_services(&self) -> bool {
            self.mode == Some(ComMode::Full)
        }
        fn publish_notification(&mut self, start: &State, goal: &State) -> Result<()> {
            if self.fail_publish {
                return Err(boom("publish refused"));
            }
            self.published.push((start.id(), goal.id()));
            Ok(())
        }
        fn fini(&mut self) -> Result<()> {
            self.fini_calls += 1;
            self.mode = None;
            if self.fail_fini {
                return Err(boom("fini refused"));
            }
            Ok(())
        }
    }

    fn default_machine() -> StateMachine<RecordingCom> {
        let mut sm = StateMachine::zero_initialized();
        sm.init(RecordingCom::default(), StateMachineOptions::default())
            .unwrap();
        sm
    }

    fn current_label<C: ComInterface>(sm: &StateMachine<C>) -> &str {
        sm.current_state().unwrap().label()
    }

    #[test]
    fn init_builds_default_topology_at_unconfigured() {
        let sm = default_machine();
        assert!(sm.is_initialized());
        assert_eq!(current_label(&sm), state_labels::UNCONFIGURED);
        assert_eq!(sm.transition_map().state_count(), 11);
    }

    #[test]
    fn configure_then_success_reaches_inactive() {
        let mut sm = default_machine();

        sm.trigger_transition_by_label(transition_labels::CONFIGURE, false)
            .unwrap();
        assert_eq!(current_label(&sm), state_labels::CONFIGURING);

        sm.trigger_transition_by_id(transition_ids::TRANSITION_ON_CONFIGURE_SUCCESS, false)
            .unwrap();
        assert_eq!(current_label(&sm), state_labels::INACTIVE);
    }

    #[test]
    fn unknown_transition_is_invalid_argument_and_keeps_state() {
        let mut sm = default_machine();

        let err = sm
            .trigger_transition_by_label(transition_labels::ACTIVATE, true)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);

        let err = sm.trigger_transition_by_id(200, true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(
            err.payload,
            Payload::LifecycleTransition {
                from_state: state_ids::PRIMARY_STATE_UNCONFIGURED,
                via_transition: 200,
            }
        );

        assert_eq!(current_label(&sm), state_labels::UNCONFIGURED);
        assert!(sm.com_interface().unwrap().published.is_empty());
    }

    #[test]
    fn zero_transition_is_rejected_before_mutation() {
        let mut sm = default_machine();
        let err = sm
            .trigger_transition(&Transition::default(), false)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(current_label(&sm), state_labels::UNCONFIGURED);
    }

    #[test]
    fn publish_announces_start_and_goal() {
        let mut sm = default_machine();
        sm.trigger_transition_by_label(transition_labels::CONFIGURE, true)
            .unwrap();

        assert_eq!(
            sm.com_interface().unwrap().published,
            vec![(
                state_ids::PRIMARY_STATE_UNCONFIGURED,
                state_ids::TRANSITION_STATE_CONFIGURING
            )]
        );
    }

    #[test]
    fn publish_failure_is_reported_but_state_change_stands() {
        let mut sm = default_machine();
        sm.com_interface_mut().unwrap().fail_publish = true;

        let err = sm
            .trigger_transition_by_label(transition_labels::CONFIGURE, true)
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(current_label(&sm), state_labels::CONFIGURING);
    }

    #[test]
    fn publisher_only_machine_needs_no_services() {
        let mut sm: StateMachine<RecordingCom> = StateMachine::zero_initialized();
        sm.init(
            RecordingCom::default(),
            StateMachineOptions {
                enable_com_interface: false,
                initialize_default_states: true,
            },
        )
        .unwrap();

        assert_eq!(
            sm.com_interface().unwrap().mode,
            Some(ComMode::PublisherOnly)
        );
        // services are not required when the boundary is disabled
        assert!(sm.is_initialized());
    }

    #[test]
    fn com_init_failure_builds_nothing() {
        let mut sm: StateMachine<RecordingCom> = StateMachine::zero_initialized();
        let com = RecordingCom {
            fail_init: true,
            ..RecordingCom::default()
        };

        let err = sm.init(com, StateMachineOptions::default()).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Transport);
        assert!(sm.transition_map().is_empty());
        assert!(sm.com_interface().is_none());
        assert!(!sm.is_initialized());
    }

    #[test]
    fn topology_failure_unwinds_and_merges_teardown_error() {
        let mut sm: StateMachine<RecordingCom> = StateMachine::zero_initialized();
        sm.transition_map_mut()
            .register_state(State::new(state_ids::PRIMARY_STATE_UNCONFIGURED, "taken").unwrap())
            .unwrap();
        let com = RecordingCom {
            fail_fini: true,
            ..RecordingCom::default()
        };

        let err = sm.init(com, StateMachineOptions::default()).unwrap_err();

        assert_eq!(err.kind, ErrorKind::StateAlreadyRegistered);
        assert!(err.message.contains("fini refused"));
        assert_eq!(err.unwind_error().unwrap().kind, ErrorKind::Transport);
        assert!(sm.transition_map().is_empty());
        assert!(sm.com_interface().is_none());
        assert!(sm.current_state().is_none());
    }

    #[test]
    fn double_init_is_rejected() {
        let mut sm = default_machine();
        let err = sm
            .init(RecordingCom::default(), StateMachineOptions::default())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
        assert!(sm.is_initialized());
    }

    #[test]
    fn fini_on_zero_machine_is_noop() {
        let mut sm: StateMachine = StateMachine::zero_initialized();
        sm.fini().unwrap();
        sm.fini().unwrap();
        assert!(!sm.is_initialized());
    }

    #[test]
    fn fini_reports_com_failure_and_still_clears_map() {
        let mut sm = default_machine();
        sm.com_interface_mut().unwrap().fail_fini = true;

        let err = sm.fini().unwrap_err();

        assert_eq!(err.kind, ErrorKind::Transport);
        assert!(sm.transition_map().is_empty());
        assert!(sm.current_state().is_none());
        sm.fini().unwrap();
    }

    #[test]
    fn custom_topology_can_be_built_by_hand() {
        let mut sm: StateMachine = StateMachine::zero_initialized();
        sm.init(
            NoopComInterface::default(),
            StateMachineOptions {
                enable_com_interface: false,
                initialize_default_states: false,
            },
        )
        .unwrap();
        assert!(!sm.is_initialized());

        let idle = State::new(1, "idle").unwrap();
        let busy = State::new(2, "busy").unwrap();
        let map = sm.transition_map_mut();
        map.register_state(idle.clone()).unwrap();
        map.register_state(busy.clone()).unwrap();
        map.register_transition(Transition::new(1, "start", &idle, &busy).unwrap())
            .unwrap();
        sm.set_current_state(1).unwrap();

        assert!(sm.is_initialized());
        sm.trigger_transition_by_label("start", true).unwrap();
        assert_eq!(current_label(&sm), "busy");
        assert!(sm.available_transitions().is_empty());

        let err = sm.set_current_state(9).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StateNotRegistered);
    }

    #[test]
    fn failed_topology_rebuild_drops_the_current_state() {
        let mut sm = default_machine();
        sm.trigger_transition_by_label(transition_labels::CONFIGURE, false)
            .unwrap();

        let err = sm.init_default_topology().unwrap_err();
        assert_eq!(err.kind, ErrorKind::StateAlreadyRegistered);
        assert!(sm.transition_map().is_empty());
        assert!(sm.current_state().is_none());

        let map = sm.transition_map_mut();
        for id in 100..112 {
            map.register_state(State::new(id, format!("foreign{id}")).unwrap())
                .unwrap();
        }
        assert!(sm.current_state().is_none());
        assert!(sm.available_transitions().is_empty());
    }

    #[test]
    fn current_state_does_not_survive_a_map_teardown() {
        let mut sm = default_machine();
        sm.transition_map_mut().fini();

        sm.transition_map_mut()
            .register_state(State::new(50, "newcomer").unwrap())
            .unwrap();

        assert!(sm.current_state().is_none());
        sm.set_current_state(50).unwrap();
        assert_eq!(current_label(&sm), "newcomer");
    }

    #[test]
    fn publishing_without_a_boundary_keeps_the_state() {
        let mut sm: StateMachine = StateMachine::zero_initialized();
        let idle = State::new(1, "idle").unwrap();
        let busy = State::new(2, "busy").unwrap();
        let map = sm.transition_map_mut();
        map.register_state(idle.clone()).unwrap();
        map.register_state(busy.clone()).unwrap();
        map.register_transition(Transition::new(1, "go", &idle, &busy).unwrap())
            .unwrap();
        sm.set_current_state(1).unwrap();

        let err = sm.trigger_transition_by_label("go", true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
        assert_eq!(current_label(&sm), "idle");

        sm.trigger_transition_by_label("go", false).unwrap();
        assert_eq!(current_label(&sm), "busy");
    }
}
