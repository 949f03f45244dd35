use crate::error::Result;

use super::ids::{state_ids::*, state_labels, transition_ids::*, transition_labels::*};
use super::{State, Transition, TransitionMap};

/// Stable resting states.
const PRIMARY_STATES: [(u8, &str); 5] = [
    (PRIMARY_STATE_UNKNOWN, state_labels::UNKNOWN),
    (PRIMARY_STATE_UNCONFIGURED, state_labels::UNCONFIGURED),
    (PRIMARY_STATE_INACTIVE, state_labels::INACTIVE),
    (PRIMARY_STATE_ACTIVE, state_labels::ACTIVE),
    (PRIMARY_STATE_FINALIZED, state_labels::FINALIZED),
];

/// States entered while a transition's side effects run.
const TRANSITION_STATES: [(u8, &str); 6] = [
    (TRANSITION_STATE_CONFIGURING, state_labels::CONFIGURING),
    (TRANSITION_STATE_CLEANINGUP, state_labels::CLEANINGUP),
    (TRANSITION_STATE_SHUTTINGDOWN, state_labels::SHUTTINGDOWN),
    (TRANSITION_STATE_ACTIVATING, state_labels::ACTIVATING),
    (TRANSITION_STATE_DEACTIVATING, state_labels::DEACTIVATING),
    (TRANSITION_STATE_ERRORPROCESSING, state_labels::ERRORPROCESSING),
];

/// `(transition id, label, start state id, goal state id)`.
type Edge = (u8, &'static str, u8, u8);

#[rustfmt::skip]
const TRANSITIONS: [Edge; 25] = [
    // Configure: Unconfigured -> Configuring -> (Inactive | Unconfigured | ErrorProcessing)
    (TRANSITION_CONFIGURE, CONFIGURE, PRIMARY_STATE_UNCONFIGURED, TRANSITION_STATE_CONFIGURING),
    (TRANSITION_ON_CONFIGURE_SUCCESS, TRANSITION_SUCCESS, TRANSITION_STATE_CONFIGURING, PRIMARY_STATE_INACTIVE),
    (TRANSITION_ON_CONFIGURE_FAILURE, TRANSITION_FAILURE, TRANSITION_STATE_CONFIGURING, PRIMARY_STATE_UNCONFIGURED),
    (TRANSITION_ON_CONFIGURE_ERROR, TRANSITION_ERROR, TRANSITION_STATE_CONFIGURING, TRANSITION_STATE_ERRORPROCESSING),
    // Cleanup: Inactive -> CleaningUp -> (Unconfigured | Inactive | ErrorProcessing)
    (TRANSITION_CLEANUP, CLEANUP, PRIMARY_STATE_INACTIVE, TRANSITION_STATE_CLEANINGUP),
    (TRANSITION_ON_CLEANUP_SUCCESS, TRANSITION_SUCCESS, TRANSITION_STATE_CLEANINGUP, PRIMARY_STATE_UNCONFIGURED),
    (TRANSITION_ON_CLEANUP_FAILURE, TRANSITION_FAILURE, TRANSITION_STATE_CLEANINGUP, PRIMARY_STATE_INACTIVE),
    (TRANSITION_ON_CLEANUP_ERROR, TRANSITION_ERROR, TRANSITION_STATE_CLEANINGUP, TRANSITION_STATE_ERRORPROCESSING),
    // Activate: Inactive -> Activating -> (Active | Inactive | ErrorProcessing)
    (TRANSITION_ACTIVATE, ACTIVATE, PRIMARY_STATE_INACTIVE, TRANSITION_STATE_ACTIVATING),
    (TRANSITION_ON_ACTIVATE_SUCCESS, TRANSITION_SUCCESS, TRANSITION_STATE_ACTIVATING, PRIMARY_STATE_ACTIVE),
    (TRANSITION_ON_ACTIVATE_FAILURE, TRANSITION_FAILURE, TRANSITION_STATE_ACTIVATING, PRIMARY_STATE_INACTIVE),
    (TRANSITION_ON_ACTIVATE_ERROR, TRANSITION_ERROR, TRANSITION_STATE_ACTIVATING, TRANSITION_STATE_ERRORPROCESSING),
    // Deactivate: Active -> Deactivating -> (Inactive | Active | ErrorProcessing)
    (TRANSITION_DEACTIVATE, DEACTIVATE, PRIMARY_STATE_ACTIVE, TRANSITION_STATE_DEACTIVATING),
    (TRANSITION_ON_DEACTIVATE_SUCCESS, TRANSITION_SUCCESS, TRANSITION_STATE_DEACTIVATING, PRIMARY_STATE_INACTIVE),
    (TRANSITION_ON_DEACTIVATE_FAILURE, TRANSITION_FAILURE, TRANSITION_STATE_DEACTIVATING, PRIMARY_STATE_ACTIVE),
    (TRANSITION_ON_DEACTIVATE_ERROR, TRANSITION_ERROR, TRANSITION_STATE_DEACTIVATING, TRANSITION_STATE_ERRORPROCESSING),
    // Shutdown: (Unconfigured | Inactive | Active) -> ShuttingDown -> (Finalized | ErrorProcessing)
    (TRANSITION_UNCONFIGURED_SHUTDOWN, SHUTDOWN, PRIMARY_STATE_UNCONFIGURED, TRANSITION_STATE_SHUTTINGDOWN),
    (TRANSITION_INACTIVE_SHUTDOWN, SHUTDOWN, PRIMARY_STATE_INACTIVE, TRANSITION_STATE_SHUTTINGDOWN),
    (TRANSITION_ACTIVE_SHUTDOWN, SHUTDOWN, PRIMARY_STATE_ACTIVE, TRANSITION_STATE_SHUTTINGDOWN),
    (TRANSITION_ON_SHUTDOWN_SUCCESS, TRANSITION_SUCCESS, TRANSITION_STATE_SHUTTINGDOWN, PRIMARY_STATE_FINALIZED),
    (TRANSITION_ON_SHUTDOWN_FAILURE, TRANSITION_FAILURE, TRANSITION_STATE_SHUTTINGDOWN, PRIMARY_STATE_FINALIZED),
    (TRANSITION_ON_SHUTDOWN_ERROR, TRANSITION_ERROR, TRANSITION_STATE_SHUTTINGDOWN, TRANSITION_STATE_ERRORPROCESSING),
    // ErrorProcessing: success -> Unconfigured, failure/error -> Finalized
    (TRANSITION_ON_ERROR_SUCCESS, TRANSITION_SUCCESS, TRANSITION_STATE_ERRORPROCESSING, PRIMARY_STATE_UNCONFIGURED),
    (TRANSITION_ON_ERROR_FAILURE, TRANSITION_FAILURE, TRANSITION_STATE_ERRORPROCESSING, PRIMARY_STATE_FINALIZED),
    (TRANSITION_ON_ERROR_ERROR, TRANSITION_ERROR, TRANSITION_STATE_ERRORPROCESSING, PRIMARY_STATE_FINALIZED),
];

/// State a machine sits in right after the default topology is built.
pub const DEFAULT_INITIAL_STATE: u8 = PRIMARY_STATE_UNCONFIGURED;

/// Populate `map` with the standard managed-node lifecycle.
///
/// Primary states are registered first, then transition states, then every
/// edge. On failure the partially built map is finalized before the error is
/// returned, so the caller never sees half a topology.
pub fn register_default_topology(map: &mut TransitionMap) -> Result<()> {
    if let Err(e) = register_all(map) {
        map.fini();
        return Err(e);
    }
    Ok(())
}

fn register_all(map: &mut TransitionMap) -> Result<()> {
    for (id, label) in PRIMARY_STATES.iter().chain(TRANSITION_STATES.iter()) {
        map.register_state(State::new(*id, *label)?)?;
    }

    for (id, label, start, goal) in TRANSITIONS {
        map.register_transition(Transition::from_ids(id, label, start, goal)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_topology_has_all_states_and_edges() {
        let mut map = TransitionMap::default();
        register_default_topology(&mut map).unwrap();

        assert_eq!(map.state_count(), 11);
        assert_eq!(map.transition_count(), 25);

        let finalized = map.get_state(PRIMARY_STATE_FINALIZED).unwrap();
        assert!(finalized.is_terminal());

        let unknown = map.get_state(PRIMARY_STATE_UNKNOWN).unwrap();
        assert!(unknown.is_terminal());
    }

    #[test]
    fn error_processing_only_recovers_or_finalizes() {
        let mut map = TransitionMap::default();
        register_default_topology(&mut map).unwrap();

        let errorprocessing = map.get_state(TRANSITION_STATE_ERRORPROCESSING).unwrap();
        let goals: Vec<u8> = errorprocessing
            .valid_transitions()
            .iter()
            .filter_map(|t| t.goal())
            .collect();

        assert_eq!(
            goals,
            vec![
                PRIMARY_STATE_UNCONFIGURED,
                PRIMARY_STATE_FINALIZED,
                PRIMARY_STATE_FINALIZED
            ]
        );
    }

    #[test]
    fn every_transition_state_can_reach_error_processing() {
        let mut map = TransitionMap::default();
        register_default_topology(&mut map).unwrap();

        for (id, _) in TRANSITION_STATES
            .iter()
            .filter(|(id, _)| *id != TRANSITION_STATE_ERRORPROCESSING)
        {
            let state = map.get_state(*id).unwrap();
            let error_edge = state.transition_by_label(TRANSITION_ERROR).unwrap();
            assert_eq!(error_edge.goal(), Some(TRANSITION_STATE_ERRORPROCESSING));
        }
    }

    #[test]
    fn failure_unwinds_the_partial_map() {
        let mut map = TransitionMap::default();
        map.register_state(State::new(PRIMARY_STATE_ACTIVE, "preexisting").unwrap())
            .unwrap();

        let err = register_default_topology(&mut map).unwrap_err();

        assert_eq!(err.kind, ErrorKind::StateAlreadyRegistered);
        assert!(map.is_empty());
    }
}
