//! Well-known state/transition ids and labels of the standard managed-node lifecycle.
//!
//! Numbering mirrors `lifecycle_msgs/msg/State` and `lifecycle_msgs/msg/Transition`
//! so that ids handed out by the default topology can go on the wire unchanged.

/// State ids (primary + transition states).
pub mod state_ids {
    pub const PRIMARY_STATE_UNKNOWN: u8 = 0;
    pub const PRIMARY_STATE_UNCONFIGURED: u8 = 1;
    pub const PRIMARY_STATE_INACTIVE: u8 = 2;
    pub const PRIMARY_STATE_ACTIVE: u8 = 3;
    pub const PRIMARY_STATE_FINALIZED: u8 = 4;
    pub const TRANSITION_STATE_CONFIGURING: u8 = 10;
    pub const TRANSITION_STATE_CLEANINGUP: u8 = 11;
    pub const TRANSITION_STATE_SHUTTINGDOWN: u8 = 12;
    pub const TRANSITION_STATE_ACTIVATING: u8 = 13;
    pub const TRANSITION_STATE_DEACTIVATING: u8 = 14;
    pub const TRANSITION_STATE_ERRORPROCESSING: u8 = 15;
}

/// Transition ids.
///
/// User-invoked transitions are single digits; the implicit outcome edges
/// leaving a transition state are grouped by tens.
pub mod transition_ids {
    pub const TRANSITION_CONFIGURE: u8 = 1;
    pub const TRANSITION_CLEANUP: u8 = 2;
    pub const TRANSITION_ACTIVATE: u8 = 3;
    pub const TRANSITION_DEACTIVATE: u8 = 4;
    pub const TRANSITION_UNCONFIGURED_SHUTDOWN: u8 = 5;
    pub const TRANSITION_INACTIVE_SHUTDOWN: u8 = 6;
    pub const TRANSITION_ACTIVE_SHUTDOWN: u8 = 7;

    pub const TRANSITION_ON_CONFIGURE_SUCCESS: u8 = 10;
    pub const TRANSITION_ON_CONFIGURE_FAILURE: u8 = 11;
    pub const TRANSITION_ON_CONFIGURE_ERROR: u8 = 12;

    pub const TRANSITION_ON_CLEANUP_SUCCESS: u8 = 20;
    pub const TRANSITION_ON_CLEANUP_FAILURE: u8 = 21;
    pub const TRANSITION_ON_CLEANUP_ERROR: u8 = 22;

    pub const TRANSITION_ON_ACTIVATE_SUCCESS: u8 = 30;
    pub const TRANSITION_ON_ACTIVATE_FAILURE: u8 = 31;
    pub const TRANSITION_ON_ACTIVATE_ERROR: u8 = 32;

    pub const TRANSITION_ON_DEACTIVATE_SUCCESS: u8 = 40;
    pub const TRANSITION_ON_DEACTIVATE_FAILURE: u8 = 41;
    pub const TRANSITION_ON_DEACTIVATE_ERROR: u8 = 42;

    pub const TRANSITION_ON_SHUTDOWN_SUCCESS: u8 = 50;
    pub const TRANSITION_ON_SHUTDOWN_FAILURE: u8 = 51;
    pub const TRANSITION_ON_SHUTDOWN_ERROR: u8 = 52;

    pub const TRANSITION_ON_ERROR_SUCCESS: u8 = 60;
    pub const TRANSITION_ON_ERROR_FAILURE: u8 = 61;
    pub const TRANSITION_ON_ERROR_ERROR: u8 = 62;
}

/// State labels used by the default topology.
pub mod state_labels {
    pub const UNKNOWN: &str = "unknown";
    pub const UNCONFIGURED: &str = "unconfigured";
    pub const INACTIVE: &str = "inactive";
    pub const ACTIVE: &str = "active";
    pub const FINALIZED: &str = "finalized";
    pub const CONFIGURING: &str = "configuring";
    pub const CLEANINGUP: &str = "cleaningup";
    pub const SHUTTINGDOWN: &str = "shuttingdown";
    pub const ACTIVATING: &str = "activating";
    pub const DEACTIVATING: &str = "deactivating";
    pub const ERRORPROCESSING: &str = "errorprocessing";
}

/// Transition labels used by the default topology.
pub mod transition_labels {
    pub const CONFIGURE: &str = "configure";
    pub const CLEANUP: &str = "cleanup";
    pub const ACTIVATE: &str = "activate";
    pub const DEACTIVATE: &str = "deactivate";
    pub const SHUTDOWN: &str = "shutdown";

    pub const TRANSITION_SUCCESS: &str = "transition_success";
    pub const TRANSITION_FAILURE: &str = "transition_failure";
    pub const TRANSITION_ERROR: &str = "transition_error";
}
