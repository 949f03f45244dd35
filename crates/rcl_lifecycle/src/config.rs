//! State machine options.

use std::env;

pub const ENV_ENABLE_COM_INTERFACE: &str = "RCL_LIFECYCLE_ENABLE_COM_INTERFACE";
pub const ENV_INITIALIZE_DEFAULT_STATES: &str = "RCL_LIFECYCLE_INITIALIZE_DEFAULT_STATES";

/// Engine-wide options handed to [`StateMachine::init`](crate::lifecycle::StateMachine::init).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StateMachineOptions {
    /// Bring up the lifecycle services, not just the transition-event publisher.
    pub enable_com_interface: bool,
    /// Populate the transition map with the standard managed-node topology.
    pub initialize_default_states: bool,
}

impl Default for StateMachineOptions {
    fn default() -> Self {
        Self {
            enable_com_interface: true,
            initialize_default_states: true,
        }
    }
}

impl StateMachineOptions {
    /// Defaults overridden by `RCL_LIFECYCLE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`StateMachineOptions::from_env`] with an explicit variable lookup.
    ///
    /// Unparseable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            enable_com_interface: lookup(ENV_ENABLE_COM_INTERFACE)
                .and_then(parse_bool)
                .unwrap_or(defaults.enable_com_interface),
            initialize_default_states: lookup(ENV_INITIALIZE_DEFAULT_STATES)
                .and_then(parse_bool)
                .unwrap_or(defaults.initialize_default_states),
        }
    }
}

fn parse_bool(value: String) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let opts = StateMachineOptions::default();
        assert!(opts.enable_com_interface);
        assert!(opts.initialize_default_states);
    }

    #[test]
    fn env_values_override_defaults() {
        let opts = StateMachineOptions::from_lookup(|key| match key {
            ENV_ENABLE_COM_INTERFACE => Some("off".to_string()),
            ENV_INITIALIZE_DEFAULT_STATES => Some(" No ".to_string()),
            _ => None,
        });
        assert!(!opts.enable_com_interface);
        assert!(!opts.initialize_default_states);
    }

    #[test]
    fn unparseable_values_keep_defaults() {
        let opts = StateMachineOptions::from_lookup(|key| match key {
            ENV_ENABLE_COM_INTERFACE => Some("maybe".to_string()),
            _ => None,
        });
        assert_eq!(opts, StateMachineOptions::default());
    }
}
