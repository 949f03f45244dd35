use std::borrow::Cow;
use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

/// Convenient result alias for rcl_lifecycle.
pub type Result<T> = std::result::Result<T, CoreError>;

/// How loudly an error should be reported; the com crate maps it onto `tracing` levels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// Subsystem that raised the error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Domain {
    /// State machine construction, triggering and teardown.
    Lifecycle,
    /// Transition map registration and lookup.
    Registry,
    /// The communication boundary (publisher + services).
    Communication,
    Other,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed input or an unresolvable transition handed to a trigger.
    InvalidArgument,
    /// Storage could not grow.
    BadAlloc,
    StateAlreadyRegistered,
    StateNotRegistered,
    /// A lookup miss. Lookups themselves return `Option`; this kind is used
    /// where a miss has to travel as an error (e.g. service responses).
    NotFound,
    /// Operation not valid for the current lifecycle of the value
    /// (e.g. publishing on a finalized com interface).
    InvalidState,
    Transport,
    /// Collaborator-reported failure surfaced verbatim.
    Unspecified,
}

/// Ids or context attached to an error.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Payload {
    None,

    Context {
        key: &'static str,
        value: Cow<'static, str>,
    },

    /// The state id the error is about.
    StateId(u8),

    /// The transition id the error is about.
    TransitionId(u8),

    /// A transition requested from a state that has no such outgoing edge.
    LifecycleTransition {
        from_state: u8,
        via_transition: u8,
    },

    /// Secondary error hit while unwinding after the primary one.
    Unwind(Box<CoreError>),
}

/// Error returned by every fallible engine operation.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("{severity:?}: {message}")]
pub struct CoreError {
    pub domain: Domain,
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: Cow<'static, str>,
    pub payload: Payload,
}

impl CoreError {
    #[inline]
    pub fn warn() -> ErrB {
        ErrB::new(Severity::Warn)
    }
    #[inline]
    pub fn error() -> ErrB {
        ErrB::new(Severity::Error)
    }
    #[inline]
    pub fn fatal() -> ErrB {
        ErrB::new(Severity::Fatal)
    }

    /// `register_state` on an id that is already present.
    pub fn state_already_registered(state_id: u8) -> Self {
        CoreError::error()
            .domain(Domain::Registry)
            .kind(ErrorKind::StateAlreadyRegistered)
            .msgf(format_args!("state {state_id} is already registered"))
            .payload(Payload::StateId(state_id))
            .build()
    }

    /// A transition endpoint (or a requested current state) that is not in the map.
    pub fn state_not_registered(state_id: u8) -> Self {
        CoreError::error()
            .domain(Domain::Registry)
            .kind(ErrorKind::StateNotRegistered)
            .msgf(format_args!("state {state_id} is not registered"))
            .payload(Payload::StateId(state_id))
            .build()
    }

    /// Storage growth failed.
    pub fn bad_alloc(what: &'static str, e: TryReserveError) -> Self {
        CoreError::fatal()
            .domain(Domain::Registry)
            .kind(ErrorKind::BadAlloc)
            .msgf(format_args!("failed to grow {what}"))
            .payload(Payload::Context {
                key: "alloc",
                value: e.to_string().into(),
            })
            .build()
    }

    /// No outgoing transition of the current state matches the request.
    pub fn invalid_transition_lifecycle(from_state: u8, via_transition: u8) -> Self {
        CoreError::warn()
            .domain(Domain::Lifecycle)
            .kind(ErrorKind::InvalidArgument)
            .msg("invalid lifecycle transition")
            .payload(Payload::LifecycleTransition {
                from_state,
                via_transition,
            })
            .build()
    }

    /// Composite of a primary failure and a secondary failure hit while
    /// unwinding it. Kind, domain and severity stay those of the primary.
    pub fn merge_unwind(primary: CoreError, secondary: CoreError) -> Self {
        let message = format!(
            "{}, while unwinding: {}",
            primary.message, secondary.message
        );
        CoreError {
            domain: primary.domain,
            kind: primary.kind,
            severity: primary.severity.max(secondary.severity),
            message: Cow::Owned(message),
            payload: Payload::Unwind(Box::new(secondary)),
        }
    }

    /// The secondary error attached by [`CoreError::merge_unwind`], if any.
    pub fn unwind_error(&self) -> Option<&CoreError> {
        match &self.payload {
            Payload::Unwind(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Builder started by the severity constructors on [`CoreError`]; domain,
/// kind, message and payload default to `Other`, `Unspecified`, empty and
/// `None`.
#[derive(Debug, Clone)]
pub struct ErrB {
    domain: Domain,
    kind: ErrorKind,
    severity: Severity,
    message: Cow<'static, str>,
    payload: Payload,
}

impl ErrB {
    #[inline]
    fn new(severity: Severity) -> Self {
        Self {
            domain: Domain::Other,
            kind: ErrorKind::Unspecified,
            severity,
            message: Cow::Borrowed(""),
            payload: Payload::None,
        }
    }

    #[inline]
    pub fn domain(mut self, d: Domain) -> Self {
        self.domain = d;
        self
    }

    #[inline]
    pub fn kind(mut self, k: ErrorKind) -> Self {
        self.kind = k;
        self
    }

    #[inline]
    pub fn msg(mut self, m: impl Into<Cow<'static, str>>) -> Self {
        self.message = m.into();
        self
    }

    #[inline]
    pub fn msgf(mut self, args: fmt::Arguments<'_>) -> Self {
        self.message = Cow::Owned(args.to_string());
        self
    }

    /// Replaces any earlier payload.
    #[inline]
    pub fn payload(mut self, p: Payload) -> Self {
        self.payload = p;
        self
    }

    #[inline]
    pub fn build(self) -> CoreError {
        CoreError {
            domain: self.domain,
            kind: self.kind,
            severity: self.severity,
            message: self.message,
            payload: self.payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_unspecified() {
        let e = CoreError::warn().msg("boom").build();
        assert_eq!(e.kind, ErrorKind::Unspecified);
        assert_eq!(e.domain, Domain::Other);
        assert_eq!(e.payload, Payload::None);
        assert_eq!(e.to_string(), "Warn: boom");
    }

    #[test]
    fn merge_unwind_keeps_both_messages() {
        let primary = CoreError::state_not_registered(7);
        let secondary = CoreError::warn()
            .domain(Domain::Communication)
            .kind(ErrorKind::Transport)
            .msg("publisher already gone")
            .build();

        let merged = CoreError::merge_unwind(primary.clone(), secondary.clone());

        assert_eq!(merged.kind, ErrorKind::StateNotRegistered);
        assert_eq!(merged.domain, Domain::Registry);
        assert!(merged.message.contains("state 7 is not registered"));
        assert!(merged.message.contains("publisher already gone"));
        assert_eq!(merged.unwind_error(), Some(&secondary));
        assert_eq!(primary.unwind_error(), None);
    }

    #[test]
    fn failed_reservation_is_a_fatal_bad_alloc() {
        let reserve_err = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();

        let e = CoreError::bad_alloc("transition map states", reserve_err);

        assert_eq!(e.kind, ErrorKind::BadAlloc);
        assert_eq!(e.severity, Severity::Fatal);
        assert_eq!(e.domain, Domain::Registry);
        assert!(e.message.contains("transition map states"));
        assert!(matches!(e.payload, Payload::Context { key: "alloc", .. }));
    }

    #[test]
    fn registry_constructors_carry_state_id() {
        let e = CoreError::state_already_registered(3);
        assert_eq!(e.kind, ErrorKind::StateAlreadyRegistered);
        assert_eq!(e.payload, Payload::StateId(3));
    }
}
