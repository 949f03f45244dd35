use crate::error::{CoreError, Domain, ErrorKind, Result};

use super::State;

/// A labeled, directed edge between two lifecycle states.
///
/// Endpoints are stored as state ids rather than references, so a transition
/// stays valid however the owning [`TransitionMap`](super::TransitionMap) grows.
/// A zero-initialized (`Default`) transition has no endpoints and cannot be
/// triggered.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Transition {
    id: u8,
    label: String,
    start: Option<u8>,
    goal: Option<u8>,
}

impl Transition {
    /// Build a transition between two states.
    ///
    /// The endpoints only need to exist as values here; registering the
    /// transition in a map is what checks that both are registered there.
    pub fn new(id: u8, label: impl Into<String>, start: &State, goal: &State) -> Result<Self> {
        Self::from_ids(id, label, start.id(), goal.id())
    }

    /// Build a transition between two states known only by id.
    pub fn from_ids(id: u8, label: impl Into<String>, start: u8, goal: u8) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(CoreError::error()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::InvalidArgument)
                .msgf(format_args!("transition {id} label must not be empty"))
                .build());
        }

        Ok(Self {
            id,
            label,
            start: Some(start),
            goal: Some(goal),
        })
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Id of the state this transition leaves, `None` on a zero value.
    pub fn start(&self) -> Option<u8> {
        self.start
    }

    /// Id of the state this transition enters, `None` on a zero value.
    pub fn goal(&self) -> Option<u8> {
        self.goal
    }

    /// Reset to the zero value. Idempotent.
    pub fn fini(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_endpoint_ids() {
        let a = State::new(1, "a").unwrap();
        let b = State::new(2, "b").unwrap();

        let t = Transition::new(7, "go", &a, &b).unwrap();
        assert_eq!(t.id(), 7);
        assert_eq!(t.label(), "go");
        assert_eq!(t.start(), Some(1));
        assert_eq!(t.goal(), Some(2));
    }

    #[test]
    fn empty_label_is_rejected() {
        let a = State::new(1, "a").unwrap();
        let err = Transition::new(7, "", &a, &a).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn fini_is_idempotent() {
        let a = State::new(1, "a").unwrap();
        let mut t = Transition::new(7, "loop", &a, &a).unwrap();

        t.fini();
        assert_eq!(t, Transition::default());
        assert_eq!(t.goal(), None);

        t.fini();
        assert_eq!(t, Transition::default());
    }
}
