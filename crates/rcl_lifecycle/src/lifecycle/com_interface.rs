use crate::error::Result;

use super::State;

/// What the communication boundary should bring up on `init`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ComMode {
    /// Transition-event publisher plus the five lifecycle services.
    Full,
    /// Transition-event publisher only.
    PublisherOnly,
}

/// The pub/sub + service surface a [`StateMachine`](super::StateMachine) announces through.
///
/// The engine never knows how notifications travel; it only asks the boundary
/// to come up, to announce `(start, goal)` after a trigger, and to go down.
/// Remote change-state requests arrive through whatever service layer the
/// implementation exposes and end up calling the machine's trigger operations.
pub trait ComInterface {
    /// Bring up the publisher and, in [`ComMode::Full`], the services.
    fn init(&mut self, mode: ComMode) -> Result<()>;

    /// True once the query/command services exist.
    fn has_services(&self) -> bool;

    /// Announce that the machine moved from `start` to `goal`.
    fn publish_notification(&mut self, start: &State, goal: &State) -> Result<()>;

    /// Tear down whatever `init` created. Must be safe on a never-initialized value.
    fn fini(&mut self) -> Result<()>;
}

/// Boundary that announces nothing. For hosts that only want local state.
#[derive(Debug, Default)]
pub struct NoopComInterface {
    services: bool,
}

impl ComInterface for NoopComInterface {
    fn init(&mut self, mode: ComMode) -> Result<()> {
        self.services = mode == ComMode::Full;
        Ok(())
    }

    fn has_services(&self) -> bool {
        self.services
    }

    fn publish_notification(&mut self, _start: &State, _goal: &State) -> Result<()> {
        Ok(())
    }

    fn fini(&mut self) -> Result<()> {
        self.services = false;
        Ok(())
    }
}
