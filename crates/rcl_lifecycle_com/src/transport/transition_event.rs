use rcl_lifecycle::error::{CoreError, Domain, ErrorKind, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

use crate::lifecycle::TransitionEvent;

/// Downstream publisher for transition events (e.g. a middleware topic).
///
/// Keeps this crate independent of any concrete message type.
pub trait TransitionEventSink {
    fn publish(&mut self, event: &TransitionEvent) -> Result<()>;
}

/// Drain `rx` into `sink` until the channel closes.
///
/// Returns how many events were forwarded. The channel closes when the
/// state machine's com interface is finalized. A lagging receiver skips the
/// events it missed; a sink failure stops forwarding.
pub async fn forward_transition_events<S>(
    mut rx: broadcast::Receiver<TransitionEvent>,
    sink: &mut S,
) -> Result<usize>
where
    S: TransitionEventSink + ?Sized,
{
    let mut forwarded = 0;

    loop {
        match rx.recv().await {
            Ok(event) => {
                sink.publish(&event).map_err(|e| {
                    CoreError::warn()
                        .domain(Domain::Communication)
                        .kind(ErrorKind::Transport)
                        .msgf(format_args!("transition event publish failed: {}", e.message))
                        .build()
                })?;
                forwarded += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "transition event receiver lagged");
            }
            Err(RecvError::Closed) => return Ok(forwarded),
        }
    }
}
