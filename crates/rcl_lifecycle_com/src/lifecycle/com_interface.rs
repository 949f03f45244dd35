use rcl_lifecycle::error::{CoreError, Domain, ErrorKind, Payload, Result};
use rcl_lifecycle::lifecycle::{ComInterface, ComMode, State};
use tokio::sync::broadcast;
use tracing::debug;

use super::TransitionEvent;

/// Buffered transition events per receiver before it starts lagging.
pub const TRANSITION_EVENT_CAPACITY: usize = 32;

const TOPIC_TRANSITION_EVENT: &str = "transition_event";
const SERVICE_CHANGE_STATE: &str = "change_state";
const SERVICE_GET_STATE: &str = "get_state";
const SERVICE_GET_AVAILABLE_STATES: &str = "get_available_states";
const SERVICE_GET_AVAILABLE_TRANSITIONS: &str = "get_available_transitions";
const SERVICE_GET_TRANSITION_GRAPH: &str = "get_transition_graph";

/// Fully qualified names of the lifecycle services of one node.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ServiceNames {
    pub change_state: String,
    pub get_state: String,
    pub get_available_states: String,
    pub get_available_transitions: String,
    pub get_transition_graph: String,
}

impl ServiceNames {
    fn for_node(node_name: &str) -> Self {
        Self {
            change_state: format!("{node_name}/{SERVICE_CHANGE_STATE}"),
            get_state: format!("{node_name}/{SERVICE_GET_STATE}"),
            get_available_states: format!("{node_name}/{SERVICE_GET_AVAILABLE_STATES}"),
            get_available_transitions: format!("{node_name}/{SERVICE_GET_AVAILABLE_TRANSITIONS}"),
            get_transition_graph: format!("{node_name}/{SERVICE_GET_TRANSITION_GRAPH}"),
        }
    }
}

/// In-process communication boundary of one lifecycle node.
///
/// Transition events go out on a tokio broadcast channel:
/// - a transition never blocks on a slow consumer
/// - lagging receivers drop old events rather than stalling the node
///
/// The services themselves are answered by [`LifecycleService`](super::LifecycleService);
/// this type only records whether they were brought up and under which names.
#[derive(Debug)]
pub struct LifecycleComInterface {
    node_name: String,
    publisher: Option<broadcast::Sender<TransitionEvent>>,
    services: Option<ServiceNames>,
}

impl LifecycleComInterface {
    /// A boundary for `node_name`. Nothing exists until `init`.
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            publisher: None,
            services: None,
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    /// Topic transition events are published on.
    pub fn transition_event_topic(&self) -> String {
        format!("{}/{TOPIC_TRANSITION_EVENT}", self.node_name)
    }

    /// Service names, `None` unless initialized in [`ComMode::Full`].
    pub fn service_names(&self) -> Option<&ServiceNames> {
        self.services.as_ref()
    }

    /// Receive transition events published from now on.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<TransitionEvent>> {
        self.publisher
            .as_ref()
            .map(broadcast::Sender::subscribe)
            .ok_or_else(|| not_initialized("subscribe"))
    }
}

impl ComInterface for LifecycleComInterface {
    fn init(&mut self, mode: ComMode) -> Result<()> {
        if self.node_name.is_empty() {
            return Err(CoreError::error()
                .domain(Domain::Communication)
                .kind(ErrorKind::InvalidArgument)
                .msg("node name must not be empty")
                .build());
        }
        if self.publisher.is_some() {
            return Err(CoreError::error()
                .domain(Domain::Communication)
                .kind(ErrorKind::InvalidState)
                .msg("com interface is already initialized")
                .payload(Payload::Context {
                    key: "node",
                    value: self.node_name.clone().into(),
                })
                .build());
        }

        let (publisher, _rx) = broadcast::channel(TRANSITION_EVENT_CAPACITY);
        self.publisher = Some(publisher);
        if mode == ComMode::Full {
            self.services = Some(ServiceNames::for_node(&self.node_name));
        }

        debug!(
            node = %self.node_name,
            services = self.services.is_some(),
            "lifecycle com interface up"
        );
        Ok(())
    }

    fn has_services(&self) -> bool {
        self.services.is_some()
    }

    fn publish_notification(&mut self, start: &State, goal: &State) -> Result<()> {
        let publisher = self
            .publisher
            .as_ref()
            .ok_or_else(|| not_initialized("publish transition event"))?;

        // No receivers is not a failure: nobody is listening yet.
        if publisher.send(TransitionEvent::new(start, goal)).is_err() {
            debug!(
                topic = %self.transition_event_topic(),
                "transition event dropped: no subscribers"
            );
        }
        Ok(())
    }

    fn fini(&mut self) -> Result<()> {
        self.services = None;
        self.publisher = None;
        Ok(())
    }
}

fn not_initialized(action: &'static str) -> CoreError {
    CoreError::warn()
        .domain(Domain::Communication)
        .kind(ErrorKind::InvalidState)
        .msgf(format_args!("cannot {action}: com interface is not initialized"))
        .build()
}
