use rcl_lifecycle::error::{CoreError, Severity};
use tracing::{debug, error, info, trace, warn};

/// Report an engine error that a service handler absorbs into its response.
pub fn log_core_error(err: &CoreError) {
    let (domain, kind) = (err.domain, err.kind);
    match err.severity {
        Severity::Trace => trace!(?domain, ?kind, "{}", err.message),
        Severity::Debug => debug!(?domain, ?kind, "{}", err.message),
        Severity::Info => info!(?domain, ?kind, "{}", err.message),
        Severity::Warn => warn!(?domain, ?kind, "{}", err.message),
        Severity::Error | Severity::Fatal => error!(?domain, ?kind, "{}", err.message),
    }
}
