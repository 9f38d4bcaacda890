//! Logging infrastructure for kvbatch.
//!
//! Events go through `tracing` with target "kvbatch" and always carry an
//! `event` field. The crate never installs a subscriber; applications
//! configure one themselves.
//!
//! Per-record anomalies are *not* logged as warnings here. They are returned
//! to the caller as [`Diagnostics`](crate::Diagnostics) so that concurrent
//! batch reads never see each other's reports.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: subsystem (`schema`, `projector`, `view`, `encode`)
//! - Use `%` for Display, `?` for Debug formatting

/// Target for all kvbatch log events.
pub(crate) const KVBATCH_TARGET: &str = "kvbatch";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "projector",
///     event = "batch_projected",
///     rows = n,
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::KVBATCH_TARGET, $($field)*)
    };
}

/// Macro for trace-level log events.
macro_rules! log_trace {
    ($($field:tt)*) => {
        ::tracing::trace!(target: $crate::observability::KVBATCH_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::KVBATCH_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_trace;
pub(crate) use log_warn;
