use tracing::Level;

use crate::level::SeverityLevel;
use crate::sink::EmissionSink;

/// Target used for every trace line emitted by [`TracingSink`].
pub const TRACE_TARGET: &str = "intercept_core::trace";

/// An [`EmissionSink`] that forwards trace lines to `tracing`.
///
/// Enablement follows the installed subscriber, so filtering is configured
/// where the subscriber is (for example through `RUST_LOG`). `NotSet` is
/// treated as `Debug`.
///
/// ```no_run
/// use intercept_core::{EmissionSink, SeverityLevel, TracingSink};
///
/// let sink = TracingSink;
/// if sink.is_enabled(SeverityLevel::Info) {
///     sink.emit(SeverityLevel::Info, "billing::Ledger.post: initialized");
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl From<SeverityLevel> for Level {
    fn from(level: SeverityLevel) -> Self {
        match level.emission_level() {
            SeverityLevel::Trace => Level::TRACE,
            SeverityLevel::Info => Level::INFO,
            SeverityLevel::Warn => Level::WARN,
            SeverityLevel::Error => Level::ERROR,
            SeverityLevel::Debug | SeverityLevel::NotSet => Level::DEBUG,
        }
    }
}

impl EmissionSink for TracingSink {
    fn is_enabled(&self, level: SeverityLevel) -> bool {
        // Callsite metadata is static, so each level needs its own macro site.
        match level.emission_level() {
            SeverityLevel::Trace => tracing::enabled!(target: TRACE_TARGET, Level::TRACE),
            SeverityLevel::Info => tracing::enabled!(target: TRACE_TARGET, Level::INFO),
            SeverityLevel::Warn => tracing::enabled!(target: TRACE_TARGET, Level::WARN),
            SeverityLevel::Error => tracing::enabled!(target: TRACE_TARGET, Level::ERROR),
            SeverityLevel::Debug | SeverityLevel::NotSet => {
                tracing::enabled!(target: TRACE_TARGET, Level::DEBUG)
            }
        }
    }

    fn emit(&self, level: SeverityLevel, text: &str) {
        match level.emission_level() {
            SeverityLevel::Trace => tracing::trace!(target: TRACE_TARGET, "{}", text),
            SeverityLevel::Info => tracing::info!(target: TRACE_TARGET, "{}", text),
            SeverityLevel::Warn => tracing::warn!(target: TRACE_TARGET, "{}", text),
            SeverityLevel::Error => tracing::error!(target: TRACE_TARGET, "{}", text),
            SeverityLevel::Debug | SeverityLevel::NotSet => {
                tracing::debug!(target: TRACE_TARGET, "{}", text)
            }
        }
    }
}
