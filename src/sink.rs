use parking_lot::Mutex;

use crate::level::SeverityLevel;

/// Destination for rendered trace lines.
///
/// The engine asks [`is_enabled`](EmissionSink::is_enabled) before doing any
/// rendering work, and calls [`emit`](EmissionSink::emit) once per line.
/// Sinks are shared across threads, so both methods take `&self`.
pub trait EmissionSink: Send + Sync {
    /// Returns whether lines at `level` would be recorded.
    fn is_enabled(&self, level: SeverityLevel) -> bool;

    /// Records one line of trace text.
    fn emit(&self, level: SeverityLevel, text: &str);
}

/// A line captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedLine {
    /// Level the line was emitted at
    pub level: SeverityLevel,
    /// Rendered text
    pub text: String,
}

/// A sink that collects trace lines in memory.
///
/// Lines below the configured minimum level are reported as disabled and are
/// never recorded.
///
/// # Examples
///
/// ```
/// use intercept_core::{EmissionSink, MemorySink, SeverityLevel};
///
/// let sink = MemorySink::with_min_level(SeverityLevel::Info);
/// assert!(!sink.is_enabled(SeverityLevel::Debug));
///
/// sink.emit(SeverityLevel::Warn, "svc.op: initialized");
/// assert_eq!(sink.texts(), vec!["svc.op: initialized"]);
/// ```
#[derive(Debug)]
pub struct MemorySink {
    min_level: SeverityLevel,
    lines: Mutex<Vec<EmittedLine>>,
}

impl MemorySink {
    /// Creates a sink with every level enabled.
    pub fn new() -> Self {
        Self::with_min_level(SeverityLevel::Trace)
    }

    /// Creates a sink that records `min_level` and above.
    pub fn with_min_level(min_level: SeverityLevel) -> Self {
        Self {
            min_level,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of recorded lines.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Provides borrowed access to the recorded lines.
    pub fn with_lines<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[EmittedLine]) -> R,
    {
        f(&self.lines.lock())
    }

    /// Returns a snapshot of the recorded lines.
    pub fn lines(&self) -> Vec<EmittedLine> {
        self.lines.lock().clone()
    }

    /// Returns a snapshot of the recorded texts only.
    pub fn texts(&self) -> Vec<String> {
        self.with_lines(|lines| lines.iter().map(|l| l.text.clone()).collect())
    }

    /// Removes every recorded line.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    /// Consumes the sink and returns the recorded lines.
    pub fn into_vec(self) -> Vec<EmittedLine> {
        self.lines.into_inner()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl EmissionSink for MemorySink {
    fn is_enabled(&self, level: SeverityLevel) -> bool {
        level != SeverityLevel::NotSet && level >= self.min_level
    }

    fn emit(&self, level: SeverityLevel, text: &str) {
        if !self.is_enabled(level) {
            return;
        }
        self.lines.lock().push(EmittedLine {
            level,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_starts_empty() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        for i in 0..3 {
            sink.emit(SeverityLevel::Debug, &format!("line-{}", i));
        }

        assert_eq!(sink.texts(), vec!["line-0", "line-1", "line-2"]);
        assert_eq!(sink.lines()[0].level, SeverityLevel::Debug);
    }

    #[test]
    fn memory_sink_filters_by_min_level() {
        let sink = MemorySink::with_min_level(SeverityLevel::Warn);

        assert!(!sink.is_enabled(SeverityLevel::Info));
        assert!(sink.is_enabled(SeverityLevel::Warn));
        assert!(sink.is_enabled(SeverityLevel::Error));

        sink.emit(SeverityLevel::Info, "dropped");
        sink.emit(SeverityLevel::Error, "kept");
        assert_eq!(sink.texts(), vec!["kept"]);
    }

    #[test]
    fn not_set_is_never_enabled() {
        let sink = MemorySink::new();
        assert!(!sink.is_enabled(SeverityLevel::NotSet));
    }

    #[test]
    fn memory_sink_can_be_cleared_and_consumed() {
        let sink = MemorySink::default();
        sink.emit(SeverityLevel::Trace, "a");
        sink.clear();
        assert!(sink.is_empty());

        sink.emit(SeverityLevel::Trace, "b");
        let lines = sink.into_vec();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "b");
    }
}
