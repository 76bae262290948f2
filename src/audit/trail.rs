//! In-memory audit trail recorder.

use parking_lot::Mutex;

use super::AuditRecord;

/// Thread-safe in-memory recorder for audit records.
///
/// Records are kept in the order they were completed. Production setups
/// usually rely on the `audit_trail` tracing target instead and attach a
/// trail only for inspection.
///
/// # Example
///
/// ```
/// use intercept_core::audit::{AuditOutcome, AuditRecord, AuditTrail};
///
/// let trail = AuditTrail::new();
/// trail.record(AuditRecord::new("svc.op", "i32=[1]").completed(AuditOutcome::Success));
///
/// assert_eq!(trail.len(), 1);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    records: Mutex<Vec<AuditRecord>>,
}

impl AuditTrail {
    /// Creates a new empty audit trail.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Appends a record.
    pub fn record(&self, record: AuditRecord) {
        self.records.lock().push(record);
    }

    /// Returns a snapshot of all records.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Clears all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditOutcome;

    #[test]
    fn audit_trail_starts_empty() {
        let trail = AuditTrail::new();
        assert!(trail.is_empty());
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn audit_trail_keeps_order() {
        let trail = AuditTrail::new();
        trail.record(AuditRecord::new("svc.first", "").completed(AuditOutcome::Success));
        trail.record(AuditRecord::new("svc.second", "").completed(AuditOutcome::Failure));

        let records = trail.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].call(), "svc.first");
        assert_eq!(records[1].outcome(), Some(AuditOutcome::Failure));
    }

    #[test]
    fn audit_trail_can_be_cleared() {
        let trail = AuditTrail::default();
        trail.record(AuditRecord::new("svc.op", ""));
        trail.clear();
        assert!(trail.is_empty());
    }

    #[test]
    fn audit_trail_is_shared_across_threads() {
        let trail = std::sync::Arc::new(AuditTrail::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let trail = trail.clone();
                std::thread::spawn(move || {
                    trail.record(AuditRecord::new(format!("svc.op{}", i), ""));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(trail.len(), 4);
    }
}
