//! Audit record schema.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

/// How an audited call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The call returned normally
    Success,
    /// The call returned a failure
    Failure,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Success => write!(f, "success"),
            AuditOutcome::Failure => write!(f, "failure"),
        }
    }
}

/// One audit trail entry for a call.
///
/// The argument section and the stamps are fixed when the record is built at
/// call entry; the outcome is added once the call completes. Each stamp is
/// `None` when its directive toggle is off.
///
/// # Example
///
/// ```
/// use intercept_core::audit::{AuditOutcome, AuditRecord};
///
/// let record = AuditRecord::new("svc::Accounts.open", "u64=[7]")
///     .with_username("alice")
///     .completed(AuditOutcome::Success);
///
/// assert_eq!(
///     record.to_string(),
///     "svc::Accounts.open: u64=[7] username=[alice] outcome=[success]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    call: String,
    arguments: String,
    username: Option<String>,
    roles: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    outcome: Option<AuditOutcome>,
}

impl AuditRecord {
    /// Creates a record with a call name and rendered arguments.
    pub fn new(call: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            call: call.into(),
            arguments: arguments.into(),
            username: None,
            roles: None,
            timestamp: None,
            outcome: None,
        }
    }

    /// Sets the acting-user stamp.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the role stamp (already rendered).
    pub fn with_roles(mut self, roles: impl Into<String>) -> Self {
        self.roles = Some(roles.into());
        self
    }

    /// Sets the timestamp stamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Marks the record as completed with `outcome`.
    pub fn completed(mut self, outcome: AuditOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Returns the trace name of the audited call.
    pub fn call(&self) -> &str {
        &self.call
    }

    /// Returns the rendered argument section.
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Returns the acting-user stamp, if enabled.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the role stamp, if enabled.
    pub fn roles(&self) -> Option<&str> {
        self.roles.as_deref()
    }

    /// Returns the timestamp stamp, if enabled.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Returns the outcome once the call has completed.
    pub fn outcome(&self) -> Option<AuditOutcome> {
        self.outcome
    }

    pub(crate) fn timestamp_text(&self) -> Option<String> {
        self.timestamp
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.call, self.arguments)?;

        if let Some(username) = &self.username {
            write!(f, " username=[{}]", username)?;
        }
        if let Some(roles) = &self.roles {
            write!(f, " roles=[{}]", roles)?;
        }
        if let Some(ts) = self.timestamp_text() {
            write!(f, " timestamp=[{}]", ts)?;
        }
        if let Some(outcome) = self.outcome {
            write!(f, " outcome=[{}]", outcome)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn outcome_display() {
        assert_eq!(AuditOutcome::Success.to_string(), "success");
        assert_eq!(AuditOutcome::Failure.to_string(), "failure");
    }

    #[test]
    fn minimal_record_has_no_stamps() {
        let record = AuditRecord::new("svc.op", "no arguments recorded");

        assert_eq!(record.call(), "svc.op");
        assert!(record.username().is_none());
        assert!(record.roles().is_none());
        assert!(record.timestamp().is_none());
        assert!(record.outcome().is_none());
        assert_eq!(record.to_string(), "svc.op: no arguments recorded");
    }

    #[test]
    fn display_lists_enabled_stamps_in_order() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = AuditRecord::new("svc.op", "i32=[1]")
            .with_username("alice")
            .with_roles("admin, user")
            .with_timestamp(at)
            .completed(AuditOutcome::Failure);

        assert_eq!(
            record.to_string(),
            "svc.op: i32=[1] username=[alice] roles=[admin, user] \
             timestamp=[2024-05-01T12:00:00.000Z] outcome=[failure]"
        );
    }
}
