//! Directive-driven audit rendering and emission.

use std::fmt;
use std::sync::Arc;

use super::{AuditOutcome, AuditRecord, AuditTrail};
use crate::directive::{ArgumentStrategy, AuditDirective};
use crate::invocation::CallInvocation;
use crate::principal::PrincipalSource;
use crate::render::{ArgumentRenderer, NULL_VALUE};

/// Argument section of an audit record whose strategy renders nothing.
pub const NO_ARGUMENTS_RECORDED: &str = "no arguments recorded";

/// Target of the structured audit events.
pub const AUDIT_TARGET: &str = "audit_trail";

/// Builds audit records from an [`AuditDirective`] and emits them.
///
/// Argument rendering follows the directive strategy; stamps are pulled from
/// the [`PrincipalSource`]. Completed records go to the `audit_trail` tracing
/// target and, when attached, to an [`AuditTrail`].
#[derive(Clone)]
pub struct AuditSelector {
    renderer: ArgumentRenderer,
    principals: Arc<dyn PrincipalSource>,
    trail: Option<Arc<AuditTrail>>,
}

impl AuditSelector {
    /// Creates a selector.
    pub fn new(renderer: ArgumentRenderer, principals: Arc<dyn PrincipalSource>) -> Self {
        Self {
            renderer,
            principals,
            trail: None,
        }
    }

    /// Also records completed records into `trail`.
    pub fn with_trail(mut self, trail: Arc<AuditTrail>) -> Self {
        self.trail = Some(trail);
        self
    }

    /// Renders the argument section for `directive`.
    ///
    /// `Custom` with no declared paths behaves like `None`, and so does a
    /// `Custom` render in which no path resolved on any argument.
    pub fn render_arguments(&self, directive: &AuditDirective, invocation: &CallInvocation) -> String {
        let rendered = match directive.strategy() {
            ArgumentStrategy::None => return NO_ARGUMENTS_RECORDED.to_string(),
            ArgumentStrategy::Custom if directive.field_paths().is_empty() => {
                return NO_ARGUMENTS_RECORDED.to_string()
            }
            ArgumentStrategy::All => self.renderer.render_all(invocation.arguments()),
            ArgumentStrategy::Custom => self
                .renderer
                .render_filtered(invocation.arguments(), directive.field_paths()),
        };

        if rendered.is_empty() {
            NO_ARGUMENTS_RECORDED.to_string()
        } else {
            rendered
        }
    }

    /// Builds the record for a call about to run.
    pub fn select(&self, directive: &AuditDirective, invocation: &CallInvocation) -> AuditRecord {
        let mut record = AuditRecord::new(
            invocation.trace_name(),
            self.render_arguments(directive, invocation),
        );

        if directive.includes_username() || directive.includes_roles() {
            let principal = self.principals.principal();
            if directive.includes_username() {
                record = record.with_username(
                    principal
                        .as_ref()
                        .map_or(NULL_VALUE, |p| p.user_id.as_str()),
                );
            }
            if directive.includes_roles() {
                record = record.with_roles(
                    principal
                        .as_ref()
                        .map_or_else(|| NULL_VALUE.to_string(), |p| p.roles.join(", ")),
                );
            }
        }
        if directive.includes_timestamp() {
            record = record.with_timestamp(self.principals.now());
        }
        record
    }

    /// Emits a completed record.
    pub fn emit(&self, record: &AuditRecord) {
        tracing::info!(
            target: AUDIT_TARGET,
            call = %record.call(),
            arguments = %record.arguments(),
            username = ?record.username(),
            roles = ?record.roles(),
            timestamp = ?record.timestamp_text(),
            outcome = ?record.outcome().map(|o| o.to_string()),
            "audit record"
        );
        if let Some(trail) = &self.trail {
            trail.record(record.clone());
        }
    }

    /// Runs `call`, then emits its audit record with the outcome.
    ///
    /// The record is built before the call runs, so the stamps describe the
    /// moment of entry. A call that unwinds is recorded as a failure.
    pub fn audit<R, E, F>(
        &self,
        directive: &AuditDirective,
        invocation: &CallInvocation,
        call: F,
    ) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
    {
        let mut pending = PendingRecord {
            selector: self,
            record: Some(self.select(directive, invocation)),
        };
        let outcome = call();
        let status = if outcome.is_ok() {
            AuditOutcome::Success
        } else {
            AuditOutcome::Failure
        };
        pending.complete(status);
        outcome
    }
}

/// Emits its record as a failure if dropped before completion.
struct PendingRecord<'a> {
    selector: &'a AuditSelector,
    record: Option<AuditRecord>,
}

impl PendingRecord<'_> {
    fn complete(&mut self, outcome: AuditOutcome) {
        if let Some(record) = self.record.take() {
            self.selector.emit(&record.completed(outcome));
        }
    }
}

impl Drop for PendingRecord<'_> {
    fn drop(&mut self) {
        self.complete(AuditOutcome::Failure);
    }
}

impl fmt::Debug for AuditSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditSelector")
            .field("trail", &self.trail.is_some())
            .finish_non_exhaustive()
    }
}
