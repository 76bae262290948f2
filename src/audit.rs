//! Audit trail support.
//!
//! This module provides:
//! - `AuditRecord`: one entry per audited call (arguments, stamps, outcome)
//! - `AuditSelector`: renders records from an `AuditDirective` and emits them
//! - `AuditTrail`: in-memory recorder for inspection
//!
//! Records are emitted as structured events on the `audit_trail` tracing
//! target. Field paths that do not exist on an argument are skipped; a
//! mismatched directive never aborts the record.

mod record;
mod selector;
mod trail;

pub use record::{AuditOutcome, AuditRecord};
pub use selector::{AuditSelector, AUDIT_TARGET, NO_ARGUMENTS_RECORDED};
pub use trail::AuditTrail;
