use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::directive::{AuditDirective, LogDirective};
use crate::error::ConfigError;
use crate::trace_name::CallSite;

/// Everything declared for one call site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallSiteDirectives {
    /// Trace logging declaration, if the site is logged
    pub log: Option<LogDirective>,
    /// Audit declaration, if the site is audited
    pub audit: Option<AuditDirective>,
}

/// Table of call-site declarations, built once at startup.
///
/// Sites are keyed by their trace name. A site with no entry is neither
/// logged nor audited; its failures are still translated.
///
/// # Examples
///
/// ```
/// use intercept_core::{AuditDirective, CallSite, DirectiveRegistry, LogDirective};
///
/// let open = CallSite::new("svc::Accounts", "open");
///
/// let registry = DirectiveRegistry::new()
///     .register_log(open, LogDirective::new().fields(["id"]))
///     .register_audit(open, AuditDirective::new());
///
/// assert!(registry.log_directive(&open).is_some());
/// assert!(registry.audit_directive(&open).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectiveRegistry {
    sites: HashMap<String, CallSiteDirectives>,
}

impl DirectiveRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            sites: HashMap::new(),
        }
    }

    /// Parses a registry from a JSON object keyed by trace name.
    ///
    /// ```
    /// use intercept_core::{CallSite, DirectiveRegistry};
    ///
    /// let registry = DirectiveRegistry::from_json(
    ///     r#"{ "svc::Accounts.open": { "log": { "level": "info" } } }"#,
    /// ).unwrap();
    ///
    /// assert!(registry.log_directive(&CallSite::new("svc::Accounts", "open")).is_some());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not a valid table.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let sites: HashMap<String, CallSiteDirectives> = serde_json::from_str(json)?;
        Ok(Self { sites })
    }

    /// Declares trace logging for `site`, replacing any earlier declaration.
    pub fn register_log(mut self, site: CallSite, directive: LogDirective) -> Self {
        self.sites.entry(site.trace_name()).or_default().log = Some(directive);
        self
    }

    /// Declares auditing for `site`, replacing any earlier declaration.
    pub fn register_audit(mut self, site: CallSite, directive: AuditDirective) -> Self {
        self.sites.entry(site.trace_name()).or_default().audit = Some(directive);
        self
    }

    /// Returns everything declared for `site`.
    pub fn directives(&self, site: &CallSite) -> Option<&CallSiteDirectives> {
        self.sites.get(&site.trace_name())
    }

    /// Returns the logging declaration for `site`.
    pub fn log_directive(&self, site: &CallSite) -> Option<&LogDirective> {
        self.directives(site).and_then(|d| d.log.as_ref())
    }

    /// Returns the audit declaration for `site`.
    pub fn audit_directive(&self, site: &CallSite) -> Option<&AuditDirective> {
        self.directives(site).and_then(|d| d.audit.as_ref())
    }

    /// Returns the number of declared sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Returns true if no site is declared.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
