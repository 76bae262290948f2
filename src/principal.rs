use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The acting user of a call, as seen by the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Acting user identifier
    pub user_id: String,
    /// Role identifiers held by the user
    pub roles: Vec<String>,
    /// Tenant the user acts for, if any
    pub tenant_id: Option<String>,
}

impl Principal {
    /// Creates a principal without roles or tenant.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            roles: Vec::new(),
            tenant_id: None,
        }
    }

    /// Adds roles to the principal.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Sets the tenant.
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}

/// Read-only access to the acting principal and the current time.
///
/// Audit stamps are pulled from here. Implementations are never mutated by
/// the interceptor.
pub trait PrincipalSource: Send + Sync {
    /// Returns the acting principal, if the call is authenticated.
    fn principal(&self) -> Option<Principal>;

    /// Returns the timestamp to stamp audit records with.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A principal source that always yields the same principal and the wall clock.
#[derive(Debug, Clone, Default)]
pub struct StaticPrincipalSource {
    principal: Option<Principal>,
}

impl StaticPrincipalSource {
    /// Creates a source for `principal`.
    pub fn new(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    /// Creates a source for unauthenticated calls.
    pub fn anonymous() -> Self {
        Self { principal: None }
    }
}

impl PrincipalSource for StaticPrincipalSource {
    fn principal(&self) -> Option<Principal> {
        self.principal.clone()
    }
}

/// A principal source with a frozen clock. Used where timestamps must be
/// reproducible.
#[derive(Debug, Clone)]
pub struct FixedPrincipalSource {
    principal: Option<Principal>,
    at: DateTime<Utc>,
}

impl FixedPrincipalSource {
    /// Creates a source yielding `principal` at time `at`.
    pub fn new(principal: Option<Principal>, at: DateTime<Utc>) -> Self {
        Self { principal, at }
    }
}

impl PrincipalSource for FixedPrincipalSource {
    fn principal(&self) -> Option<Principal> {
        self.principal.clone()
    }

    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn principal_builder() {
        let principal = Principal::new("alice")
            .with_roles(["admin", "auditor"])
            .with_tenant("acme");

        assert_eq!(principal.user_id, "alice");
        assert_eq!(principal.roles, vec!["admin", "auditor"]);
        assert_eq!(principal.tenant_id.as_deref(), Some("acme"));
    }

    #[test]
    fn static_source_yields_principal() {
        let source = StaticPrincipalSource::new(Principal::new("bob"));
        assert_eq!(source.principal().unwrap().user_id, "bob");
        assert!(StaticPrincipalSource::anonymous().principal().is_none());
    }

    #[test]
    fn fixed_source_freezes_time() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let source = FixedPrincipalSource::new(None, at);
        assert_eq!(source.now(), at);
        assert_eq!(source.now(), at);
    }
}
