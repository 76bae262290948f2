//! Per-call-site declarations: which arguments to render and at what level.

use serde::{Deserialize, Deserializer, Serialize};

use crate::level::SeverityLevel;

/// Which call arguments end up in a trace or audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentStrategy {
    /// Render every argument's whole value
    #[default]
    All,
    /// Render nothing
    None,
    /// Render only the declared field paths
    Custom,
}

fn push_unique(fields: &mut Vec<String>, field: String) {
    if !fields.iter().any(|f| *f == field) {
        fields.push(field);
    }
}

/// Logging declaration for one call site.
///
/// Deserialized directives go through the same builder as code: declaring
/// `fields` without a `strategy` selects `Custom`, and duplicate paths are
/// dropped.
///
/// # Examples
///
/// ```
/// use intercept_core::{ArgumentStrategy, LogDirective, SeverityLevel};
///
/// let directive = LogDirective::new()
///     .fields(["id", "name"])
///     .level(SeverityLevel::Info);
///
/// assert_eq!(directive.strategy(), ArgumentStrategy::Custom);
/// assert_eq!(directive.field_paths(), ["id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogDirective {
    strategy: ArgumentStrategy,
    fields: Vec<String>,
    level: SeverityLevel,
}

impl LogDirective {
    /// All arguments, `Debug` level.
    pub fn new() -> Self {
        Self {
            strategy: ArgumentStrategy::All,
            fields: Vec::new(),
            level: SeverityLevel::Debug,
        }
    }

    /// Sets the argument strategy.
    pub fn strategy_of(mut self, strategy: ArgumentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Selects field paths and switches the strategy to `Custom`.
    ///
    /// Duplicate paths are dropped; the first occurrence keeps its position.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strategy = ArgumentStrategy::Custom;
        for field in fields {
            push_unique(&mut self.fields, field.into());
        }
        self
    }

    /// Sets the call-site level.
    pub fn level(mut self, level: SeverityLevel) -> Self {
        self.level = level;
        self
    }

    /// Returns the argument strategy.
    pub fn strategy(&self) -> ArgumentStrategy {
        self.strategy
    }

    /// Returns the declared field paths.
    pub fn field_paths(&self) -> &[String] {
        &self.fields
    }

    /// Returns the call-site level.
    pub fn site_level(&self) -> SeverityLevel {
        self.level
    }
}

impl Default for LogDirective {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LogDirectiveDecl {
    strategy: Option<ArgumentStrategy>,
    fields: Vec<String>,
    level: Option<SeverityLevel>,
}

impl<'de> Deserialize<'de> for LogDirective {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let decl = LogDirectiveDecl::deserialize(deserializer)?;
        let mut directive = LogDirective::new();
        if !decl.fields.is_empty() {
            directive = directive.fields(decl.fields);
        }
        if let Some(strategy) = decl.strategy {
            directive = directive.strategy_of(strategy);
        }
        if let Some(level) = decl.level {
            directive = directive.level(level);
        }
        Ok(directive)
    }
}

/// Audit declaration for one call site.
///
/// Field paths are unique and keep declaration order. Paths that do not exist
/// on an argument are accepted here and skipped when the record is rendered.
///
/// # Examples
///
/// ```
/// use intercept_core::{ArgumentStrategy, AuditDirective};
///
/// let directive = AuditDirective::new()
///     .fields(["id", "name", "id"])
///     .username(false)
///     .roles(false);
///
/// assert_eq!(directive.field_paths(), ["id", "name"]);
/// assert!(!directive.includes_username());
/// assert!(directive.includes_timestamp());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditDirective {
    strategy: ArgumentStrategy,
    fields: Vec<String>,
    username: bool,
    roles: bool,
    timestamp: bool,
}

impl AuditDirective {
    /// All arguments, every stamp enabled.
    pub fn new() -> Self {
        Self {
            strategy: ArgumentStrategy::All,
            fields: Vec::new(),
            username: true,
            roles: true,
            timestamp: true,
        }
    }

    /// Sets the argument strategy.
    pub fn strategy_of(mut self, strategy: ArgumentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Selects field paths and switches the strategy to `Custom`.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strategy = ArgumentStrategy::Custom;
        for field in fields {
            push_unique(&mut self.fields, field.into());
        }
        self
    }

    /// Toggles the acting-user stamp.
    pub fn username(mut self, enabled: bool) -> Self {
        self.username = enabled;
        self
    }

    /// Toggles the role stamp.
    pub fn roles(mut self, enabled: bool) -> Self {
        self.roles = enabled;
        self
    }

    /// Toggles the timestamp stamp.
    pub fn timestamp(mut self, enabled: bool) -> Self {
        self.timestamp = enabled;
        self
    }

    /// Returns the argument strategy.
    pub fn strategy(&self) -> ArgumentStrategy {
        self.strategy
    }

    /// Returns the declared field paths.
    pub fn field_paths(&self) -> &[String] {
        &self.fields
    }

    /// Returns whether the acting user is stamped.
    pub fn includes_username(&self) -> bool {
        self.username
    }

    /// Returns whether the role set is stamped.
    pub fn includes_roles(&self) -> bool {
        self.roles
    }

    /// Returns whether the timestamp is stamped.
    pub fn includes_timestamp(&self) -> bool {
        self.timestamp
    }
}

impl Default for AuditDirective {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AuditDirectiveDecl {
    #[serde(default)]
    strategy: Option<ArgumentStrategy>,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default = "enabled")]
    username: bool,
    #[serde(default = "enabled")]
    roles: bool,
    #[serde(default = "enabled")]
    timestamp: bool,
}

fn enabled() -> bool {
    true
}

impl<'de> Deserialize<'de> for AuditDirective {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let decl = AuditDirectiveDecl::deserialize(deserializer)?;
        let mut directive = AuditDirective::new()
            .username(decl.username)
            .roles(decl.roles)
            .timestamp(decl.timestamp);
        if !decl.fields.is_empty() {
            directive = directive.fields(decl.fields);
        }
        if let Some(strategy) = decl.strategy {
            directive = directive.strategy_of(strategy);
        }
        Ok(directive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_directive_defaults() {
        let directive = LogDirective::default();
        assert_eq!(directive.strategy(), ArgumentStrategy::All);
        assert!(directive.field_paths().is_empty());
        assert_eq!(directive.site_level(), SeverityLevel::Debug);
    }

    #[test]
    fn fields_switch_to_custom_and_deduplicate() {
        let directive = LogDirective::new().fields(["name", "id", "name"]);
        assert_eq!(directive.strategy(), ArgumentStrategy::Custom);
        assert_eq!(directive.field_paths(), ["name", "id"]);
    }

    #[test]
    fn strategy_can_be_set_explicitly() {
        let directive = LogDirective::new().strategy_of(ArgumentStrategy::None);
        assert_eq!(directive.strategy(), ArgumentStrategy::None);
    }

    #[test]
    fn audit_directive_defaults_enable_all_stamps() {
        let directive = AuditDirective::default();
        assert_eq!(directive.strategy(), ArgumentStrategy::All);
        assert!(directive.includes_username());
        assert!(directive.includes_roles());
        assert!(directive.includes_timestamp());
    }

    #[test]
    fn audit_directive_toggles_are_independent() {
        let directive = AuditDirective::new()
            .username(false)
            .roles(false)
            .timestamp(true);
        assert!(!directive.includes_username());
        assert!(!directive.includes_roles());
        assert!(directive.includes_timestamp());
    }

    #[test]
    fn directives_deserialize_with_defaults() {
        let directive: AuditDirective =
            serde_json::from_str(r#"{"strategy":"custom","fields":["id"],"roles":false}"#)
                .unwrap();
        assert_eq!(directive.strategy(), ArgumentStrategy::Custom);
        assert_eq!(directive.field_paths(), ["id"]);
        assert!(directive.includes_username());
        assert!(!directive.includes_roles());

        let log: LogDirective = serde_json::from_str(r#"{"level":"info"}"#).unwrap();
        assert_eq!(log.site_level(), SeverityLevel::Info);
        assert_eq!(log.strategy(), ArgumentStrategy::All);
    }

    #[test]
    fn deserialized_fields_are_deduplicated() {
        let audit: AuditDirective =
            serde_json::from_str(r#"{"strategy":"custom","fields":["id","name","id"]}"#).unwrap();
        assert_eq!(audit.field_paths(), ["id", "name"]);

        let log: LogDirective = serde_json::from_str(r#"{"fields":["id","id"]}"#).unwrap();
        assert_eq!(log.field_paths(), ["id"]);
    }

    #[test]
    fn deserialized_fields_imply_custom() {
        let log: LogDirective = serde_json::from_str(r#"{"fields":["id"]}"#).unwrap();
        assert_eq!(log, LogDirective::new().fields(["id"]));

        let audit: AuditDirective = serde_json::from_str(r#"{"fields":["id"]}"#).unwrap();
        assert_eq!(audit.strategy(), ArgumentStrategy::Custom);
    }

    #[test]
    fn explicit_strategy_wins_over_declared_fields() {
        let log: LogDirective =
            serde_json::from_str(r#"{"strategy":"none","fields":["id"]}"#).unwrap();
        assert_eq!(log.strategy(), ArgumentStrategy::None);
        assert_eq!(log.field_paths(), ["id"]);
    }

    #[test]
    fn unknown_directive_keys_are_rejected() {
        assert!(serde_json::from_str::<LogDirective>(r#"{"feilds":["id"]}"#).is_err());
    }
}
