use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::level::SeverityLevel;

/// Environment variable holding the process default level.
pub const ENV_DEFAULT_LEVEL: &str = "INTERCEPT_DEFAULT_LEVEL";

/// Environment variable toggling panic translation.
pub const ENV_CAPTURE_PANICS: &str = "INTERCEPT_CAPTURE_PANICS";

/// Process-wide interceptor settings.
///
/// ```
/// use intercept_core::{InterceptConfig, SeverityLevel};
///
/// let config = InterceptConfig::from_json(r#"{ "default_level": "info" }"#).unwrap();
/// assert_eq!(config.default_level, SeverityLevel::Info);
/// assert!(config.capture_panics);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptConfig {
    /// Default level; call sites override it only with a more verbose level
    pub default_level: SeverityLevel,
    /// Whether panics of wrapped calls are translated into system exceptions
    pub capture_panics: bool,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            default_level: SeverityLevel::NotSet,
            capture_panics: true,
        }
    }
}

impl InterceptConfig {
    /// Parses a JSON document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents or unknown levels.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads `INTERCEPT_DEFAULT_LEVEL` and `INTERCEPT_CAPTURE_PANICS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevel`] if the level is not recognised.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup(ENV_DEFAULT_LEVEL) {
            config.default_level = level.parse()?;
        }
        if let Some(flag) = lookup(ENV_CAPTURE_PANICS) {
            config.capture_panics = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = InterceptConfig::default();
        assert_eq!(config.default_level, SeverityLevel::NotSet);
        assert!(config.capture_panics);
    }

    #[test]
    fn json_overrides_defaults() {
        let config =
            InterceptConfig::from_json(r#"{"default_level":"warn","capture_panics":false}"#)
                .unwrap();
        assert_eq!(config.default_level, SeverityLevel::Warn);
        assert!(!config.capture_panics);
    }

    #[test]
    fn json_levels_share_the_environment_grammar() {
        let upper = InterceptConfig::from_json(r#"{"default_level":"INFO"}"#).unwrap();
        assert_eq!(upper.default_level, SeverityLevel::Info);

        let rank = InterceptConfig::from_json(r#"{"default_level":4}"#).unwrap();
        assert_eq!(rank.default_level, SeverityLevel::Warn);
    }

    #[test]
    fn json_rejects_unknown_levels() {
        assert!(InterceptConfig::from_json(r#"{"default_level":"loud"}"#).is_err());
    }

    #[test]
    fn environment_is_read() {
        let config = InterceptConfig::from_lookup(lookup(&[
            (ENV_DEFAULT_LEVEL, "INFO"),
            (ENV_CAPTURE_PANICS, "off"),
        ]))
        .unwrap();
        assert_eq!(config.default_level, SeverityLevel::Info);
        assert!(!config.capture_panics);
    }

    #[test]
    fn missing_environment_keeps_defaults() {
        let config = InterceptConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, InterceptConfig::default());
    }

    #[test]
    fn invalid_environment_level_is_an_error() {
        let err = InterceptConfig::from_lookup(lookup(&[(ENV_DEFAULT_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel(_)));
    }
}
