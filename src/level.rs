//! Severity levels and the effective-level policy.
//!
//! A call site may declare its own level. The process-wide default is set at
//! configuration time. Exactly one of them governs each call: the call-site
//! level wins only when it is strictly more verbose than the default.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Severity of an emitted trace line.
///
/// Ordered from most to least verbose. `NotSet` is a sentinel ranked below
/// every real level and is never emitted at directly.
///
/// Configuration accepts the same forms as [`FromStr`]: a case-insensitive
/// name or a rank, the latter as a string or a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    /// No level configured
    #[default]
    NotSet,
    /// Finest-grained tracing
    Trace,
    /// Diagnostic detail
    Debug,
    /// Normal operation
    Info,
    /// Suspicious but recoverable
    Warn,
    /// Failures
    Error,
}

impl SeverityLevel {
    /// Returns the numeric rank of this level (`NotSet` = 0, `Error` = 5).
    pub fn rank(self) -> u8 {
        match self {
            SeverityLevel::NotSet => 0,
            SeverityLevel::Trace => 1,
            SeverityLevel::Debug => 2,
            SeverityLevel::Info => 3,
            SeverityLevel::Warn => 4,
            SeverityLevel::Error => 5,
        }
    }

    /// Maps a rank back to a level. Unknown ranks yield `None`.
    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(SeverityLevel::NotSet),
            1 => Some(SeverityLevel::Trace),
            2 => Some(SeverityLevel::Debug),
            3 => Some(SeverityLevel::Info),
            4 => Some(SeverityLevel::Warn),
            5 => Some(SeverityLevel::Error),
            _ => None,
        }
    }

    /// The level actually used for emission. `NotSet` emits at `Debug`.
    pub fn emission_level(self) -> Self {
        match self {
            SeverityLevel::NotSet => SeverityLevel::Debug,
            other => other,
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityLevel::NotSet => write!(f, "NOT_SET"),
            SeverityLevel::Trace => write!(f, "TRACE"),
            SeverityLevel::Debug => write!(f, "DEBUG"),
            SeverityLevel::Info => write!(f, "INFO"),
            SeverityLevel::Warn => write!(f, "WARN"),
            SeverityLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for SeverityLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(rank) = trimmed.parse::<u8>() {
            return SeverityLevel::from_rank(rank)
                .ok_or_else(|| ConfigError::InvalidLevel(trimmed.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "not_set" | "notset" | "none" => Ok(SeverityLevel::NotSet),
            "trace" => Ok(SeverityLevel::Trace),
            "debug" => Ok(SeverityLevel::Debug),
            "info" => Ok(SeverityLevel::Info),
            "warn" | "warning" => Ok(SeverityLevel::Warn),
            "error" => Ok(SeverityLevel::Error),
            _ => Err(ConfigError::InvalidLevel(trimmed.to_string())),
        }
    }
}

struct LevelVisitor;

impl Visitor<'_> for LevelVisitor {
    type Value = SeverityLevel;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a level name or a rank between 0 and 5")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        u8::try_from(v)
            .ok()
            .and_then(SeverityLevel::from_rank)
            .ok_or_else(|| E::custom(ConfigError::InvalidLevel(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map_err(|_| E::custom(ConfigError::InvalidLevel(v.to_string())))
            .and_then(|rank| self.visit_u64(rank))
    }
}

impl<'de> Deserialize<'de> for SeverityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LevelVisitor)
    }
}

/// Resolves the governing level for one call.
///
/// The call-site level governs only when its rank is strictly lower than the
/// default's. Equal ranks leave the default in charge.
pub fn resolve_level(default: SeverityLevel, site: SeverityLevel) -> SeverityLevel {
    if site.rank() < default.rank() {
        site
    } else {
        default
    }
}

/// Process-wide default level plus the resolution rule.
///
/// The default is stored atomically. Reconfiguring while calls are in flight
/// may let one call observe the previous value.
#[derive(Debug)]
pub struct LevelPolicy {
    default: AtomicU8,
}

impl LevelPolicy {
    /// Creates a policy with the given process default.
    pub fn new(default: SeverityLevel) -> Self {
        Self {
            default: AtomicU8::new(default.rank()),
        }
    }

    /// Returns the current process default.
    pub fn default_level(&self) -> SeverityLevel {
        SeverityLevel::from_rank(self.default.load(Ordering::Acquire))
            .unwrap_or(SeverityLevel::NotSet)
    }

    /// Replaces the process default.
    pub fn set_default(&self, level: SeverityLevel) {
        self.default.store(level.rank(), Ordering::Release);
    }

    /// Resolves the level a call site should emit at.
    ///
    /// A governing `NotSet` default is emitted at `Debug`.
    pub fn effective(&self, site: SeverityLevel) -> SeverityLevel {
        resolve_level(self.default_level(), site).emission_level()
    }
}

impl Default for LevelPolicy {
    fn default() -> Self {
        Self::new(SeverityLevel::NotSet)
    }
}
