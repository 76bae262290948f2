//! Errors raised by the tracing path and by configuration.
//!
//! None of these ever reach the caller of a wrapped operation. Field
//! resolution failures are absorbed by the renderer; configuration failures
//! surface only while building an [`Interceptor`](crate::Interceptor).

use thiserror::Error;

/// Failure to resolve a field path against an argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The path expression was empty or contained an empty segment
    #[error("empty field path segment in '{0}'")]
    EmptyPath(String),

    /// The argument itself was null
    #[error("cannot resolve '{0}' on a null argument")]
    NullTarget(String),

    /// The argument could not be captured as a field tree
    #[error("argument of type {type_name} exposes no fields for '{path}'")]
    Opaque {
        /// Path that was requested
        path: String,
        /// Runtime type of the argument
        type_name: &'static str,
    },

    /// A segment named a field the value does not have
    #[error("no field '{segment}' while resolving '{path}'")]
    MissingField {
        /// Full path that was requested
        path: String,
        /// Segment that failed
        segment: String,
    },

    /// An index was out of bounds or not a number
    #[error("invalid index '{segment}' while resolving '{path}'")]
    InvalidIndex {
        /// Full path that was requested
        path: String,
        /// Segment that failed
        segment: String,
    },

    /// A segment tried to descend into a scalar value
    #[error("cannot descend into scalar at '{segment}' while resolving '{path}'")]
    NotTraversable {
        /// Full path that was requested
        path: String,
        /// Segment that failed
        segment: String,
    },
}

/// Invalid interceptor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A severity level name or rank was not recognised
    #[error("invalid severity level: '{0}'")]
    InvalidLevel(String),

    /// The configuration document could not be parsed
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
