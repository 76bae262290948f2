//! The closed exception taxonomy every call-path failure is normalized into.
//!
//! There are exactly three kinds:
//! - **BusinessViolation**: a business rule rejected the request
//! - **Application**: the application detected an invalid state
//! - **System**: infrastructure failure, and the catch-all for anything unknown
//!
//! Each exception carries a message, an optional cause exposed through
//! [`std::error::Error::source`], and three ordered, append-only lists of
//! exception-level messages used to aggregate multiple causes.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Member of the exception taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// A business rule was violated
    BusinessViolation,
    /// The application detected an invalid state
    Application,
    /// Infrastructure failure or any unrecognised failure
    System,
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceptionKind::BusinessViolation => write!(f, "BusinessViolationException"),
            ExceptionKind::Application => write!(f, "ApplicationException"),
            ExceptionKind::System => write!(f, "SystemException"),
        }
    }
}

/// Severity bucket of an exception-level message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExceptionLevel {
    /// Informative message
    Informative,
    /// Warning message
    Warning,
    /// Error message
    Error,
}

/// A failure of one of the three taxonomy kinds.
///
/// # Examples
///
/// ```
/// use intercept_core::{CoreException, ExceptionKind, ExceptionLevel};
///
/// let mut failure = CoreException::business_violation("credit limit exceeded");
/// failure.add_exception_message(ExceptionLevel::Error, "limit.exceeded");
///
/// assert_eq!(failure.kind(), ExceptionKind::BusinessViolation);
/// assert_eq!(failure.messages(ExceptionLevel::Error), ["limit.exceeded"]);
/// ```
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct CoreException {
    kind: ExceptionKind,
    message: String,
    #[source]
    cause: Option<BoxedCause>,
    informative: Vec<String>,
    warning: Vec<String>,
    error: Vec<String>,
}

impl CoreException {
    /// Creates an exception of the given kind.
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            informative: Vec::new(),
            warning: Vec::new(),
            error: Vec::new(),
        }
    }

    /// Creates a business violation.
    pub fn business_violation(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::BusinessViolation, message)
    }

    /// Creates an application exception.
    pub fn application(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::Application, message)
    }

    /// Creates a system exception.
    pub fn system(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::System, message)
    }

    /// Attaches the underlying cause.
    pub fn with_cause<E>(self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.with_boxed_cause(Box::new(cause))
    }

    /// Attaches an already boxed cause.
    pub fn with_boxed_cause(mut self, cause: BoxedCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Returns the taxonomy member.
    pub fn kind(&self) -> ExceptionKind {
        self.kind
    }

    /// Returns the detail message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the wrapped cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Returns `true` for a business violation.
    pub fn is_business_violation(&self) -> bool {
        self.kind == ExceptionKind::BusinessViolation
    }

    /// Returns `true` for an application exception.
    pub fn is_application(&self) -> bool {
        self.kind == ExceptionKind::Application
    }

    /// Returns `true` for a system exception.
    pub fn is_system(&self) -> bool {
        self.kind == ExceptionKind::System
    }

    /// Returns the messages recorded at `level`, in insertion order.
    pub fn messages(&self, level: ExceptionLevel) -> &[String] {
        match level {
            ExceptionLevel::Informative => &self.informative,
            ExceptionLevel::Warning => &self.warning,
            ExceptionLevel::Error => &self.error,
        }
    }

    /// Appends a message at `level`.
    pub fn add_exception_message(&mut self, level: ExceptionLevel, message: impl Into<String>) {
        self.bucket_mut(level).push(message.into());
    }

    /// Returns `true` if any exception-level message has been recorded.
    pub fn has_exception_messages(&self) -> bool {
        !(self.informative.is_empty() && self.warning.is_empty() && self.error.is_empty())
    }

    /// Appends every exception-level message of `other` to this exception.
    ///
    /// A system exception only accepts messages from another system
    /// exception.
    ///
    /// # Errors
    ///
    /// Returns a new system exception describing the mismatch when `self` is
    /// a system exception and `other` is not. `self` is left unchanged.
    pub fn add_all_exception_level_messages(
        &mut self,
        other: &CoreException,
    ) -> Result<(), CoreException> {
        if self.kind == ExceptionKind::System && other.kind != ExceptionKind::System {
            return Err(CoreException::system(format!(
                "{} not of type {}.",
                other.kind,
                ExceptionKind::System
            )));
        }

        for level in [
            ExceptionLevel::Informative,
            ExceptionLevel::Warning,
            ExceptionLevel::Error,
        ] {
            let incoming = other.messages(level).to_vec();
            self.bucket_mut(level).extend(incoming);
        }
        Ok(())
    }

    fn bucket_mut(&mut self, level: ExceptionLevel) -> &mut Vec<String> {
        match level {
            ExceptionLevel::Informative => &mut self.informative,
            ExceptionLevel::Warning => &mut self.warning,
            ExceptionLevel::Error => &mut self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn kinds_display_their_names() {
        assert_eq!(
            ExceptionKind::BusinessViolation.to_string(),
            "BusinessViolationException"
        );
        assert_eq!(ExceptionKind::Application.to_string(), "ApplicationException");
        assert_eq!(ExceptionKind::System.to_string(), "SystemException");
    }

    #[test]
    fn display_includes_kind_and_message() {
        let failure = CoreException::system("Cause i can");
        assert_eq!(failure.to_string(), "SystemException: Cause i can");
    }

    #[test]
    fn cause_is_exposed_as_source() {
        let failure = CoreException::application("Cause i can")
            .with_cause(io::Error::new(io::ErrorKind::Other, "Because i fail"));

        let source = failure.source().expect("cause should be kept");
        assert_eq!(source.to_string(), "Because i fail");
        assert!(failure.cause().is_some());
    }

    #[test]
    fn exception_messages_are_ordered_per_level() {
        let mut failure = CoreException::business_violation("rejected");
        failure.add_exception_message(ExceptionLevel::Warning, "w1");
        failure.add_exception_message(ExceptionLevel::Error, "e1");
        failure.add_exception_message(ExceptionLevel::Warning, "w2");

        assert_eq!(failure.messages(ExceptionLevel::Warning), ["w1", "w2"]);
        assert_eq!(failure.messages(ExceptionLevel::Error), ["e1"]);
        assert!(failure.messages(ExceptionLevel::Informative).is_empty());
        assert!(failure.has_exception_messages());
    }

    #[test]
    fn non_system_exceptions_merge_any_source() {
        let mut target = CoreException::application("target");
        let mut source = CoreException::system("source");
        source.add_exception_message(ExceptionLevel::Informative, "i1");
        source.add_exception_message(ExceptionLevel::Error, "e1");

        target
            .add_all_exception_level_messages(&source)
            .expect("application accepts any source");

        assert_eq!(target.messages(ExceptionLevel::Informative), ["i1"]);
        assert_eq!(target.messages(ExceptionLevel::Error), ["e1"]);
    }

    #[test]
    fn system_merges_from_system() {
        let mut target = CoreException::system("target");
        target.add_exception_message(ExceptionLevel::Error, "first");
        let mut source = CoreException::system("source");
        source.add_exception_message(ExceptionLevel::Error, "second");

        target.add_all_exception_level_messages(&source).unwrap();
        assert_eq!(target.messages(ExceptionLevel::Error), ["first", "second"]);
    }

    #[test]
    fn system_rejects_merge_from_application() {
        let mut target = CoreException::system("target");
        let mut source = CoreException::application("source");
        source.add_exception_message(ExceptionLevel::Error, "e1");

        let err = target
            .add_all_exception_level_messages(&source)
            .expect_err("merge must be rejected");

        assert!(err.is_system());
        assert_eq!(
            err.message(),
            "ApplicationException not of type SystemException."
        );
        assert!(!target.has_exception_messages());
    }
}
