use std::any::Any;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};

use crate::exception::CoreException;

/// Maps any failure escaping a wrapped call onto the exception taxonomy.
///
/// Taxonomy members pass through unchanged. Anything else becomes a system
/// exception that keeps the original failure as its cause. Translation itself
/// cannot fail.
///
/// # Examples
///
/// ```
/// use intercept_core::{CoreException, ExceptionTranslator};
/// use std::io;
///
/// let translator = ExceptionTranslator::new();
///
/// let known = translator.translate(CoreException::business_violation("x"));
/// assert!(known.is_business_violation());
///
/// let unknown = translator.translate(io::Error::new(io::ErrorKind::Other, "y"));
/// assert!(unknown.is_system());
/// assert_eq!(unknown.message(), "y");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExceptionTranslator {
    capture_panics: bool,
}

impl ExceptionTranslator {
    /// Creates a translator that also turns panics into system exceptions.
    pub fn new() -> Self {
        Self {
            capture_panics: true,
        }
    }

    /// Sets whether [`guard`](Self::guard) catches panics of the wrapped call.
    pub fn capture_panics(mut self, enabled: bool) -> Self {
        self.capture_panics = enabled;
        self
    }

    /// Translates a typed failure.
    pub fn translate<E>(&self, failure: E) -> CoreException
    where
        E: StdError + Send + Sync + 'static,
    {
        classify(Box::new(failure), std::any::type_name::<E>())
    }

    /// Translates a boxed failure.
    pub fn translate_boxed(&self, failure: Box<dyn StdError + Send + Sync + 'static>) -> CoreException {
        classify(failure, "dyn core::error::Error")
    }

    /// Translates a panic payload into a system exception.
    pub fn translate_panic(&self, payload: Box<dyn Any + Send>) -> CoreException {
        let detail = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        tracing::error!(panic = %detail, "panic translated to system exception");
        CoreException::system(format!("panic in intercepted call: {}", detail))
    }

    /// Runs `call` and translates its failure, if any.
    ///
    /// On success the value is returned untouched.
    pub fn guard<T, E, F>(&self, call: F) -> Result<T, CoreException>
    where
        F: FnOnce() -> Result<T, E>,
        E: StdError + Send + Sync + 'static,
    {
        if !self.capture_panics {
            return call().map_err(|e| self.translate(e));
        }

        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(failure)) => Err(self.translate(failure)),
            Err(payload) => Err(self.translate_panic(payload)),
        }
    }
}

impl Default for ExceptionTranslator {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(failure: Box<dyn StdError + Send + Sync + 'static>, type_name: &str) -> CoreException {
    match failure.downcast::<CoreException>() {
        Ok(known) => {
            tracing::debug!(kind = %known.kind(), "known exception passed through");
            *known
        }
        Err(unknown) => {
            let text = unknown.to_string();
            let message = if text.trim().is_empty() {
                format!("unknown failure of type {}", type_name)
            } else {
                text
            };
            tracing::error!(
                failure_type = type_name,
                error = %message,
                "unknown exception translated to system exception"
            );
            CoreException::system(message).with_boxed_cause(unknown)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::{ExceptionKind, ExceptionLevel};
    use std::fmt;
    use std::io;

    #[derive(Debug)]
    struct UnknownException;

    impl fmt::Display for UnknownException {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "I must be converted to SystemException.")
        }
    }

    impl StdError for UnknownException {}

    #[derive(Debug)]
    struct Silent;

    impl fmt::Display for Silent {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Ok(())
        }
    }

    impl StdError for Silent {}

    fn io_error(msg: &str) -> io::Error {
        io::Error::new(io::ErrorKind::Other, msg.to_string())
    }

    #[test]
    fn taxonomy_members_pass_through() {
        let translator = ExceptionTranslator::new();
        for kind in [
            ExceptionKind::BusinessViolation,
            ExceptionKind::Application,
            ExceptionKind::System,
        ] {
            let mut original = CoreException::new(kind, "Cause i can").with_cause(io_error("Because i fail"));
            original.add_exception_message(ExceptionLevel::Warning, "kept");

            let translated = translator.translate(original);

            assert_eq!(translated.kind(), kind);
            assert_eq!(translated.message(), "Cause i can");
            assert_eq!(translated.messages(ExceptionLevel::Warning), ["kept"]);
            assert_eq!(translated.source().unwrap().to_string(), "Because i fail");
        }
    }

    #[test]
    fn translation_is_idempotent() {
        let translator = ExceptionTranslator::new();
        let once = translator.translate(io_error("y"));
        let twice = translator.translate(once);
        assert!(twice.is_system());
        assert_eq!(twice.message(), "y");
        assert_eq!(twice.source().unwrap().to_string(), "y");
    }

    #[test]
    fn unknown_failures_become_system_exceptions() {
        let translated = ExceptionTranslator::new().translate(io_error("y"));

        assert!(translated.is_system());
        assert_eq!(translated.message(), "y");
        let cause = translated.cause().expect("original kept as cause");
        let io = cause.downcast_ref::<io::Error>().expect("cause is the io error");
        assert_eq!(io.to_string(), "y");
    }

    #[test]
    fn custom_unknown_failures_keep_their_message() {
        let translated = ExceptionTranslator::new().translate(UnknownException);
        assert!(translated.is_system());
        assert_eq!(translated.message(), "I must be converted to SystemException.");
    }

    #[test]
    fn empty_messages_get_a_generated_description() {
        let translated = ExceptionTranslator::new().translate(Silent);
        assert!(translated.message().starts_with("unknown failure of type "));
        assert!(translated.message().ends_with("Silent"));
    }

    #[test]
    fn boxed_failures_are_classified() {
        let translator = ExceptionTranslator::new();
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(CoreException::application("a"));
        assert!(translator.translate_boxed(boxed).is_application());

        let boxed: Box<dyn StdError + Send + Sync> = Box::new(io_error("b"));
        assert!(translator.translate_boxed(boxed).is_system());
    }

    #[test]
    fn guard_is_a_no_op_on_success() {
        let result = ExceptionTranslator::new().guard(|| Ok::<_, io::Error>(5));
        assert_eq!(result.unwrap(), 5);
    }

    #[test]
    fn guard_translates_failures() {
        let result = ExceptionTranslator::new().guard(|| Err::<(), _>(io_error("down")));
        let err = result.unwrap_err();
        assert!(err.is_system());
        assert_eq!(err.message(), "down");
    }

    #[test]
    fn guard_translates_panics() {
        let result = ExceptionTranslator::new()
            .guard(|| -> Result<(), io::Error> { panic!("boom") });
        let err = result.unwrap_err();
        assert!(err.is_system());
        assert_eq!(err.message(), "panic in intercepted call: boom");
    }

    #[test]
    fn formatted_panic_payloads_are_kept() {
        let code = 7;
        let result = ExceptionTranslator::new()
            .guard(|| -> Result<(), io::Error> { panic!("code {}", code) });
        assert_eq!(result.unwrap_err().message(), "panic in intercepted call: code 7");
    }
}
