//! The call boundary: translation outside, trace logging around, audit inside.
//!
//! ```text
//! ExceptionTranslator::guard(
//!     InterceptionEngine::intercept(        // when a LogDirective is declared
//!         AuditSelector::audit(             // when an AuditDirective is declared
//!             call)))
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::audit::{AuditSelector, AuditTrail};
use crate::config::InterceptConfig;
use crate::directive::{AuditDirective, LogDirective};
use crate::engine::InterceptionEngine;
use crate::exception::CoreException;
use crate::invocation::{CallInvocation, ToArguments};
use crate::level::LevelPolicy;
use crate::logging::TracingSink;
use crate::principal::{PrincipalSource, StaticPrincipalSource};
use crate::registry::DirectiveRegistry;
use crate::render::ArgumentRenderer;
use crate::resolver::{DotPathResolver, FieldPathResolver};
use crate::sink::EmissionSink;
use crate::trace_name::CallSite;
use crate::translator::ExceptionTranslator;

/// Wraps calls with trace logging, auditing and exception translation.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use intercept_core::{CallSite, Interceptor, LogDirective, MemorySink};
///
/// let open = CallSite::new("svc::Accounts", "open");
/// let sink = Arc::new(MemorySink::new());
///
/// let interceptor = Interceptor::builder()
///     .sink(sink.clone())
///     .register_log(open, LogDirective::new())
///     .build();
///
/// let result = interceptor.invoke(open, &("Ann",), || Ok::<_, std::io::Error>(7u64));
///
/// assert_eq!(result.unwrap(), 7);
/// assert_eq!(sink.texts()[1], "svc::Accounts.open: &str=[Ann]");
/// ```
pub struct Interceptor {
    registry: DirectiveRegistry,
    engine: InterceptionEngine,
    audit: AuditSelector,
    translator: ExceptionTranslator,
}

impl Interceptor {
    /// Starts building an interceptor.
    pub fn builder() -> InterceptorBuilder {
        InterceptorBuilder::new()
    }

    /// Returns the level policy, for reconfiguring the process default.
    pub fn level_policy(&self) -> &LevelPolicy {
        self.engine.policy()
    }

    /// Returns the declaration table.
    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    /// Captures `args` and runs `call` at `site`.
    ///
    /// # Errors
    ///
    /// Any failure of `call` is returned as a [`CoreException`]: taxonomy
    /// members unchanged, everything else as a system exception.
    pub fn invoke<A, R, E, F>(&self, site: CallSite, args: &A, call: F) -> Result<R, CoreException>
    where
        A: ToArguments + ?Sized,
        F: FnOnce() -> Result<R, E>,
        R: Serialize + fmt::Debug,
        E: StdError + Send + Sync + 'static,
    {
        self.run(CallInvocation::capture(site, args), call)
    }

    /// Runs `call` for an already captured invocation.
    ///
    /// # Errors
    ///
    /// See [`invoke`](Self::invoke).
    pub fn run<R, E, F>(&self, invocation: CallInvocation, call: F) -> Result<R, CoreException>
    where
        F: FnOnce() -> Result<R, E>,
        R: Serialize + fmt::Debug,
        E: StdError + Send + Sync + 'static,
    {
        let directives = self.registry.directives(&invocation.site());

        self.translator.guard(|| {
            let Some(directives) = directives else {
                return call();
            };

            let audited = |inner: F| match &directives.audit {
                Some(directive) => self.audit.audit(directive, &invocation, inner),
                None => inner(),
            };

            match &directives.log {
                Some(directive) => self.engine.intercept(&invocation, directive, || audited(call)),
                None => audited(call),
            }
        })
    }

    /// Turns `f` into a function with the same arguments that runs through
    /// this interceptor at `site`.
    ///
    /// ```
    /// use intercept_core::{CallSite, CoreException, Interceptor, LogDirective};
    ///
    /// let site = CallSite::new("svc::Accounts", "deposit");
    /// let interceptor = Interceptor::builder()
    ///     .register_log(site, LogDirective::new())
    ///     .build();
    ///
    /// let deposit = interceptor.wrap(site, |(balance, amount): (u64, u64)| {
    ///     balance
    ///         .checked_add(amount)
    ///         .ok_or_else(|| CoreException::business_violation("overflow"))
    /// });
    ///
    /// assert_eq!(deposit((10, 5)).unwrap(), 15);
    /// assert!(deposit((u64::MAX, 1)).unwrap_err().is_business_violation());
    /// ```
    pub fn wrap<'a, A, R, E, F>(
        &'a self,
        site: CallSite,
        f: F,
    ) -> impl Fn(A) -> Result<R, CoreException> + 'a
    where
        A: ToArguments + 'a,
        F: Fn(A) -> Result<R, E> + 'a,
        R: Serialize + fmt::Debug + 'a,
        E: StdError + Send + Sync + 'static,
    {
        move |args: A| {
            let invocation = CallInvocation::capture(site, &args);
            self.run(invocation, || f(args))
        }
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("registry", &self.registry)
            .field("engine", &self.engine)
            .field("audit", &self.audit)
            .field("translator", &self.translator)
            .finish()
    }
}

/// Builder for [`Interceptor`].
///
/// Unset collaborators default to [`TracingSink`], [`DotPathResolver`] and an
/// anonymous [`StaticPrincipalSource`].
pub struct InterceptorBuilder {
    config: InterceptConfig,
    sink: Option<Arc<dyn EmissionSink>>,
    resolver: Option<Arc<dyn FieldPathResolver>>,
    principals: Option<Arc<dyn PrincipalSource>>,
    trail: Option<Arc<AuditTrail>>,
    registry: DirectiveRegistry,
}

impl InterceptorBuilder {
    /// Creates a builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: InterceptConfig::default(),
            sink: None,
            resolver: None,
            principals: None,
            trail: None,
            registry: DirectiveRegistry::new(),
        }
    }

    /// Applies process-wide settings.
    pub fn config(mut self, config: InterceptConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the emission sink for trace lines.
    pub fn sink(mut self, sink: Arc<dyn EmissionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets the field path evaluator.
    pub fn resolver(mut self, resolver: Arc<dyn FieldPathResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Sets the source of audit stamps.
    pub fn principals(mut self, principals: Arc<dyn PrincipalSource>) -> Self {
        self.principals = Some(principals);
        self
    }

    /// Also records audit records into `trail`.
    pub fn trail(mut self, trail: Arc<AuditTrail>) -> Self {
        self.trail = Some(trail);
        self
    }

    /// Replaces the whole declaration table.
    pub fn registry(mut self, registry: DirectiveRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Declares trace logging for `site`.
    pub fn register_log(mut self, site: CallSite, directive: LogDirective) -> Self {
        self.registry = self.registry.register_log(site, directive);
        self
    }

    /// Declares auditing for `site`.
    pub fn register_audit(mut self, site: CallSite, directive: AuditDirective) -> Self {
        self.registry = self.registry.register_audit(site, directive);
        self
    }

    /// Builds the interceptor.
    pub fn build(self) -> Interceptor {
        let renderer = ArgumentRenderer::new(
            self.resolver
                .unwrap_or_else(|| Arc::new(DotPathResolver)),
        );
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));
        let principals = self
            .principals
            .unwrap_or_else(|| Arc::new(StaticPrincipalSource::anonymous()));

        let mut audit = AuditSelector::new(renderer.clone(), principals);
        if let Some(trail) = self.trail {
            audit = audit.with_trail(trail);
        }

        tracing::debug!(
            default_level = %self.config.default_level,
            capture_panics = self.config.capture_panics,
            sites = self.registry.len(),
            "interceptor configured"
        );

        Interceptor {
            registry: self.registry,
            engine: InterceptionEngine::new(
                sink,
                Arc::new(LevelPolicy::new(self.config.default_level)),
                renderer,
            ),
            audit,
            translator: ExceptionTranslator::new().capture_panics(self.config.capture_panics),
        }
    }
}

impl Default for InterceptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
