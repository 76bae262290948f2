//! The around-the-call trace wrapper.
//!
//! Each call moves through four phases in order:
//!
//! ```text
//! ENTRY -> ARG-RENDER -> INVOKE -> EXIT(normal | failing)
//! ```
//!
//! The clock starts before ENTRY, so the reported time includes rendering.
//! The `finalized` line is emitted by a drop guard and therefore appears
//! exactly once on every exit path, including unwinding.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::directive::{ArgumentStrategy, LogDirective};
use crate::invocation::CallInvocation;
use crate::level::{LevelPolicy, SeverityLevel};
use crate::render::{argument_details, ArgumentRenderer};
use crate::sink::EmissionSink;

/// Emits `<name>: finalized in <ms> ms` when dropped.
struct FinalizeGuard<'a> {
    sink: &'a dyn EmissionSink,
    level: SeverityLevel,
    name: &'a str,
    started: Instant,
}

impl<'a> FinalizeGuard<'a> {
    fn start(sink: &'a dyn EmissionSink, level: SeverityLevel, name: &'a str) -> Self {
        Self {
            sink,
            level,
            name,
            started: Instant::now(),
        }
    }
}

impl Drop for FinalizeGuard<'_> {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed().as_millis();
        self.sink.emit(
            self.level,
            &format!("{}: finalized in {} ms", self.name, elapsed),
        );
    }
}

/// Wraps calls with entry, argument, return and finalize trace lines.
///
/// The wrapped call is invoked exactly once whether or not its level is
/// enabled. Failures are returned unmodified.
#[derive(Clone)]
pub struct InterceptionEngine {
    sink: Arc<dyn EmissionSink>,
    policy: Arc<LevelPolicy>,
    renderer: ArgumentRenderer,
}

impl InterceptionEngine {
    /// Creates an engine emitting to `sink`.
    pub fn new(
        sink: Arc<dyn EmissionSink>,
        policy: Arc<LevelPolicy>,
        renderer: ArgumentRenderer,
    ) -> Self {
        Self {
            sink,
            policy,
            renderer,
        }
    }

    /// Returns the level policy shared by this engine.
    pub fn policy(&self) -> &LevelPolicy {
        &self.policy
    }

    /// Renders the argument section for `directive`.
    ///
    /// The result may be empty; [`argument_details`] substitutes the
    /// placeholder when the line is built.
    pub fn render_arguments(&self, invocation: &CallInvocation, directive: &LogDirective) -> String {
        match directive.strategy() {
            ArgumentStrategy::All => self.renderer.render_all(invocation.arguments()),
            ArgumentStrategy::None => String::new(),
            ArgumentStrategy::Custom => self
                .renderer
                .render_filtered(invocation.arguments(), directive.field_paths()),
        }
    }

    /// Runs `call` inside the trace lifecycle.
    pub fn intercept<R, E, F>(
        &self,
        invocation: &CallInvocation,
        directive: &LogDirective,
        call: F,
    ) -> Result<R, E>
    where
        F: FnOnce() -> Result<R, E>,
        R: Serialize + fmt::Debug,
    {
        let level = self.policy.effective(directive.site_level());
        if !self.sink.is_enabled(level) {
            return call();
        }

        let name = invocation.trace_name();
        let _finalize = FinalizeGuard::start(self.sink.as_ref(), level, &name);

        self.sink.emit(level, &format!("{}: initialized", name));

        let arguments = self.render_arguments(invocation, directive);
        self.sink.emit(level, &argument_details(&name, &arguments));

        let outcome = call();

        if let Ok(value) = &outcome {
            self.sink.emit(
                level,
                &format!("{}: {}", name, self.renderer.render_return(value)),
            );
        }
        outcome
    }
}

impl fmt::Debug for InterceptionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
