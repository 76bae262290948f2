//! Declarative call interception: trace logging, audit trails and exception
//! translation around ordinary function calls.
//!
//! This crate wraps calls at declared call sites with:
//! - **Trace logging**: `initialized`, arguments, return value and
//!   `finalized in N ms` lines at a resolved severity level
//! - **Auditing**: one structured record per call with selected argument
//!   fields, principal stamps and the outcome
//! - **Exception translation**: every failure leaving the boundary is a
//!   [`CoreException`]; unknown failures become system exceptions
//!
//! # Core Types
//!
//! - [`Interceptor`]: the boundary, configured with a [`DirectiveRegistry`]
//! - [`LogDirective`] / [`AuditDirective`]: per call site declarations
//! - [`ArgumentRenderer`]: argument and return value text, with field paths
//!   resolved by a [`FieldPathResolver`]
//! - [`EmissionSink`]: where trace lines go ([`TracingSink`] or [`MemorySink`])
//! - [`ExceptionTranslator`]: failure classification
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use intercept_core::{
//!     CallSite, CoreException, Interceptor, LogDirective, MemorySink, SeverityLevel,
//! };
//!
//! let fail = CallSite::new("svc::IntegrationTestBean", "failMe");
//! let sink = Arc::new(MemorySink::new());
//!
//! let interceptor = Interceptor::builder()
//!     .sink(sink.clone())
//!     .register_log(fail, LogDirective::new().level(SeverityLevel::Info))
//!     .build();
//!
//! let err = interceptor
//!     .invoke(fail, &(), || {
//!         Err::<(), _>(std::io::Error::new(std::io::ErrorKind::Other, "Because i fail"))
//!     })
//!     .unwrap_err();
//!
//! assert!(err.is_system());
//! assert_eq!(sink.texts()[0], "svc::IntegrationTestBean.failMe: initialized");
//! assert!(sink.texts()[2].contains("finalized in"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod config;
mod directive;
mod engine;
mod error;
mod exception;
mod interceptor;
mod invocation;
mod level;
mod logging;
mod principal;
mod registry;
mod render;
mod resolver;
mod sink;
mod trace_name;
mod translator;

pub use audit::{AuditOutcome, AuditRecord, AuditSelector, AuditTrail};
pub use config::{InterceptConfig, ENV_CAPTURE_PANICS, ENV_DEFAULT_LEVEL};
pub use directive::{ArgumentStrategy, AuditDirective, LogDirective};
pub use engine::InterceptionEngine;
pub use error::{ConfigError, ResolveError};
pub use exception::{CoreException, ExceptionKind, ExceptionLevel};
pub use interceptor::{Interceptor, InterceptorBuilder};
pub use invocation::{Argument, CallInvocation, ToArguments};
pub use level::{resolve_level, LevelPolicy, SeverityLevel};
pub use logging::{TracingSink, TRACE_TARGET};
pub use principal::{FixedPrincipalSource, Principal, PrincipalSource, StaticPrincipalSource};
pub use registry::{CallSiteDirectives, DirectiveRegistry};
pub use render::{
    argument_details, ArgumentRenderer, NULL_ARGUMENT, NULL_VALUE, WITHOUT_PARAMETERS,
    WITHOUT_RETURN_VALUE,
};
pub use resolver::{DotPathResolver, FieldPathResolver};
pub use sink::{EmissionSink, EmittedLine, MemorySink};
pub use trace_name::{trace_name, CallSite};
pub use translator::ExceptionTranslator;
