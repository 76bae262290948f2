//! Rendering of call arguments and return values into trace text.
//!
//! Output is deterministic: arguments appear in call order, and filtered
//! rendering walks field paths in declaration order (outer) before arguments
//! (inner). Entries are separated by a single space.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::ResolveError;
use crate::invocation::Argument;
use crate::resolver::{DotPathResolver, FieldPathResolver};

/// Placeholder for a call without (rendered) arguments.
pub const WITHOUT_PARAMETERS: &str = "without any parameters";

/// Placeholder for a call that returned nothing.
pub const WITHOUT_RETURN_VALUE: &str = "without any return value (void)";

/// Type slot text for a null argument.
pub const NULL_ARGUMENT: &str = "null argument";

/// Value slot text for a null value.
pub const NULL_VALUE: &str = "null value";

/// Renders a captured value. Strings are written without quotes.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Null => NULL_VALUE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds `<name>: <arguments>`, substituting the placeholder for empty text.
pub fn argument_details(name: &str, arguments: &str) -> String {
    if arguments.is_empty() {
        format!("{}: {}", name, WITHOUT_PARAMETERS)
    } else {
        format!("{}: {}", name, arguments)
    }
}

/// Turns argument lists and return values into trace text.
///
/// Field lookups go through a [`FieldPathResolver`]. Lookup failures are
/// logged at WARN and the (argument, path) pair is left out; rendering itself
/// never fails.
#[derive(Clone)]
pub struct ArgumentRenderer {
    resolver: Arc<dyn FieldPathResolver>,
}

impl ArgumentRenderer {
    /// Creates a renderer using the given resolver.
    pub fn new(resolver: Arc<dyn FieldPathResolver>) -> Self {
        Self { resolver }
    }

    /// Renders every argument as `<type>=[<value>]`.
    pub fn render_all(&self, args: &[Argument]) -> String {
        if args.is_empty() {
            return WITHOUT_PARAMETERS.to_string();
        }

        args.iter()
            .map(|arg| match arg {
                Argument::Null => format!("{}=[{}]", NULL_ARGUMENT, NULL_VALUE),
                Argument::Value {
                    type_name, text, ..
                } => format!("{}=[{}]", type_name, text),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders `<type>.<path>=[<value>]` for each path and argument.
    ///
    /// Pairs that do not resolve are skipped, so the result may be empty.
    pub fn render_filtered<S: AsRef<str>>(&self, args: &[Argument], paths: &[S]) -> String {
        if args.is_empty() {
            return WITHOUT_PARAMETERS.to_string();
        }

        let mut entries = Vec::new();
        for path in paths {
            let path = path.as_ref();
            for arg in args {
                match self.resolve(arg, path) {
                    Ok((type_name, value)) => entries.push(format!(
                        "{}.{}=[{}]",
                        type_name,
                        path,
                        display_value(&value)
                    )),
                    Err(err) => {
                        tracing::warn!(
                            path,
                            argument = arg.type_name().unwrap_or(NULL_ARGUMENT),
                            error = %err,
                            "field path skipped while rendering arguments"
                        );
                    }
                }
            }
        }
        entries.join(" ")
    }

    /// Renders a return value, or the void placeholder for unit/`None`.
    pub fn render_return<R>(&self, value: &R) -> String
    where
        R: Serialize + fmt::Debug + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(Value::Null) => WITHOUT_RETURN_VALUE.to_string(),
            Ok(tree) => display_value(&tree),
            Err(err) => {
                tracing::warn!(
                    type_name = std::any::type_name::<R>(),
                    error = %err,
                    "return value could not be captured"
                );
                format!("{:?}", value)
            }
        }
    }

    fn resolve(&self, arg: &Argument, path: &str) -> Result<(&'static str, Value), ResolveError> {
        match arg {
            Argument::Null => Err(ResolveError::NullTarget(path.to_string())),
            Argument::Value {
                type_name,
                tree: None,
                ..
            } => Err(ResolveError::Opaque {
                path: path.to_string(),
                type_name: *type_name,
            }),
            Argument::Value {
                type_name,
                tree: Some(tree),
                ..
            } => self
                .resolver
                .resolve(tree, path)
                .map(|value| (*type_name, value)),
        }
    }
}

impl Default for ArgumentRenderer {
    fn default() -> Self {
        Self::new(Arc::new(DotPathResolver))
    }
}

impl fmt::Debug for ArgumentRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentRenderer").finish_non_exhaustive()
    }
}
