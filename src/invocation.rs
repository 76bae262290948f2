//! Immutable snapshots of a single intercepted call.
//!
//! Arguments are captured once at call entry as a runtime type name, a
//! display text and a `serde_json::Value` field tree. Field paths are resolved
//! against the tree; the original values are never touched again.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::render::display_value;
use crate::trace_name::CallSite;

/// One positional argument of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// The argument was absent
    Null,
    /// The argument was present and captured
    Value {
        /// Runtime type name of the argument
        type_name: &'static str,
        /// Rendered whole value
        text: String,
        /// Field tree used for path resolution, when capture succeeded
        tree: Option<Value>,
    },
}

impl Argument {
    /// Captures an argument.
    ///
    /// A value that serializes to null (`None`, unit) is absent and becomes
    /// [`Argument::Null`]. Values that fail to serialize are kept with their `Debug` text and no
    /// field tree, so every field path on them is skipped at render time.
    pub fn of<T>(value: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        let type_name = std::any::type_name::<T>();
        match serde_json::to_value(value) {
            Ok(Value::Null) => Argument::Null,
            Ok(tree) => Argument::Value {
                type_name,
                text: display_value(&tree),
                tree: Some(tree),
            },
            Err(err) => {
                tracing::warn!(
                    type_name,
                    error = %err,
                    "argument could not be captured as a field tree"
                );
                Argument::Value {
                    type_name,
                    text: format!("{:?}", value),
                    tree: None,
                }
            }
        }
    }

    /// Captures an optional argument, mapping `None` to [`Argument::Null`].
    pub fn of_option<T>(value: Option<&T>) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        value.map_or(Argument::Null, Argument::of)
    }

    /// Returns the null argument.
    pub fn null() -> Self {
        Argument::Null
    }

    /// Returns `true` for an absent argument.
    pub fn is_null(&self) -> bool {
        matches!(self, Argument::Null)
    }

    /// Returns the runtime type name, if present.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Argument::Null => None,
            Argument::Value { type_name, .. } => Some(type_name),
        }
    }
}

/// Converts a call's own argument tuple into captured arguments.
pub trait ToArguments {
    /// Captures every positional argument in order.
    fn to_arguments(&self) -> Vec<Argument>;
}

impl ToArguments for () {
    fn to_arguments(&self) -> Vec<Argument> {
        Vec::new()
    }
}

impl ToArguments for [Argument] {
    fn to_arguments(&self) -> Vec<Argument> {
        self.to_vec()
    }
}

macro_rules! tuple_to_arguments {
    ($($name:ident),+) => {
        impl<$($name),+> ToArguments for ($($name,)+)
        where
            $($name: Serialize + fmt::Debug,)+
        {
            #[allow(non_snake_case)]
            fn to_arguments(&self) -> Vec<Argument> {
                let ($($name,)+) = self;
                vec![$(Argument::of($name)),+]
            }
        }
    };
}

tuple_to_arguments!(A);
tuple_to_arguments!(A, B);
tuple_to_arguments!(A, B, C);
tuple_to_arguments!(A, B, C, D);

/// Snapshot of one call: where it happened and what it was given.
#[derive(Debug, Clone)]
pub struct CallInvocation {
    site: CallSite,
    arguments: Vec<Argument>,
}

impl CallInvocation {
    /// Creates a snapshot from already captured arguments.
    pub fn new(site: CallSite, arguments: Vec<Argument>) -> Self {
        Self { site, arguments }
    }

    /// Captures the arguments of a call.
    pub fn capture<A: ToArguments + ?Sized>(site: CallSite, args: &A) -> Self {
        Self::new(site, args.to_arguments())
    }

    /// Returns the call site.
    pub fn site(&self) -> CallSite {
        self.site
    }

    /// Returns the positional arguments in call order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Builds the trace name of the call site.
    pub fn trace_name(&self) -> String {
        self.site.trace_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Serialize)]
    struct Account {
        id: u64,
        name: String,
    }

    #[test]
    fn captures_type_text_and_tree() {
        let account = Account {
            id: 7,
            name: "Ann".to_string(),
        };
        let arg = Argument::of(&account);

        assert!(arg.type_name().unwrap().ends_with("Account"));
        match arg {
            Argument::Value { text, tree, .. } => {
                assert_eq!(text, r#"{"id":7,"name":"Ann"}"#);
                assert_eq!(tree.unwrap()["id"], 7);
            }
            Argument::Null => panic!("expected a captured value"),
        }
    }

    #[test]
    fn strings_render_without_quotes() {
        match Argument::of("Logging you!") {
            Argument::Value { text, type_name, .. } => {
                assert_eq!(text, "Logging you!");
                assert_eq!(type_name, "str");
            }
            Argument::Null => panic!("expected a captured value"),
        }
    }

    #[test]
    fn unserializable_values_keep_debug_text() {
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        match Argument::of(&map) {
            Argument::Value { text, tree, .. } => {
                assert!(tree.is_none());
                assert!(text.contains("pair"));
            }
            Argument::Null => panic!("expected a captured value"),
        }
    }

    #[test]
    fn missing_option_is_null() {
        assert!(Argument::of_option::<u32>(None).is_null());
        assert!(!Argument::of_option(Some(&3u32)).is_null());
    }

    #[test]
    fn tuples_capture_in_order() {
        let site = CallSite::new("svc::Accounts", "logMe");
        let invocation = CallInvocation::capture(site, &("Logging you!", 42i64));
        let args = invocation.arguments();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].type_name(), Some("&str"));
        assert_eq!(args[1].type_name(), Some("i64"));
        assert_eq!(invocation.trace_name(), "svc::Accounts.logMe");
    }

    #[test]
    fn none_in_a_tuple_is_null() {
        let invocation =
            CallInvocation::capture(CallSite::new("svc::Accounts", "find"), &(None::<u32>, 3u8));
        let args = invocation.arguments();
        assert!(args[0].is_null());
        assert_eq!(args[1].type_name(), Some("u8"));
        assert!(Argument::of(&Some(4u32)).type_name().is_some());
    }

    #[test]
    fn unit_captures_nothing() {
        let invocation = CallInvocation::capture(CallSite::new("svc", "ping"), &());
        assert!(invocation.arguments().is_empty());
    }
}
