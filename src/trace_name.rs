use std::fmt;

/// Identifies an intercepted operation: its declaring type and method name.
///
/// # Examples
///
/// ```
/// use intercept_core::CallSite;
///
/// struct AccountService;
///
/// let site = CallSite::of::<AccountService>("open");
/// assert!(site.trace_name().ends_with("AccountService.open"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    declaring_type: &'static str,
    method: &'static str,
}

impl CallSite {
    /// Creates a call site from an explicit type name and method name.
    pub const fn new(declaring_type: &'static str, method: &'static str) -> Self {
        Self {
            declaring_type,
            method,
        }
    }

    /// Creates a call site using the fully qualified name of `T`.
    pub fn of<T: ?Sized>(method: &'static str) -> Self {
        Self::new(std::any::type_name::<T>(), method)
    }

    /// Returns the declaring type name.
    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    /// Returns the method name.
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Builds `<declaring-type>.<method>`.
    pub fn trace_name(&self) -> String {
        trace_name(self.declaring_type, self.method)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.method)
    }
}

/// Joins a declaring type and a method into a trace name.
pub fn trace_name(declaring_type: &str, method: &str) -> String {
    let mut name = String::with_capacity(declaring_type.len() + method.len() + 1);
    name.push_str(declaring_type);
    name.push('.');
    name.push_str(method);
    name
}
