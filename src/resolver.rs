//! Field path resolution over captured argument trees.
//!
//! The renderer only needs `resolve(tree, path) -> value`; how a path is
//! parsed is up to the [`FieldPathResolver`] implementation.

use serde_json::Value;

use crate::error::ResolveError;

/// Evaluates a field path expression against a captured argument.
///
/// Implementations must not panic. Every failure is reported as a
/// [`ResolveError`] and handled by the caller.
pub trait FieldPathResolver: Send + Sync {
    /// Resolves `path` inside `target`.
    ///
    /// A field that exists but holds null resolves to `Value::Null`.
    fn resolve(&self, target: &Value, path: &str) -> Result<Value, ResolveError>;
}

/// Dot-path walker.
///
/// Segments are separated by `.` or `/` (a leading `/` is ignored). A segment
/// is either a field name, a bare array index (`items.0`) or a field followed
/// by one or more indexes (`items[0]`, `grid[1][2]`).
///
/// # Examples
///
/// ```
/// use intercept_core::{DotPathResolver, FieldPathResolver};
/// use serde_json::json;
///
/// let tree = json!({"owner": {"roles": ["admin", "user"]}});
/// let resolver = DotPathResolver;
///
/// assert_eq!(resolver.resolve(&tree, "owner.roles[1]").unwrap(), json!("user"));
/// assert!(resolver.resolve(&tree, "owner.email").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DotPathResolver;

impl DotPathResolver {
    fn segments(path: &str) -> Result<Vec<&str>, ResolveError> {
        let trimmed = path.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(ResolveError::EmptyPath(path.to_string()));
        }
        let segments: Vec<&str> = trimmed.split(['.', '/']).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ResolveError::EmptyPath(path.to_string()));
        }
        Ok(segments)
    }

    fn index<'v>(current: &'v Value, raw: &str, path: &str) -> Result<&'v Value, ResolveError> {
        let invalid = || ResolveError::InvalidIndex {
            path: path.to_string(),
            segment: raw.to_string(),
        };
        match current {
            Value::Array(items) => {
                let idx: usize = raw.parse().map_err(|_| invalid())?;
                items.get(idx).ok_or_else(invalid)
            }
            _ => Err(ResolveError::NotTraversable {
                path: path.to_string(),
                segment: raw.to_string(),
            }),
        }
    }

    fn field<'v>(current: &'v Value, name: &str, path: &str) -> Result<&'v Value, ResolveError> {
        match current {
            Value::Object(fields) => fields.get(name).ok_or_else(|| ResolveError::MissingField {
                path: path.to_string(),
                segment: name.to_string(),
            }),
            Value::Array(_) if name.bytes().all(|b| b.is_ascii_digit()) => {
                Self::index(current, name, path)
            }
            _ => Err(ResolveError::NotTraversable {
                path: path.to_string(),
                segment: name.to_string(),
            }),
        }
    }

    fn step<'v>(current: &'v Value, segment: &str, path: &str) -> Result<&'v Value, ResolveError> {
        let Some(open) = segment.find('[') else {
            return Self::field(current, segment, path);
        };

        let mut value = if open == 0 {
            current
        } else {
            Self::field(current, &segment[..open], path)?
        };

        let mut rest = &segment[open..];
        while !rest.is_empty() {
            let close = match (rest.strip_prefix('['), rest.find(']')) {
                (Some(_), Some(close)) => close,
                _ => {
                    return Err(ResolveError::InvalidIndex {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    })
                }
            };
            value = Self::index(value, &rest[1..close], path)?;
            rest = &rest[close + 1..];
        }
        Ok(value)
    }
}

impl FieldPathResolver for DotPathResolver {
    fn resolve(&self, target: &Value, path: &str) -> Result<Value, ResolveError> {
        let mut current = target;
        for segment in Self::segments(path)? {
            current = Self::step(current, segment, path)?;
        }
        Ok(current.clone())
    }
}
