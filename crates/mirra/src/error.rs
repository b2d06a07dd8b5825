//! Error types for member resolution, invocation, and coercion

/// Result type for all reflective operations
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Errors reported by the member access layer.
///
/// Failures raised inside a target method, getter, or setter body are carried
/// as [`ReflectError::Invocation`] and pass through the resolution layers
/// unmodified; the other variants belong to this layer itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReflectError {
    /// A required name or value argument was absent
    #[error("Invalid argument: {what}")]
    InvalidArgument {
        /// What was missing
        what: String,
    },

    /// No member with the given name exists on the type
    #[error("No member named '{member}' on type '{type_name}'")]
    NotFound {
        /// The member name that was looked up
        member: String,
        /// Display name of the type that was searched
        type_name: String,
    },

    /// A result could not be coerced to the requested type
    #[error("Type mismatch on '{member}': expected '{expected}', found '{actual}'")]
    TypeMismatch {
        /// Member the coercion was performed for (empty at the raw
        /// coercion layer, filled in by the typed entry points)
        member: String,
        /// Requested type name
        expected: &'static str,
        /// Runtime type name of the value that was produced
        actual: String,
    },

    /// A target method, getter, or setter body failed
    #[error("Invocation failed: {0}")]
    Invocation(String),
}

impl ReflectError {
    /// Shorthand for an [`ReflectError::InvalidArgument`] error.
    pub fn invalid_argument(what: impl Into<String>) -> Self {
        ReflectError::InvalidArgument { what: what.into() }
    }

    /// Shorthand for a [`ReflectError::NotFound`] error naming both the
    /// member and the type it was looked up on.
    pub fn not_found(member: impl Into<String>, type_name: impl Into<String>) -> Self {
        ReflectError::NotFound {
            member: member.into(),
            type_name: type_name.into(),
        }
    }

    /// Attach a member name to a [`ReflectError::TypeMismatch`].
    ///
    /// The typed entry points use this to re-raise a raw coercion failure
    /// with the method or property name the caller actually used. Every
    /// other variant is returned unchanged.
    #[must_use]
    pub fn with_member(self, member: &str) -> Self {
        match self {
            ReflectError::TypeMismatch {
                expected, actual, ..
            } => ReflectError::TypeMismatch {
                member: member.to_string(),
                expected,
                actual,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_member_fills_type_mismatch() {
        let raw = ReflectError::TypeMismatch {
            member: String::new(),
            expected: "i32",
            actual: "string".to_string(),
        };
        let wrapped = raw.with_member("add");
        assert_eq!(
            wrapped,
            ReflectError::TypeMismatch {
                member: "add".to_string(),
                expected: "i32",
                actual: "string".to_string(),
            }
        );
    }

    #[test]
    fn test_with_member_leaves_other_variants() {
        let err = ReflectError::not_found("x", "Point");
        assert_eq!(err.clone().with_member("add"), err);
    }

    #[test]
    fn test_display() {
        let err = ReflectError::not_found("speed", "Rocket");
        assert_eq!(err.to_string(), "No member named 'speed' on type 'Rocket'");
    }
}
