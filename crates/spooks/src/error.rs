//! Error types for spy creation and dispatch
//!
//! Provides error handling for:
//! - Invalid factory options (name, log, archetype)
//! - Dispatching to members of a spy object that cannot be called

/// Main spy error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpyError {
    /// Function name missing or empty
    #[error("invalid function name: '{0}'")]
    InvalidFunctionName(String),

    /// No log supplied to the factory
    #[error("invalid log: a spy needs a log to record calls into")]
    InvalidLog,

    /// Archetype missing or could not be resolved
    #[error("invalid archetype: {0}")]
    InvalidArchetype(String),

    /// Member of a spy object is missing or is not a spy
    #[error("member is not callable: '{0}'")]
    NotCallable(String),
}

impl SpyError {
    /// Create invalid archetype error
    pub fn invalid_archetype(reason: impl Into<String>) -> Self {
        Self::InvalidArchetype(reason.into())
    }

    /// Check if error comes from factory options rather than dispatch
    #[inline]
    #[must_use]
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFunctionName(_) | Self::InvalidLog | Self::InvalidArchetype(_)
        )
    }
}

/// Result type alias for spy operations
pub type SpyResult<T> = Result<T, SpyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_function_name_display() {
        let err = SpyError::InvalidFunctionName(String::new());
        assert_eq!(err.to_string(), "invalid function name: ''");
    }

    #[test]
    fn invalid_archetype_display() {
        let err = SpyError::invalid_archetype("factory declined");
        assert_eq!(err.to_string(), "invalid archetype: factory declined");
    }

    #[test]
    fn setup_errors_are_classified() {
        assert!(SpyError::InvalidLog.is_setup_error());
        assert!(SpyError::InvalidFunctionName("x".into()).is_setup_error());
        assert!(SpyError::invalid_archetype("missing").is_setup_error());
        assert!(!SpyError::NotCallable("baz".into()).is_setup_error());
    }
}
