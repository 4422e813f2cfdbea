//! Repository error types.

use thiserror::Error;

use super::types::OptionKind;

/// Errors that can occur when talking to a bug repository.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The requested bug does not exist.
    #[error("Bug not found: {0}")]
    NotFound(String),

    /// A reference list could not be loaded.
    #[error("Failed to load {0}")]
    OptionsUnavailable(OptionKind),

    /// The backend could not serve the request.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Check whether repeating the request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::OptionsUnavailable(_) | ApiError::Unavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("BUG-123".to_string());
        assert_eq!(err.to_string(), "Bug not found: BUG-123");

        let err = ApiError::OptionsUnavailable(OptionKind::Users);
        assert_eq!(err.to_string(), "Failed to load users");
    }

    #[test]
    fn test_is_transient() {
        assert!(ApiError::Unavailable("timeout".to_string()).is_transient());
        assert!(ApiError::OptionsUnavailable(OptionKind::Projects).is_transient());
        assert!(!ApiError::NotFound("BUG-1".to_string()).is_transient());
    }
}
