//! Centralized error types for bugdesk.
//!
//! This module provides a unified error hierarchy for the application with
//! user-friendly error messages. All error types use `thiserror` for
//! ergonomic error handling.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;
use crate::form::FormError;

/// The main application error type.
///
/// This enum aggregates all error types that can occur in bugdesk,
/// providing user-friendly error messages while preserving the underlying
/// error context for debugging.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Repository errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Bug form submission errors.
    #[error("{0}")]
    Form(#[from] FormError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    ///
    /// This returns a message suitable for showing to users in the UI,
    /// without technical jargon or stack traces.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::NotFound(id) => {
                    format!("Bug '{}' no longer exists. Press 'r' to refresh.", id)
                }
                ApiError::OptionsUnavailable(kind) => {
                    format!("Could not load {}. The form can still be saved.", kind)
                }
                ApiError::Unavailable(_) => {
                    "The bug service is unavailable. Please try again.".to_string()
                }
            },
            AppError::Form(e) => match e {
                FormError::Validation(errors) => errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
                other => other.to_string(),
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error is critical and requires user acknowledgment.
    ///
    /// Critical errors prevent the application from starting or drawing.
    pub fn is_critical(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Terminal(_))
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors can be retried or the user can continue working.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Api(e) => e.is_transient() || matches!(e, ApiError::NotFound(_)),
            AppError::Form(_) => true,
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OptionKind;
    use crate::form::{FieldError, FormField};

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigError::NoConfigDir;
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let api_err = ApiError::NotFound("BUG-001".to_string());
        let app_err: AppError = api_err.into();
        assert!(matches!(app_err, AppError::Api(ApiError::NotFound(_))));
    }

    #[test]
    fn test_user_message_not_found() {
        let err = AppError::Api(ApiError::NotFound("BUG-123".to_string()));
        let msg = err.user_message();
        assert!(msg.contains("BUG-123"));
        assert!(msg.contains("refresh"));
    }

    #[test]
    fn test_user_message_options_unavailable() {
        let err = AppError::Api(ApiError::OptionsUnavailable(OptionKind::Users));
        let msg = err.user_message();
        assert!(msg.contains("users"));
        assert!(msg.contains("can still be saved"));
    }

    #[test]
    fn test_user_message_validation() {
        let err = AppError::Form(FormError::Validation(vec![FieldError::new(
            FormField::Title,
            "Please enter a title",
        )]));
        assert_eq!(err.user_message(), "Title: Please enter a title");
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "current_user cannot be empty".to_string(),
        ));
        assert!(err.user_message().contains("current_user cannot be empty"));
    }

    #[test]
    fn test_is_critical_config() {
        let err = AppError::Config(ConfigError::NoConfigDir);
        assert!(err.is_critical());
    }

    #[test]
    fn test_is_not_critical_api() {
        let err = AppError::Api(ApiError::Unavailable("down".to_string()));
        assert!(!err.is_critical());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AppError::Api(ApiError::Unavailable("down".to_string())).is_recoverable());
        assert!(AppError::Api(ApiError::NotFound("BUG-9".to_string())).is_recoverable());
        assert!(AppError::Form(FormError::Busy).is_recoverable());
        assert!(!AppError::terminal("broken").is_recoverable());
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("test error");
        assert!(matches!(err, AppError::Terminal(_)));
        assert_eq!(err.user_message(), "Terminal error: test error");
    }

    #[test]
    fn test_other_error() {
        let err = AppError::other("something went wrong");
        assert!(matches!(err, AppError::Other(_)));
        assert_eq!(err.user_message(), "something went wrong");
    }
}
