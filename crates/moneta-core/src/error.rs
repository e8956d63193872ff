//! Error types for moneta-core

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Book not loaded from a backing file
    NotLoaded,
    /// Category not found
    CategoryNotFound,
    /// Category is not owned by the user
    CategoryNotOwned,
    /// Category is referenced by transactions
    CategoryInUse,
    /// Category still has child categories
    CategoryHasChildren,
    /// A category with the same name, kind and parent already exists
    DuplicateCategory,
    /// Parent category missing or of the wrong kind
    InvalidParent,
    /// Validation error
    ValidationError,
    /// Data file parse error
    ParseError,
    /// IO error
    IoError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::CategoryNotFound => write!(f, "CATEGORY_NOT_FOUND"),
            ErrorCode::CategoryNotOwned => write!(f, "CATEGORY_NOT_OWNED"),
            ErrorCode::CategoryInUse => write!(f, "CATEGORY_IN_USE"),
            ErrorCode::CategoryHasChildren => write!(f, "CATEGORY_HAS_CHILDREN"),
            ErrorCode::DuplicateCategory => write!(f, "DUPLICATE_CATEGORY"),
            ErrorCode::InvalidParent => write!(f, "INVALID_PARENT"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for moneta-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Book not loaded")]
    NotLoaded,

    #[error("Category not found")]
    CategoryNotFound { id: u64 },

    #[error("Category \"{name}\" is global and cannot be deleted")]
    CategoryNotOwned { name: String },

    #[error("Category \"{name}\" still has transactions attached to it. Reassign them before deleting it.")]
    CategoryInUse { name: String },

    #[error("Category \"{name}\" still has subcategories. Delete them first.")]
    CategoryHasChildren { name: String },

    #[error("A category with this name already exists")]
    DuplicateCategory { name: String },

    #[error("Invalid parent category: {reason}")]
    InvalidParent { reason: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Data file parse error: {message}")]
    ParseError { message: String },

    #[error("IO error occurred")]
    IoError,

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::CategoryNotFound { .. } => ErrorCode::CategoryNotFound,
            CoreError::CategoryNotOwned { .. } => ErrorCode::CategoryNotOwned,
            CoreError::CategoryInUse { .. } => ErrorCode::CategoryInUse,
            CoreError::CategoryHasChildren { .. } => ErrorCode::CategoryHasChildren,
            CoreError::DuplicateCategory { .. } => ErrorCode::DuplicateCategory,
            CoreError::InvalidParent { .. } => ErrorCode::InvalidParent,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::IoError => ErrorCode::IoError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Warning,
            CoreError::CategoryNotFound { .. } => ErrorSeverity::Info,
            CoreError::CategoryNotOwned { .. } => ErrorSeverity::Info,
            CoreError::CategoryInUse { .. } => ErrorSeverity::Info,
            CoreError::CategoryHasChildren { .. } => ErrorSeverity::Info,
            CoreError::DuplicateCategory { .. } => ErrorSeverity::Info,
            CoreError::InvalidParent { .. } => ErrorSeverity::Warning,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::ParseError { .. } => ErrorSeverity::Error,
            CoreError::IoError => ErrorSeverity::Error,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Log the error at a level matching its severity
    pub fn log(&self, operation: &str) {
        match self.severity() {
            ErrorSeverity::Info => {
                log::info!(target: "moneta::error", "[{}] {} - Operation: {}", self.code(), self, operation)
            }
            ErrorSeverity::Warning => {
                log::warn!(target: "moneta::error", "[{}] {} - Operation: {}", self.code(), self, operation)
            }
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                log::error!(target: "moneta::error", "[{}] {} - Operation: {}", self.code(), self, operation)
            }
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(_error: io::Error) -> Self {
        CoreError::IoError
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::CategoryNotFound.to_string(), "CATEGORY_NOT_FOUND");
        assert_eq!(ErrorCode::CategoryInUse.to_string(), "CATEGORY_IN_USE");
        assert_eq!(ErrorCode::ParseError.to_string(), "PARSE_ERROR");
    }

    #[test]
    fn test_error_severity_display() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_core_error_code() {
        let error = CoreError::CategoryNotFound { id: 12 };
        assert_eq!(error.code(), ErrorCode::CategoryNotFound);

        let error = CoreError::CategoryNotOwned { name: "Food".to_string() };
        assert_eq!(error.code(), ErrorCode::CategoryNotOwned);
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(CoreError::NotLoaded.severity(), ErrorSeverity::Warning);
        assert_eq!(
            CoreError::ParseError { message: "bad json".to_string() }.severity(),
            ErrorSeverity::Error
        );
        assert_eq!(CoreError::IoError.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_user_facing_messages_name_the_category() {
        let error = CoreError::CategoryInUse { name: "Groceries".to_string() };
        assert!(error.to_string().contains("Groceries"));

        let error = CoreError::CategoryNotOwned { name: "Salary".to_string() };
        assert!(error.to_string().contains("Salary"));
    }
}
