//! Compilation errors
//!
//! Every error is local to one request's compilation and belongs to the
//! client-error category. The transport layer renders them through
//! [`ErrorResponse`].

use serde::Serialize;
use thiserror::Error;

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileError>;

/// Compilation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Filter text is not a well-formed filter object
    #[error("Invalid filter syntax: {0}")]
    InvalidFilterSyntax(String),

    /// Path segment matches neither a relationship nor a field, or the path
    /// ends on a relationship
    #[error("Invalid field path '{path}': {reason}")]
    InvalidFieldPath { path: String, reason: String },

    /// Unknown operator, or document-only operator on a non-document field
    #[error("Unsupported operator '{operator}' for field '{field}': {reason}")]
    UnsupportedOperator {
        field: String,
        operator: String,
        reason: String,
    },

    /// Operand shape does not match the operator
    #[error("Invalid operand for operator '{operator}' on field '{field}': {reason}")]
    InvalidOperand {
        field: String,
        operator: String,
        reason: String,
    },

    /// Sort path cannot be resolved
    #[error("Invalid sort field '{path}': {reason}")]
    InvalidSortField { path: String, reason: String },
}

impl CompileError {
    pub(crate) fn unsupported(
        field: impl Into<String>,
        operator: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CompileError::UnsupportedOperator {
            field: field.into(),
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_operand(
        field: impl Into<String>,
        operator: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CompileError::InvalidOperand {
            field: field.into(),
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::InvalidFilterSyntax(_) => "QUERY_INVALID_FILTER_SYNTAX",
            CompileError::InvalidFieldPath { .. } => "QUERY_INVALID_FIELD_PATH",
            CompileError::UnsupportedOperator { .. } => "QUERY_UNSUPPORTED_OPERATOR",
            CompileError::InvalidOperand { .. } => "QUERY_INVALID_OPERAND",
            CompileError::InvalidSortField { .. } => "QUERY_INVALID_SORT_FIELD",
        }
    }

    /// HTTP status category. Always a client error.
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Offending field path, where one exists
    pub fn field(&self) -> Option<&str> {
        match self {
            CompileError::InvalidFilterSyntax(_) => None,
            CompileError::InvalidFieldPath { path, .. } => Some(path),
            CompileError::UnsupportedOperator { field, .. } => Some(field),
            CompileError::InvalidOperand { field, .. } => Some(field),
            CompileError::InvalidSortField { path, .. } => Some(path),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
}

impl From<&CompileError> for ErrorResponse {
    fn from(err: &CompileError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
            status: err.status_code(),
        }
    }
}

impl From<CompileError> for ErrorResponse {
    fn from(err: CompileError) -> Self {
        Self::from(&err)
    }
}
