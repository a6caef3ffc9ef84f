//! Error types for asset records
//!
//! Provides [`RecordError`] for row parsing and submission validation, and
//! [`ErrorKind`], the classification every error in the workspace maps onto:
//! - Validation: a field is missing or malformed, nothing was mutated
//! - NotFound: a row reference or dropdown value does not resolve
//! - Duplicate: a dropdown value or material already exists
//! - ExternalDelivery: a notification could not be delivered
//! - Environment: storage or serialization failed underneath the engine

use crate::schema::Column;
use serde::{Deserialize, Serialize};

/// Caller-facing error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing or malformed input; rejected before mutation
    Validation,
    /// Row reference or value does not exist; do not retry blindly
    NotFound,
    /// Value already exists; rejected without mutation
    Duplicate,
    /// Notification delivery failed; originating change stands
    ExternalDelivery,
    /// Storage or serialization failure; not recoverable by the caller
    Environment,
}

impl ErrorKind {
    /// Stable lowercase name for result payloads
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::ExternalDelivery => "external_delivery",
            ErrorKind::Environment => "environment",
        }
    }
}

/// Record-level errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// Required field absent or blank
    #[error("missing required field: {0}")]
    MissingField(Column),

    /// Field present but unusable
    #[error("invalid value for {column}: {reason}")]
    InvalidField {
        /// Offending column
        column: Column,
        /// Why the value was rejected
        reason: String,
    },

    /// Column may not be written after creation
    #[error("column {0} is immutable")]
    ImmutableField(Column),

    /// Attention comment was blank
    #[error("a non-empty comment is required")]
    EmptyComment,

    /// Unknown column name
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Unknown dropdown list name
    #[error("unknown dropdown list: {0}")]
    UnknownDropdown(String),

    /// Row did not have the fixed cell count
    #[error("expected {expected} cells, found {actual}")]
    CellCount {
        /// Schema width
        expected: usize,
        /// Cells supplied
        actual: usize,
    },
}

impl RecordError {
    /// Create invalid field error
    pub fn invalid(column: Column, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            column,
            reason: reason.into(),
        }
    }

    /// Classify for the caller; record errors are always validation failures
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_field() {
        let err = RecordError::MissingField(Column::Material);
        assert_eq!(err.to_string(), "missing required field: Material");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn invalid_field_message() {
        let err = RecordError::invalid(Column::Quantity, "must be positive");
        assert_eq!(err.to_string(), "invalid value for Quantity: must be positive");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
    }
}
