//! Structured operation results
//!
//! Every service operation answers with an [`OperationResult`]: a success
//! flag, a human-readable message, an error kind on failure, and the
//! operation's payload flattened alongside.

use crate::error::ServiceError;
use asset_core::{DropdownField, ErrorKind, RowRef, Status, Treatment};
use asset_store::RenderedRow;
use serde::Serialize;

/// Result object returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult<T> {
    /// Whether the operation fully succeeded
    pub success: bool,
    /// Message for the user
    pub message: String,
    /// Failure classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Operation payload
    #[serde(flatten)]
    pub payload: Option<T>,
}

impl<T> OperationResult<T> {
    /// Successful result
    pub fn ok(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_kind: None,
            payload: Some(payload),
        }
    }

    /// Failed result without payload
    #[must_use]
    pub fn failure(error: &ServiceError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            error_kind: Some(error.kind()),
            payload: None,
        }
    }

    /// Failed result that still carries a payload, for operations whose
    /// mutation committed before a later step failed
    pub fn partial(error: &ServiceError, message: impl Into<String>, payload: T) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_kind: Some(error.kind()),
            payload: Some(payload),
        }
    }
}

impl<T> From<ServiceError> for OperationResult<T> {
    fn from(error: ServiceError) -> Self {
        Self::failure(&error)
    }
}

/// State of the attention notification for an edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum NotificationStatus {
    /// The edit did not enter `Requires Attention`
    NotRequired,
    /// Entered `Requires Attention` without a comment; nothing sent yet
    AwaitingComment,
    /// Delivered
    #[serde(rename_all = "camelCase")]
    Sent {
        /// Backend message id
        message_id: String,
    },
    /// Delivery failed; the status change stands
    Failed {
        /// Delivery error
        reason: String,
    },
}

/// Payload of `submit_new`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAsset {
    /// Row after ordering
    pub row: RowRef,
    /// Assigned identifier
    pub id: String,
}

/// Payload of edits and attention comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditedAsset {
    /// Row after ordering
    pub row: RowRef,
    /// Identifier
    pub id: String,
    /// Status before the edit
    pub previous_status: Status,
    /// Status after the edit
    pub status: Status,
    /// Row treatment for the new status
    pub treatment: Treatment,
    /// Attention notification outcome
    pub notification: NotificationStatus,
}

/// Payload of `reorder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderedAsset {
    /// Row of the new record
    pub row: RowRef,
    /// Identifier of the new record
    pub id: String,
    /// Identifier it was copied from
    pub source_id: String,
}

/// Payload of `list`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetList {
    /// Rows in display order
    pub rows: Vec<RenderedRow>,
}

/// Payload of the dropdown operations: the list after the operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownValues {
    /// List
    pub field: DropdownField,
    /// Values in order
    pub values: Vec<String>,
}
