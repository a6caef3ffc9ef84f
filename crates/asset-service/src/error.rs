//! Error types for the asset service

use asset_core::{ErrorKind, RecordError};
use asset_store::StoreError;

/// Notification delivery errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// Nobody to notify
    #[error("no notification recipients configured")]
    NoRecipients,

    /// Messaging backend refused the message
    #[error("delivery to {recipient} rejected: {reason}")]
    Rejected {
        /// Recipient that failed
        recipient: String,
        /// Backend reason
        reason: String,
    },

    /// Messaging backend unreachable
    #[error("messaging unavailable: {0}")]
    Unavailable(String),
}

/// Asset service errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Store rejected the operation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Input rejected before reaching the store
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Notification could not be delivered
    #[error("notification not delivered: {0}")]
    Delivery(#[from] DeliveryError),

    /// Attention comment sent for a record not in `Requires Attention`
    #[error("asset {id} is not awaiting attention")]
    NotAwaitingAttention {
        /// Asset identifier
        id: String,
    },
}

impl ServiceError {
    /// Classify for the caller
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(e) => e.kind(),
            Self::Record(e) => e.kind(),
            Self::Delivery(_) => ErrorKind::ExternalDelivery,
            Self::NotAwaitingAttention { .. } => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_core::RowRef;

    #[test]
    fn kinds_pass_through() {
        let err = ServiceError::from(StoreError::RowNotFound(RowRef::new(3)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "no record at row 3");

        let err = ServiceError::from(DeliveryError::Unavailable("smtp down".into()));
        assert_eq!(err.kind(), ErrorKind::ExternalDelivery);
        assert_eq!(err.to_string(), "notification not delivered: messaging unavailable: smtp down");

        assert_eq!(ServiceError::from(RecordError::EmptyComment).kind(), ErrorKind::Validation);
    }
}
