//! Attention notifications
//!
//! The service hands a [`NotificationPayload`] to a [`Messenger`] after the
//! status change has been committed. Delivery is best effort from the
//! record's point of view: a failure is reported, the status stays.

use crate::error::DeliveryError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Message sent when an asset enters `Requires Attention`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Asset identifier
    pub asset_id: String,
    /// Asset name
    pub asset_name: String,
    /// Link to the record's row in the shared table
    pub location: String,
    /// Why attention is needed
    pub comment: String,
    /// Addresses to notify
    pub recipients: Vec<String>,
}

impl NotificationPayload {
    /// Subject line
    #[must_use]
    pub fn subject(&self) -> String {
        format!("Attention required: {} ({})", self.asset_id, self.asset_name)
    }

    /// Plain-text body
    #[must_use]
    pub fn body(&self) -> String {
        format!(
            "Asset {} \"{}\" requires attention.\n\nComment: {}\n\nView: {}\n",
            self.asset_id, self.asset_name, self.comment, self.location
        )
    }
}

/// Proof of delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    /// Backend message id
    pub message_id: String,
    /// Recipients the message went to
    pub delivered_to: Vec<String>,
}

/// Outbound messaging
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    /// Addresses attention notifications go to
    fn recipients(&self) -> Vec<String>;

    /// Deliver one notification
    async fn send_notification(
        &self,
        payload: &NotificationPayload,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Messenger that writes notifications to the log
#[derive(Debug, Default)]
pub struct LogMessenger {
    recipients: Vec<String>,
    sent: AtomicU64,
}

impl LogMessenger {
    /// Create log messenger for a recipient list
    #[must_use]
    pub fn new(recipients: Vec<String>) -> Self {
        Self {
            recipients,
            sent: AtomicU64::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Messenger for LogMessenger {
    fn recipients(&self) -> Vec<String> {
        self.recipients.clone()
    }

    async fn send_notification(
        &self,
        payload: &NotificationPayload,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        if payload.recipients.is_empty() {
            return Err(DeliveryError::NoRecipients);
        }
        let sequence = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(
            id = %payload.asset_id,
            recipients = ?payload.recipients,
            subject = %payload.subject(),
            comment = %payload.comment,
            location = %payload.location,
            "attention notification"
        );
        Ok(DeliveryReceipt {
            message_id: format!("log-{sequence}"),
            delivered_to: payload.recipients.clone(),
        })
    }
}
