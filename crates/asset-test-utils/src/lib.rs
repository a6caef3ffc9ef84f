//! Testing utilities for the asset tracker workspace
//!
//! Shared fixtures, a fixed clock and fake messengers.

#![allow(missing_docs)]

use asset_core::AssetFields;
use asset_service::{AssetService, DeliveryError, DeliveryReceipt, Messenger, NotificationPayload};
use asset_store::{Clock, EngineConfig, RecordStore};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};

pub const TEST_SHEET_URL: &str = "https://sheets.example.com/d/assets";
pub const TEST_RECIPIENT: &str = "production@example.com";

pub fn sample_fields(name: &str, material: &str) -> AssetFields {
    AssetFields {
        asset_name: name.to_string(),
        material: material.to_string(),
        quantity: Some(1),
        ..AssetFields::default()
    }
}

pub fn sample_fields_with_quantity(name: &str, material: &str, quantity: u32) -> AssetFields {
    AssetFields {
        quantity: Some(quantity),
        ..sample_fields(name, material)
    }
}

/// Clock fixed at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn at_millis(millis: i64) -> Self {
        let now = Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now);
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

pub fn setup_test_store() -> RecordStore {
    let config = EngineConfig::new().with_sheet_url(TEST_SHEET_URL);
    RecordStore::new(config).with_clock(Arc::new(FixedClock::at_millis(1_700_000_000_000)))
}

pub fn setup_test_service(messenger: Arc<dyn Messenger>) -> AssetService {
    AssetService::new(setup_test_store(), messenger)
}

/// Messenger that keeps every payload it is given
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<NotificationPayload>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<NotificationPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Messenger for RecordingMessenger {
    fn recipients(&self) -> Vec<String> {
        vec![TEST_RECIPIENT.to_string()]
    }

    async fn send_notification(
        &self,
        payload: &NotificationPayload,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(payload.clone());
        Ok(DeliveryReceipt {
            message_id: format!("rec-{}", sent.len()),
            delivered_to: payload.recipients.clone(),
        })
    }
}

/// Messenger whose backend is always down; keeps the attempted payloads
#[derive(Debug, Default)]
pub struct FailingMessenger {
    attempts: Mutex<Vec<NotificationPayload>>,
}

impl FailingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> Vec<NotificationPayload> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Messenger for FailingMessenger {
    fn recipients(&self) -> Vec<String> {
        vec![TEST_RECIPIENT.to_string()]
    }

    async fn send_notification(
        &self,
        payload: &NotificationPayload,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        self.attempts.lock().unwrap().push(payload.clone());
        Err(DeliveryError::Unavailable("mail relay unreachable".to_string()))
    }
}
