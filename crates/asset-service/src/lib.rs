//! Asset Service
//!
//! Async facade over the record store, used by the forms, the table
//! edit hook and the `assetctl` binary.
//!
//! # Core Concepts
//!
//! - [`AssetService`]: Serialized entry point for every operation
//! - [`OperationResult`]: `{ success, message, ...payload }` returned by all of them
//! - [`Messenger`]: Outbound attention notifications
//!
//! # Example
//!
//! ```rust
//! use asset_core::AssetFields;
//! use asset_service::{AssetService, LogMessenger};
//! use asset_store::{EngineConfig, RecordStore};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let service = AssetService::new(
//!     RecordStore::new(EngineConfig::new()),
//!     Arc::new(LogMessenger::new(vec!["ops@example.com".into()])),
//! );
//! let fields = AssetFields {
//!     asset_name: "Banner".into(),
//!     material: "Vinyl".into(),
//!     quantity: Some(2),
//!     ..AssetFields::default()
//! };
//! let result = service.submit_new(fields).await;
//! assert!(result.success);
//! assert_eq!(result.payload.unwrap().id, "A01");
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod messaging;
mod response;
mod service;

// Re-exports
pub use error::{DeliveryError, ServiceError};
pub use messaging::{DeliveryReceipt, LogMessenger, Messenger, NotificationPayload};
pub use response::{
    AssetList, CreatedAsset, DropdownValues, EditedAsset, NotificationStatus, OperationResult,
    ReorderedAsset,
};
pub use service::AssetService;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
