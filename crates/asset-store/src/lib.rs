//! Asset Store
//!
//! The asset table and everything kept alongside it.
//!
//! # Core Concepts
//!
//! - [`RecordStore`]: Create, edit and read records; owns the table
//! - [`OrderMaintainer`]: `New` rows first, the rest ascending by identifier
//! - [`AuditLog`]: Last submitted snapshot per row
//! - [`ReorderService`]: Linked copies of existing records
//! - [`DropdownLists`]: Form dropdown values
//! - [`Workbook`]: Persistent state as one JSON document
//! - [`EngineConfig`]: TOML configuration
//!
//! # Example
//!
//! ```rust
//! use asset_core::{AssetFields, Status};
//! use asset_store::{EngineConfig, RecordStore};
//!
//! let mut store = RecordStore::new(EngineConfig::new());
//! let fields = AssetFields {
//!     asset_name: "Banner".to_string(),
//!     material: "Vinyl".to_string(),
//!     quantity: Some(1),
//!     ..AssetFields::default()
//! };
//! let row = store.create(&fields).unwrap();
//! assert_eq!(store.read(row).unwrap().id, "A01");
//!
//! let reorder = store.reorder(row, 3).unwrap();
//! assert_eq!(reorder.id, "A02");
//! assert_eq!(store.read(reorder.row).unwrap().status, Status::New);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod audit;
mod clock;
mod config;
mod dropdown;
mod error;
mod ordering;
mod reorder;
mod store;
mod table;
mod workbook;

// Re-exports
pub use audit::{AuditLog, AuditLogEntry};
pub use clock::{Clock, SystemClock};
pub use config::{EngineConfig, Palette};
pub use dropdown::DropdownLists;
pub use error::{ConfigError, StoreError};
pub use ordering::{OrderMaintainer, Reordering, RowMove};
pub use reorder::{ReorderOutcome, ReorderService};
pub use store::{RecordStore, RenderedRow, UpdateOutcome};
pub use table::Table;
pub use workbook::Workbook;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
