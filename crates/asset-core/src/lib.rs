//! Asset Core
//!
//! Record schema and status rules for the signage asset tracker.
//!
//! # Core Concepts
//!
//! - [`AssetRecord`]: One row of the shared asset table
//! - [`AssetFields`]: Values submitted by the add/edit forms
//! - [`RowRef`]: Positional handle into the table
//! - [`Column`]: The fixed 18-column row schema
//! - [`StatusStateMachine`]: Status → display treatment and side effect
//! - [`RecordError`] / [`ErrorKind`]: Error taxonomy shared by the workspace
//!
//! # Example
//!
//! ```rust
//! use asset_core::{AssetFields, AssetRecord, Status, StatusStateMachine, Treatment, Highlight};
//!
//! let fields = AssetFields {
//!     asset_name: "Banner".to_string(),
//!     material: "Vinyl".to_string(),
//!     quantity: Some(2),
//!     ..AssetFields::default()
//! };
//! fields.validate().unwrap();
//!
//! let record = AssetRecord::from_fields("A01", &fields, Status::New);
//! assert_eq!(
//!     StatusStateMachine::treatment(&record.status),
//!     Treatment::Highlight(Highlight::A)
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod record;
pub mod schema;
pub mod status;

// Re-exports
pub use error::{ErrorKind, RecordError};
pub use record::{AssetFields, AssetRecord, Dimensions, RowRef};
pub use schema::{header_row, Column, DropdownField, COLUMN_COUNT};
pub use status::{
    AttentionComment, Highlight, SideEffect, Status, StatusStateMachine, Transition, Treatment,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
