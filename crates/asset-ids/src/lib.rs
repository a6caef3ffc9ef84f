//! Asset Identifiers
//!
//! Prefix letters per material and sequence numbers per prefix.
//!
//! # Overview
//!
//! - **MaterialIdRegistry**: material name → single uppercase letter
//! - **IdentifierGenerator**: prefix → next unused `A01`-style identifier
//!
//! # Example
//!
//! ```rust
//! use asset_ids::{IdentifierGenerator, MaterialIdRegistry};
//!
//! let mut registry = MaterialIdRegistry::new();
//! let prefix = registry.assign("Vinyl").unwrap();
//!
//! let existing = ["A01", "A02"];
//! let id = IdentifierGenerator::new().next(prefix, existing.iter().copied()).unwrap();
//! assert_eq!(id, "A03");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod identifier;
pub mod material;

// Re-exports
pub use error::RegistryError;
pub use identifier::{parse_identifier, IdentifierGenerator, DEFAULT_PAD_WIDTH};
pub use material::{Assignment, MaterialIdRegistry, DEFAULT_FALLBACK_PREFIX};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
