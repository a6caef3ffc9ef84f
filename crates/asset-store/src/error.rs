//! Error types for the record store
//!
//! Provides error handling for:
//! - Submission validation (missing or malformed fields)
//! - Row and dropdown lookups
//! - Material registry conflicts
//! - Workbook and configuration files

use asset_core::{DropdownField, ErrorKind, RecordError, RowRef};
use asset_ids::RegistryError;
use std::path::PathBuf;

/// Record store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Field validation failed; nothing was mutated
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Material registry rejected the change
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Row reference does not resolve to a record
    #[error("no record at row {0}")]
    RowNotFound(RowRef),

    /// Dropdown value does not exist
    #[error("{field} value not found: {value}")]
    ValueNotFound {
        /// List searched
        field: DropdownField,
        /// Missing value
        value: String,
    },

    /// Dropdown value already exists
    #[error("{field} value already exists: {value}")]
    Duplicate {
        /// List written
        field: DropdownField,
        /// Existing value
        value: String,
    },

    /// Snapshot or workbook (de)serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored header row differs from the schema
    #[error("header mismatch: expected [{expected}], found [{found}]")]
    SchemaMismatch {
        /// Schema header
        expected: String,
        /// Stored header
        found: String,
    },

    /// Workbook file could not be read or written
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify for the caller
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Record(e) => e.kind(),
            Self::Registry(e) => e.kind(),
            Self::RowNotFound(_) | Self::ValueNotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::Serialization(_) | Self::SchemaMismatch { .. } | Self::Io { .. } => {
                ErrorKind::Environment
            }
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`EngineConfig`](crate::EngineConfig)
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed but semantically wrong
    #[error("invalid config value for {key}: {reason}")]
    Invalid {
        /// Offending key
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_core::Column;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            StoreError::from(RecordError::MissingField(Column::Asset)).kind(),
            ErrorKind::Validation
        );
        assert_eq!(StoreError::RowNotFound(RowRef::new(9)).kind(), ErrorKind::NotFound);
        assert_eq!(
            StoreError::from(RegistryError::Duplicate("Vinyl".into())).kind(),
            ErrorKind::Duplicate
        );
        assert_eq!(
            StoreError::Duplicate {
                field: DropdownField::Venue,
                value: "Hall A".into()
            }
            .kind(),
            ErrorKind::Duplicate
        );
    }

    #[test]
    fn messages_name_the_subject() {
        let err = StoreError::ValueNotFound {
            field: DropdownField::Area,
            value: "Lobby".into(),
        };
        assert_eq!(err.to_string(), "Area value not found: Lobby");
        assert_eq!(StoreError::RowNotFound(RowRef::new(4)).to_string(), "no record at row 4");
    }
}
