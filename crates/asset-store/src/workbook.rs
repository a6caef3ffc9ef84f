//! Workbook provisioning and persistence
//!
//! A [`Workbook`] is everything the engine keeps: the asset table, the
//! material prefixes, the dropdown lists and the audit log. It is stored as
//! one JSON document.

use crate::audit::AuditLog;
use crate::dropdown::DropdownLists;
use crate::error::StoreError;
use crate::table::Table;
use asset_core::header_row;
use asset_ids::MaterialIdRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Persistent engine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Header row of the asset table
    pub header: Vec<String>,
    /// Asset rows
    pub records: Table,
    /// Material prefixes
    pub materials: MaterialIdRegistry,
    /// Non-material dropdown lists
    pub dropdowns: DropdownLists,
    /// Audit trail
    pub audit: AuditLog,
    /// Identifiers whose attention notification waits for a comment
    #[serde(default)]
    pub awaiting_comment: BTreeSet<String>,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::provision()
    }
}

impl Workbook {
    /// Fresh workbook: header row and empty dropdown lists
    #[must_use]
    pub fn provision() -> Self {
        Self {
            header: header_row(),
            records: Table::new(),
            materials: MaterialIdRegistry::new(),
            dropdowns: DropdownLists::provision(),
            audit: AuditLog::default(),
            awaiting_comment: BTreeSet::new(),
        }
    }

    /// Load from a JSON file
    ///
    /// # Errors
    /// `Io` if unreadable, `Serialization` if malformed, `SchemaMismatch`
    /// if the header row is not the expected one
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::io_error(path, e))?;
        let workbook: Self = serde_json::from_str(&text)?;
        workbook.check_header()?;
        tracing::debug!(path = %path.display(), records = workbook.records.len(), "loaded workbook");
        Ok(workbook)
    }

    /// Save to a JSON file, replacing it atomically
    ///
    /// # Errors
    /// `Serialization` or `Io`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, text).map_err(|e| StoreError::io_error(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| StoreError::io_error(path, e))?;
        tracing::debug!(path = %path.display(), records = self.records.len(), "saved workbook");
        Ok(())
    }

    /// Verify the header row matches the schema
    ///
    /// # Errors
    /// `SchemaMismatch` naming both headers
    pub fn check_header(&self) -> Result<(), StoreError> {
        let expected = header_row();
        if self.header == expected {
            Ok(())
        } else {
            Err(StoreError::SchemaMismatch {
                expected: expected.join(","),
                found: self.header.join(","),
            })
        }
    }
}
