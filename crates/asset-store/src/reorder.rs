//! Reordering: a new record linked to an existing one
//!
//! A reorder copies the source record under a fresh identifier with the same
//! prefix letter. The copy starts as `New`, is named after the source and
//! carries the source identifier in its audit entry.

use crate::error::StoreError;
use crate::store::{snapshot, RecordStore};
use asset_core::{AssetFields, AssetRecord, Column, RecordError, RowRef, Status};
use asset_ids::parse_identifier;

/// Result of a reorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderOutcome {
    /// Row of the new record after ordering
    pub row: RowRef,
    /// Identifier of the new record
    pub id: String,
    /// Identifier it was copied from
    pub source_id: String,
}

/// Clones records into linked reorders
#[derive(Debug, Clone, Copy, Default)]
pub struct ReorderService;

impl ReorderService {
    /// Create reorder service
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reorder the record at `source` with a new quantity
    ///
    /// # Errors
    /// `InvalidField` for a zero quantity, `RowNotFound` for an unknown row,
    /// `SequenceExhausted` when the prefix has no numbers left
    pub fn reorder(
        &self,
        store: &mut RecordStore,
        source: RowRef,
        quantity: u32,
    ) -> Result<ReorderOutcome, StoreError> {
        if quantity == 0 {
            return Err(RecordError::invalid(Column::Quantity, "must be positive").into());
        }
        let original = store.get(source)?;
        let source_id = original.id.clone();

        let prefix = parse_identifier(&source_id)
            .map_or_else(|| store.registry().prefix_of(&original.material), |(p, _)| p);
        let id = store.identifiers().next(prefix, store.table().ids())?;

        let fields = AssetFields {
            asset_name: format!("{} - {}", source_id, original.asset_name),
            status: Some(Status::New),
            quantity: Some(quantity),
            production_status: String::new(),
            ..AssetFields::from_record(original)
        };
        fields.validate()?;
        let record = AssetRecord::from_fields(id.clone(), &fields, Status::New);
        let snapshot = snapshot(&id, &fields, Some(&source_id))?;

        let row = store.insert(record, snapshot, Some(&source_id));
        tracing::info!(%id, source = %source_id, quantity, %row, "reordered asset");
        Ok(ReorderOutcome { row, id, source_id })
    }
}

impl RecordStore {
    /// Reorder the record at `source`; see [`ReorderService::reorder`]
    ///
    /// # Errors
    /// As [`ReorderService::reorder`]
    pub fn reorder(&mut self, source: RowRef, quantity: u32) -> Result<ReorderOutcome, StoreError> {
        ReorderService::new().reorder(self, source, quantity)
    }
}
