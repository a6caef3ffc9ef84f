//! The record store
//!
//! [`RecordStore`] owns the table and everything derived from it. Every
//! mutation runs in three steps so that a failure never leaves partial
//! state behind:
//! 1. validate the input and resolve the row
//! 2. compute the new record, identifier and audit snapshot
//! 3. commit: registry, table, audit log, then table order

use crate::audit::AuditLog;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::dropdown::DropdownLists;
use crate::error::StoreError;
use crate::ordering::{OrderMaintainer, Reordering};
use crate::table::Table;
use crate::workbook::Workbook;
use asset_core::{
    AssetFields, AssetRecord, Column, DropdownField, RecordError, RowRef, SideEffect, Status,
    StatusStateMachine, Transition, Treatment,
};
use asset_ids::{IdentifierGenerator, MaterialIdRegistry};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Result of an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Row of the record after reordering
    pub row: RowRef,
    /// Identifier, unchanged by the edit
    pub id: String,
    /// Status before the edit
    pub previous_status: Status,
    /// Status after the edit
    pub status: Status,
    /// Treatment and side effect of the status change
    pub transition: Transition,
    /// Log id of the refreshed audit entry
    pub log_id: String,
}

impl UpdateOutcome {
    /// The edit moved the record into `Requires Attention`
    #[inline]
    #[must_use]
    pub fn requires_attention(&self) -> bool {
        self.transition.effect == SideEffect::NotifyAttention
    }
}

/// A row as handed to the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRow {
    /// Sheet row
    pub row: RowRef,
    /// The record
    pub record: AssetRecord,
    /// Derived treatment
    pub treatment: Treatment,
    /// Background colour for the treatment
    pub color: Option<String>,
}

/// Table of asset records with its registry, audit log and dropdowns
#[derive(Debug)]
pub struct RecordStore {
    table: Table,
    registry: MaterialIdRegistry,
    ids: IdentifierGenerator,
    audit: AuditLog,
    dropdowns: DropdownLists,
    awaiting_comment: BTreeSet<String>,
    order: OrderMaintainer,
    machine: StatusStateMachine,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl RecordStore {
    /// Store over a freshly provisioned workbook
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::from_workbook(Workbook::provision(), config)
    }

    /// Store over an existing workbook; the table is put back in order
    #[must_use]
    pub fn from_workbook(workbook: Workbook, config: EngineConfig) -> Self {
        let Workbook {
            records,
            materials,
            dropdowns,
            mut audit,
            awaiting_comment,
            ..
        } = workbook;
        audit.set_prefix(config.log_id_prefix.clone());
        let mut store = Self {
            table: records,
            registry: materials.with_fallback(config.fallback_prefix),
            ids: IdentifierGenerator::new().with_pad_width(config.id_pad_width),
            audit,
            dropdowns,
            awaiting_comment,
            order: OrderMaintainer::new(),
            machine: StatusStateMachine::new(),
            config,
            clock: Arc::new(SystemClock),
        };
        store.restore_order();
        store
    }

    /// Use a different time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Snapshot of the persistent state
    #[must_use]
    pub fn to_workbook(&self) -> Workbook {
        Workbook {
            records: self.table.clone(),
            materials: self.registry.clone(),
            dropdowns: self.dropdowns.clone(),
            audit: self.audit.clone(),
            awaiting_comment: self.awaiting_comment.clone(),
            ..Workbook::provision()
        }
    }

    /// Create a record from a form submission.
    ///
    /// The material gets a prefix on first use, the record gets the next
    /// identifier for that prefix and starts as `New`. Returns the row the
    /// record occupies once the table is back in order.
    ///
    /// # Errors
    /// Validation errors for missing material, asset name or quantity and
    /// registry exhaustion; nothing is mutated on error
    pub fn create(&mut self, fields: &AssetFields) -> Result<RowRef, StoreError> {
        fields.validate()?;
        let assignment = self.registry.peek(&fields.material)?;
        let id = self.ids.next(assignment.prefix, self.table.ids())?;
        let record = AssetRecord::from_fields(id, fields, Status::New);
        let snapshot = snapshot(&record.id, fields, None)?;

        if assignment.is_new {
            self.registry.assign(&fields.material)?;
        }
        let id = record.id.clone();
        let row = self.insert(record, snapshot, None);
        tracing::info!(%id, %row, material = %fields.material.trim(), "created asset");
        Ok(row)
    }

    /// Apply an edit form submission to an existing record.
    ///
    /// The identifier is kept verbatim; a status change is evaluated by the
    /// status machine and reported in the outcome.
    ///
    /// # Errors
    /// `RowNotFound` for an unknown row, validation errors for bad fields
    pub fn update(&mut self, row: RowRef, fields: &AssetFields) -> Result<UpdateOutcome, StoreError> {
        let current = self.get(row)?;
        fields.validate()?;
        let mut updated = current.clone();
        updated.apply_fields(fields);
        let snapshot = snapshot(&updated.id, fields, None)?;
        let outcome = self.commit_edit(row, updated, snapshot);
        tracing::info!(id = %outcome.id, row = %outcome.row, status = %outcome.status, "updated asset");
        Ok(outcome)
    }

    /// Apply a direct edit of one cell.
    ///
    /// # Errors
    /// `RowNotFound`, `ImmutableField` for the ID and EditMarker columns,
    /// parse errors for the cell text, and validation errors if the edit
    /// blanks a required field
    pub fn apply_cell_edit(
        &mut self,
        row: RowRef,
        column: Column,
        value: &str,
    ) -> Result<UpdateOutcome, StoreError> {
        let current = self.get(row)?;
        if matches!(column, Column::Id | Column::EditMarker) {
            return Err(RecordError::ImmutableField(column).into());
        }
        let mut updated = current.clone();
        updated.set_cell(column, value)?;
        let fields = AssetFields::from_record(&updated);
        fields.validate()?;
        let mut snapshot = snapshot(&updated.id, &fields, None)?;
        if let Value::Object(map) = &mut snapshot {
            map.insert("editedColumn".to_string(), Value::from(column.header()));
        }
        let outcome = self.commit_edit(row, updated, snapshot);
        tracing::info!(id = %outcome.id, column = %column, "cell edited");
        Ok(outcome)
    }

    /// Set only the status of a record
    ///
    /// # Errors
    /// Same as [`apply_cell_edit`](Self::apply_cell_edit)
    pub fn set_status(&mut self, row: RowRef, status: &Status) -> Result<UpdateOutcome, StoreError> {
        self.apply_cell_edit(row, Column::Status, status.label())
    }

    fn commit_edit(&mut self, row: RowRef, mut updated: AssetRecord, snapshot: Value) -> UpdateOutcome {
        let previous_status = self
            .table
            .get(row)
            .map(|r| r.status.clone())
            .unwrap_or_default();
        let transition = self.machine.transition(Some(&previous_status), &updated.status);
        let log_id = self.audit.record(row, snapshot, self.clock.now());
        updated.edit_marker.clone_from(&log_id);
        let id = updated.id.clone();
        let status = updated.status.clone();
        self.table.replace(row, updated);
        self.restore_order();
        UpdateOutcome {
            row: self.table.row_of(&id).unwrap_or(row),
            id,
            previous_status,
            status,
            transition,
            log_id,
        }
    }

    /// Append a fully built record, audit it and restore order.
    /// Returns the record's final row.
    pub(crate) fn insert(
        &mut self,
        mut record: AssetRecord,
        snapshot: Value,
        reordered_from: Option<&str>,
    ) -> RowRef {
        let row = RowRef::from_index(self.table.len());
        let now = self.clock.now();
        let log_id = match reordered_from {
            Some(source) => self.audit.record_reorder(row, snapshot, source, now),
            None => self.audit.record(row, snapshot, now),
        };
        record.edit_marker = log_id;
        let id = record.id.clone();
        self.table.append(record);
        self.restore_order();
        self.table.row_of(&id).unwrap_or(row)
    }

    /// Put the table back in display order, moving audit bindings along.
    /// `None` when the table was already ordered.
    pub fn restore_order(&mut self) -> Option<Reordering> {
        let reordering = self.order.restore(&mut self.table)?;
        self.audit.rebind(reordering.moves());
        Some(reordering)
    }

    /// Record at a row
    #[must_use]
    pub fn read(&self, row: RowRef) -> Option<&AssetRecord> {
        self.table.get(row)
    }

    /// Record at a row, or `RowNotFound`
    ///
    /// # Errors
    /// `RowNotFound` for an unknown row
    pub fn get(&self, row: RowRef) -> Result<&AssetRecord, StoreError> {
        self.table.get(row).ok_or(StoreError::RowNotFound(row))
    }

    /// Record and row for an identifier
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<(RowRef, &AssetRecord)> {
        let row = self.table.row_of(id)?;
        self.table.get(row).map(|r| (row, r))
    }

    /// Records in display order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[AssetRecord] {
        self.table.records()
    }

    /// The table
    #[inline]
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// One row with its treatment
    #[must_use]
    pub fn render(&self, row: RowRef) -> Option<RenderedRow> {
        self.table.get(row).map(|record| self.render_record(row, record))
    }

    /// Every row with its treatment, in display order
    #[must_use]
    pub fn rendered_rows(&self) -> Vec<RenderedRow> {
        self.table
            .iter()
            .map(|(row, record)| self.render_record(row, record))
            .collect()
    }

    fn render_record(&self, row: RowRef, record: &AssetRecord) -> RenderedRow {
        let treatment = StatusStateMachine::treatment(&record.status);
        RenderedRow {
            row,
            record: record.clone(),
            treatment,
            color: self.config.palette.color(treatment).map(str::to_string),
        }
    }

    /// Audit trail
    #[inline]
    #[must_use]
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Material prefixes
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &MaterialIdRegistry {
        &self.registry
    }

    /// Identifier generator
    #[inline]
    #[must_use]
    pub(crate) fn identifiers(&self) -> &IdentifierGenerator {
        &self.ids
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Hold the attention notification of `id` until a comment arrives
    pub fn hold_attention(&mut self, id: &str) {
        self.awaiting_comment.insert(id.to_string());
    }

    /// Drop a held notification; `true` if one was held
    pub fn release_attention(&mut self, id: &str) -> bool {
        self.awaiting_comment.remove(id)
    }

    /// Whether the notification of `id` waits for a comment
    #[must_use]
    pub fn is_awaiting_comment(&self, id: &str) -> bool {
        self.awaiting_comment.contains(id)
    }

    /// Identifiers with a held notification, sorted
    pub fn awaiting_comment(&self) -> impl Iterator<Item = &str> {
        self.awaiting_comment.iter().map(String::as_str)
    }

    /// Values of a dropdown list
    #[must_use]
    pub fn list_dropdown(&self, field: DropdownField) -> Vec<String> {
        match field {
            DropdownField::Material => self.registry.names(),
            _ => self.dropdowns.list(field),
        }
    }

    /// Add a dropdown value; a new material also gets its prefix letter
    ///
    /// # Errors
    /// `Duplicate` if already present
    pub fn add_dropdown(&mut self, field: DropdownField, value: &str) -> Result<(), StoreError> {
        match field {
            DropdownField::Material => {
                let prefix = self.registry.add(value)?;
                tracing::info!(material = value.trim(), %prefix, "material added");
            }
            _ => self.dropdowns.add(field, value)?,
        }
        Ok(())
    }

    /// Rename a dropdown value. Renaming a material keeps its letter and
    /// does not touch identifiers already issued.
    ///
    /// # Errors
    /// `ValueNotFound`/`NotFound` for an unknown value, `Duplicate` if the
    /// new value exists
    pub fn update_dropdown(
        &mut self,
        field: DropdownField,
        old: &str,
        new: &str,
    ) -> Result<(), StoreError> {
        match field {
            DropdownField::Material => {
                self.registry.rename(old, new)?;
            }
            _ => self.dropdowns.update(field, old, new)?,
        }
        tracing::info!(%field, old, new, "dropdown value renamed");
        Ok(())
    }

    /// Delete a dropdown value. Issued identifiers are untouched.
    ///
    /// # Errors
    /// `ValueNotFound`/`NotFound` for an unknown value
    pub fn delete_dropdown(&mut self, field: DropdownField, value: &str) -> Result<(), StoreError> {
        match field {
            DropdownField::Material => {
                self.registry.delete(value)?;
            }
            _ => self.dropdowns.delete(field, value)?,
        }
        tracing::info!(%field, value, "dropdown value deleted");
        Ok(())
    }
}

/// Audit snapshot: the submitted fields plus the identifier
pub(crate) fn snapshot(
    id: &str,
    fields: &AssetFields,
    reordered_from: Option<&str>,
) -> Result<Value, StoreError> {
    let mut value = serde_json::to_value(fields)?;
    if let Value::Object(map) = &mut value {
        map.insert("id".to_string(), Value::from(id));
        if let Some(source) = reordered_from {
            map.insert("reorderedFrom".to_string(), Value::from(source));
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_core::{ErrorKind, Highlight};
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn store() -> RecordStore {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        RecordStore::new(EngineConfig::new()).with_clock(Arc::new(FixedClock(now)))
    }

    fn fields(name: &str, material: &str) -> AssetFields {
        AssetFields {
            asset_name: name.to_string(),
            material: material.to_string(),
            quantity: Some(1),
            ..AssetFields::default()
        }
    }

    fn ids(store: &RecordStore) -> Vec<&str> {
        store.table().ids().collect()
    }

    #[test]
    fn identifiers_follow_material_prefixes() {
        let mut store = store();
        let a01 = store.create(&fields("Banner", "Vinyl")).unwrap();
        assert_eq!(store.read(a01).unwrap().id, "A01");
        let a02 = store.create(&fields("Flag", "Vinyl")).unwrap();
        assert_eq!(store.read(a02).unwrap().id, "A02");
        let b01 = store.create(&fields("Sign", "Foamcore")).unwrap();
        assert_eq!(store.read(b01).unwrap().id, "B01");
    }

    #[test]
    fn create_defaults_to_new_and_audits() {
        let mut store = store();
        let row = store.create(&fields("Banner", "Vinyl")).unwrap();
        let record = store.read(row).unwrap();
        assert_eq!(record.status, Status::New);

        let entry = store.audit().entry_for(row).unwrap();
        assert_eq!(entry.snapshot["id"], "A01");
        assert_eq!(entry.snapshot["assetName"], "Banner");
        assert_eq!(record.edit_marker, entry.log_id);
    }

    #[test]
    fn create_ignores_submitted_status() {
        let mut store = store();
        let mut submitted = fields("Banner", "Vinyl");
        submitted.status = Some(Status::Delivered);
        let row = store.create(&submitted).unwrap();
        assert_eq!(store.read(row).unwrap().status, Status::New);
    }

    #[test]
    fn invalid_create_mutates_nothing() {
        let mut store = store();
        let err = store.create(&fields("Banner", "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("Material"));

        let mut no_quantity = fields("Banner", "Vinyl");
        no_quantity.quantity = None;
        assert!(store.create(&no_quantity).is_err());

        assert!(store.records().is_empty());
        assert!(store.registry().is_empty());
        assert!(store.audit().is_empty());
    }

    #[test]
    fn update_preserves_id_and_single_audit_entry() {
        let mut store = store();
        let row = store.create(&fields("Banner", "Vinyl")).unwrap();

        let mut edit = fields("Banner v2", "Vinyl");
        edit.status = Some(Status::InProgress);
        let outcome = store.update(row, &edit).unwrap();
        assert_eq!(outcome.id, "A01");
        assert_eq!(outcome.previous_status, Status::New);

        let mut edit = fields("Banner v3", "Foamcore");
        edit.status = Some(Status::Approved);
        let outcome = store.update(outcome.row, &edit).unwrap();

        let record = store.read(outcome.row).unwrap();
        assert_eq!(record.id, "A01");
        assert_eq!(record.material, "Foamcore");
        assert_eq!(store.audit().len(), 1);
        assert_eq!(store.audit().entry_for(outcome.row).unwrap().snapshot["assetName"], "Banner v3");
    }

    #[test]
    fn update_unknown_row_is_not_found() {
        let mut store = store();
        let err = store.update(RowRef::new(2), &fields("Banner", "Vinyl")).unwrap_err();
        assert!(matches!(err, StoreError::RowNotFound(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(store.records().is_empty());
    }

    #[test]
    fn update_into_attention_reports_effect() {
        let mut store = store();
        let row = store.create(&fields("Banner", "Vinyl")).unwrap();
        let mut edit = fields("Banner", "Vinyl");
        edit.status = Some(Status::RequiresAttention);
        let outcome = store.update(row, &edit).unwrap();
        assert!(outcome.requires_attention());

        let again = store.update(outcome.row, &edit).unwrap();
        assert!(!again.requires_attention());
        assert_eq!(again.status, Status::RequiresAttention);
    }

    #[test]
    fn new_rows_stay_pinned_above_others() {
        let mut store = store();
        let a01 = store.create(&fields("one", "Vinyl")).unwrap();
        store.set_status(a01, &Status::Approved).unwrap();
        store.create(&fields("two", "Vinyl")).unwrap();
        store.create(&fields("three", "Foamcore")).unwrap();
        assert_eq!(ids(&store), vec!["A02", "B01", "A01"]);

        let (row, _) = store.find_by_id("A02").unwrap();
        store.set_status(row, &Status::Delivered).unwrap();
        assert_eq!(ids(&store), vec!["B01", "A01", "A02"]);
        assert!(store.restore_order().is_none());
    }

    #[test]
    fn audit_entries_follow_moved_rows() {
        let mut store = store();
        let first = store.create(&fields("one", "Vinyl")).unwrap();
        store.set_status(first, &Status::Approved).unwrap();
        store.create(&fields("two", "Vinyl")).unwrap();

        for (row, record) in store.table().iter() {
            let entry = store.audit().entry_for(row).unwrap();
            assert_eq!(entry.snapshot["id"], record.id.as_str());
            assert_eq!(entry.log_id, record.edit_marker);
        }
    }

    #[test]
    fn cell_edit_rules() {
        let mut store = store();
        let row = store.create(&fields("Banner", "Vinyl")).unwrap();

        let err = store.apply_cell_edit(row, Column::Id, "Q01").unwrap_err();
        assert!(matches!(err, StoreError::Record(RecordError::ImmutableField(Column::Id))));

        let err = store.apply_cell_edit(row, Column::Asset, "  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = store.apply_cell_edit(row, Column::Quantity, "many").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.read(row).unwrap().quantity, 1);

        let outcome = store.apply_cell_edit(row, Column::Quantity, "12").unwrap();
        assert_eq!(store.read(outcome.row).unwrap().quantity, 12);
        assert_eq!(
            store.audit().entry_for(outcome.row).unwrap().snapshot["editedColumn"],
            "Quantity"
        );
    }

    #[test]
    fn rendered_rows_carry_treatment() {
        let mut store = store();
        let row = store.create(&fields("Banner", "Vinyl")).unwrap();
        let rendered = store.render(row).unwrap();
        assert_eq!(rendered.treatment, Treatment::Highlight(Highlight::A));
        assert_eq!(rendered.color.as_deref(), Some("#d9ead3"));

        let outcome = store.set_status(row, &Status::Approved).unwrap();
        let rendered = store.render(outcome.row).unwrap();
        assert_eq!(rendered.treatment, Treatment::Plain);
        assert_eq!(rendered.color, None);
    }

    #[test]
    fn material_dropdown_is_the_registry() {
        let mut store = store();
        store.add_dropdown(DropdownField::Material, "Vinyl").unwrap();
        store.add_dropdown(DropdownField::Material, "Foamcore").unwrap();
        assert_eq!(store.list_dropdown(DropdownField::Material), vec!["Vinyl", "Foamcore"]);

        let row = store.create(&fields("Sign", "Foamcore")).unwrap();
        assert_eq!(store.read(row).unwrap().id, "B01");

        store.update_dropdown(DropdownField::Material, "Foamcore", "Gatorboard").unwrap();
        assert_eq!(store.read(row).unwrap().id, "B01");
        assert_eq!(store.registry().letter_of("Gatorboard"), Some('B'));

        store.delete_dropdown(DropdownField::Material, "Gatorboard").unwrap();
        let err = store.delete_dropdown(DropdownField::Material, "Gatorboard").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // B was the highest letter, so it is handed out again; the
        // sequence continues after the existing B01
        let row = store.create(&fields("Post", "Coroplast")).unwrap();
        assert_eq!(store.read(row).unwrap().id, "B02");
    }

    #[test]
    fn workbook_roundtrip_restores_state() {
        let mut store = store();
        store.create(&fields("Banner", "Vinyl")).unwrap();
        store.add_dropdown(DropdownField::Venue, "Hall A").unwrap();

        let reopened = RecordStore::from_workbook(store.to_workbook(), EngineConfig::new());
        assert_eq!(reopened.records(), store.records());
        assert_eq!(reopened.list_dropdown(DropdownField::Venue), vec!["Hall A"]);
        assert_eq!(reopened.registry().letter_of("Vinyl"), Some('A'));
        assert_eq!(reopened.audit().len(), 1);
    }

    #[test]
    fn exhausted_sequence_rejects_create_and_reorder() {
        let mut workbook = Workbook::provision();
        workbook.materials.assign("Vinyl").unwrap();
        workbook
            .records
            .append(AssetRecord::from_fields("A4294967295", &fields("Banner", "Vinyl"), Status::New));
        let mut store = RecordStore::from_workbook(workbook, EngineConfig::new());

        let err = store.create(&fields("Flag", "Vinyl")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Registry(asset_ids::RegistryError::SequenceExhausted('A'))
        ));
        let err = store.reorder(RowRef::new(2), 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(ids(&store), vec!["A4294967295"]);
        assert_eq!(store.audit().len(), 0);

        let row = store.create(&fields("Sign", "Foamcore")).unwrap();
        assert_eq!(store.read(row).unwrap().id, "B01");
    }

    #[test]
    fn held_attention_survives_workbook_round_trip() {
        let mut store = store();
        store.create(&fields("Banner", "Vinyl")).unwrap();
        store.hold_attention("A01");

        let mut reopened = RecordStore::from_workbook(store.to_workbook(), EngineConfig::new());
        assert!(reopened.is_awaiting_comment("A01"));
        assert!(reopened.release_attention("A01"));
        assert!(!reopened.release_attention("A01"));
        assert_eq!(reopened.awaiting_comment().count(), 0);
    }
}
