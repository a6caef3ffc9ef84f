//! Audit trail of submitted records
//!
//! The log keeps the last submitted state per row, not a full history: a
//! second submission for the same row overwrites the first entry. Entries
//! follow their record when the order maintainer moves rows.

use crate::ordering::RowMove;
use asset_core::RowRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_prefix() -> String {
    "LOG".to_string()
}

/// One audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// `<prefix>-<millis>-<row>`; may collide within one millisecond
    pub log_id: String,
    /// Row the entry is bound to
    pub row_ref: RowRef,
    /// Submission time
    pub timestamp: DateTime<Utc>,
    /// Submitted field set
    pub snapshot: serde_json::Value,
    /// Source identifier when the record was created by reordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reordered_from: Option<String>,
}

/// Per-row audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(default = "default_prefix")]
    prefix: String,
    entries: Vec<AuditLogEntry>,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(default_prefix())
    }
}

impl AuditLog {
    /// Create empty log with a log id prefix
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
        }
    }

    /// Change the prefix used for future log ids
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Log id for a submission at `now` on `row`
    #[must_use]
    pub fn make_log_id(&self, now: DateTime<Utc>, row: RowRef) -> String {
        format!("{}-{}-{}", self.prefix, now.timestamp_millis(), row)
    }

    /// Record a submission for `row`, overwriting its current entry or
    /// appending when the row has none. Returns the fresh log id.
    pub fn record(&mut self, row: RowRef, snapshot: serde_json::Value, now: DateTime<Utc>) -> String {
        self.write(row, snapshot, None, now)
    }

    /// Record a record created by reordering `source_id`
    pub fn record_reorder(
        &mut self,
        row: RowRef,
        snapshot: serde_json::Value,
        source_id: &str,
        now: DateTime<Utc>,
    ) -> String {
        self.write(row, snapshot, Some(source_id.to_string()), now)
    }

    fn write(
        &mut self,
        row: RowRef,
        snapshot: serde_json::Value,
        reordered_from: Option<String>,
        now: DateTime<Utc>,
    ) -> String {
        let log_id = self.make_log_id(now, row);
        let entry = AuditLogEntry {
            log_id: log_id.clone(),
            row_ref: row,
            timestamp: now,
            snapshot,
            reordered_from,
        };
        match self.entries.iter_mut().find(|e| e.row_ref == row) {
            Some(existing) => {
                // a reorder clone keeps its lineage across later edits
                let lineage = existing.reordered_from.take();
                *existing = entry;
                if existing.reordered_from.is_none() {
                    existing.reordered_from = lineage;
                }
                tracing::debug!(%row, log_id = %log_id, "audit entry updated");
            }
            None => {
                self.entries.push(entry);
                tracing::debug!(%row, log_id = %log_id, "audit entry appended");
            }
        }
        log_id
    }

    /// Move row bindings along with their records
    pub fn rebind(&mut self, moves: &[RowMove]) {
        if moves.is_empty() {
            return;
        }
        let map: HashMap<RowRef, RowRef> = moves.iter().map(|m| (m.from, m.to)).collect();
        for entry in &mut self.entries {
            if let Some(&to) = map.get(&entry.row_ref) {
                entry.row_ref = to;
            }
        }
    }

    /// Current entry for a row
    #[must_use]
    pub fn entry_for(&self, row: RowRef) -> Option<&AuditLogEntry> {
        self.entries.iter().find(|e| e.row_ref == row)
    }

    /// All entries in first-submission order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn first_record_appends() {
        let mut log = AuditLog::new("LOG");
        let id = log.record(RowRef::new(2), json!({"assetName": "Banner"}), at(1_000));
        assert_eq!(id, "LOG-1000-2");
        assert_eq!(log.len(), 1);
        assert_eq!(log.entry_for(RowRef::new(2)).unwrap().log_id, id);
    }

    #[test]
    fn resubmission_overwrites_in_place() {
        let mut log = AuditLog::new("LOG");
        log.record(RowRef::new(2), json!({"v": 1}), at(1_000));
        log.record(RowRef::new(3), json!({"v": 9}), at(1_500));
        let id = log.record(RowRef::new(2), json!({"v": 2}), at(2_000));

        assert_eq!(log.len(), 2);
        let entry = log.entry_for(RowRef::new(2)).unwrap();
        assert_eq!(entry.log_id, id);
        assert_eq!(entry.snapshot, json!({"v": 2}));
        assert_eq!(entry.timestamp, at(2_000));
        assert_eq!(log.entries()[0].row_ref, RowRef::new(2));
    }

    #[test]
    fn reorder_entry_keeps_lineage_across_edits() {
        let mut log = AuditLog::new("LOG");
        log.record_reorder(RowRef::new(2), json!({}), "A02", at(1_000));
        log.record(RowRef::new(2), json!({"quantity": 4}), at(2_000));
        let entry = log.entry_for(RowRef::new(2)).unwrap();
        assert_eq!(entry.reordered_from.as_deref(), Some("A02"));
    }

    #[test]
    fn rebind_follows_moves() {
        let mut log = AuditLog::new("LOG");
        log.record(RowRef::new(2), json!({"id": "A01"}), at(1_000));
        log.record(RowRef::new(3), json!({"id": "A02"}), at(1_000));
        log.rebind(&[
            RowMove { from: RowRef::new(2), to: RowRef::new(3) },
            RowMove { from: RowRef::new(3), to: RowRef::new(2) },
        ]);
        assert_eq!(log.entry_for(RowRef::new(3)).unwrap().snapshot, json!({"id": "A01"}));
        assert_eq!(log.entry_for(RowRef::new(2)).unwrap().snapshot, json!({"id": "A02"}));
    }

    #[test]
    fn same_millisecond_same_row_collides() {
        let log = AuditLog::new("LOG");
        assert_eq!(
            log.make_log_id(at(5), RowRef::new(2)),
            log.make_log_id(at(5), RowRef::new(2))
        );
    }
}
