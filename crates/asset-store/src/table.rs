//! The shared asset table
//!
//! Provides [`Table`], the ordered rows addressed by [`RowRef`].

use asset_core::{header_row, AssetRecord, RowRef};
use serde::{Deserialize, Serialize};

/// Ordered asset rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<AssetRecord>,
}

impl Table {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Table over existing records, kept in the given order
    #[inline]
    #[must_use]
    pub fn from_records(rows: Vec<AssetRecord>) -> Self {
        Self { rows }
    }

    /// Record at a row
    #[must_use]
    pub fn get(&self, row: RowRef) -> Option<&AssetRecord> {
        row.index().and_then(|i| self.rows.get(i))
    }

    /// Mutable record at a row
    pub fn get_mut(&mut self, row: RowRef) -> Option<&mut AssetRecord> {
        row.index().and_then(move |i| self.rows.get_mut(i))
    }

    /// Replace the record at a row, returning the old one
    pub fn replace(&mut self, row: RowRef, record: AssetRecord) -> Option<AssetRecord> {
        self.get_mut(row).map(|slot| std::mem::replace(slot, record))
    }

    /// Append a record below the last row
    pub fn append(&mut self, record: AssetRecord) -> RowRef {
        self.rows.push(record);
        RowRef::from_index(self.rows.len() - 1)
    }

    /// Row currently holding `id`
    #[must_use]
    pub fn row_of(&self, id: &str) -> Option<RowRef> {
        self.rows.iter().position(|r| r.id == id).map(RowRef::from_index)
    }

    /// Every identifier in table order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.id.as_str())
    }

    /// `(row, record)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (RowRef, &AssetRecord)> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, r)| (RowRef::from_index(i), r))
    }

    /// Records in table order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[AssetRecord] {
        &self.rows
    }

    /// Rearrange rows so that position `i` holds the record previously at
    /// `order[i]`. `order` must be a permutation of `0..len`.
    pub(crate) fn permute(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.rows.len());
        let mut taken: Vec<Option<AssetRecord>> = self.rows.drain(..).map(Some).collect();
        self.rows = order.iter().filter_map(|&i| taken[i].take()).collect();
    }

    /// Header plus one row of cells per record
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        std::iter::once(header_row())
            .chain(self.rows.iter().map(AssetRecord::to_cells))
            .collect()
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// No records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_core::{AssetFields, Status, COLUMN_COUNT};

    fn record(id: &str) -> AssetRecord {
        let fields = AssetFields {
            asset_name: format!("asset {id}"),
            material: "Vinyl".to_string(),
            quantity: Some(1),
            ..AssetFields::default()
        };
        AssetRecord::from_fields(id, &fields, Status::Approved)
    }

    #[test]
    fn append_returns_sheet_row() {
        let mut table = Table::new();
        assert_eq!(table.append(record("A01")), RowRef::new(2));
        assert_eq!(table.append(record("A02")), RowRef::new(3));
        assert_eq!(table.get(RowRef::new(3)).unwrap().id, "A02");
        assert!(table.get(RowRef::new(1)).is_none());
        assert!(table.get(RowRef::new(4)).is_none());
    }

    #[test]
    fn row_of_finds_current_position() {
        let table = Table::from_records(vec![record("B01"), record("A01")]);
        assert_eq!(table.row_of("A01"), Some(RowRef::new(3)));
        assert_eq!(table.row_of("C01"), None);
    }

    #[test]
    fn permute_moves_records() {
        let mut table = Table::from_records(vec![record("C01"), record("A01"), record("B01")]);
        table.permute(&[1, 2, 0]);
        let ids: Vec<&str> = table.ids().collect();
        assert_eq!(ids, vec!["A01", "B01", "C01"]);
    }

    #[test]
    fn rows_start_with_header() {
        let table = Table::from_records(vec![record("A01")]);
        let rows = table.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "ID");
        assert_eq!(rows[1].len(), COLUMN_COUNT);
        assert_eq!(rows[1][0], "A01");
    }
}
