//! Display order maintenance
//!
//! The table is kept in one order: every `New` record first, in the relative
//! order they already occupy, then every other record ascending by
//! identifier under ordinal string comparison. Two-digit padding keeps
//! ordinal and numeric order aligned within a prefix up to 99.

use crate::table::Table;
use asset_core::{AssetRecord, RowRef};

/// One record changing rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMove {
    /// Row before reordering
    pub from: RowRef,
    /// Row after reordering
    pub to: RowRef,
}

/// Rows moved by one reordering pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reordering {
    moves: Vec<RowMove>,
}

impl Reordering {
    /// Moved rows, in destination order
    #[inline]
    #[must_use]
    pub fn moves(&self) -> &[RowMove] {
        &self.moves
    }
}

/// Restores the display invariant after a mutation
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderMaintainer;

impl OrderMaintainer {
    /// Create order maintainer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Target order: position `i` should hold the record now at `plan[i]`
    #[must_use]
    pub fn plan(records: &[AssetRecord]) -> Vec<usize> {
        let (pinned, mut rest): (Vec<usize>, Vec<usize>) =
            (0..records.len()).partition(|&i| records[i].status.is_new());
        rest.sort_by(|&a, &b| records[a].id.cmp(&records[b].id));
        pinned.into_iter().chain(rest).collect()
    }

    /// Whether the records already satisfy the invariant
    #[must_use]
    pub fn is_ordered(records: &[AssetRecord]) -> bool {
        Self::plan(records).iter().enumerate().all(|(i, &j)| i == j)
    }

    /// Reorder the table if needed.
    ///
    /// Returns `None` and leaves the table untouched when it is already in
    /// order, so running this twice in a row never changes anything the
    /// second time.
    pub fn restore(&self, table: &mut Table) -> Option<Reordering> {
        let plan = Self::plan(table.records());
        let moves: Vec<RowMove> = plan
            .iter()
            .enumerate()
            .filter(|(to, from)| to != *from)
            .map(|(to, &from)| RowMove {
                from: RowRef::from_index(from),
                to: RowRef::from_index(to),
            })
            .collect();
        if moves.is_empty() {
            return None;
        }
        table.permute(&plan);
        tracing::debug!(moved = moves.len(), "restored table order");
        Some(Reordering { moves })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_core::{AssetFields, Status};
    use proptest::prelude::*;

    fn record(id: &str, status: Status) -> AssetRecord {
        let fields = AssetFields {
            asset_name: format!("asset {id}"),
            material: "Vinyl".to_string(),
            quantity: Some(1),
            ..AssetFields::default()
        };
        AssetRecord::from_fields(id, &fields, status)
    }

    fn ids(table: &Table) -> Vec<&str> {
        table.ids().collect()
    }

    #[test]
    fn new_records_pinned_first_in_current_order() {
        let mut table = Table::from_records(vec![
            record("B01", Status::Approved),
            record("A03", Status::New),
            record("A01", Status::Delivered),
            record("A02", Status::New),
        ]);
        let reordering = OrderMaintainer::new().restore(&mut table).unwrap();
        assert_eq!(ids(&table), vec!["A03", "A02", "A01", "B01"]);
        let moved_to = |from: u32| {
            reordering
                .moves()
                .iter()
                .find(|m| m.from == RowRef::new(from))
                .map(|m| m.to)
        };
        assert_eq!(moved_to(2), Some(RowRef::new(5)));
        assert_eq!(moved_to(3), Some(RowRef::new(2)));
    }

    #[test]
    fn ordinal_not_numeric_comparison() {
        let mut table = Table::from_records(vec![
            record("A100", Status::Approved),
            record("A99", Status::Approved),
            record("A02", Status::Approved),
        ]);
        OrderMaintainer::new().restore(&mut table);
        assert_eq!(ids(&table), vec!["A02", "A100", "A99"]);
    }

    #[test]
    fn already_ordered_is_noop() {
        let mut table = Table::from_records(vec![
            record("C01", Status::New),
            record("A01", Status::InProgress),
            record("B01", Status::OnHold),
        ]);
        assert!(OrderMaintainer::is_ordered(table.records()));
        assert!(OrderMaintainer::new().restore(&mut table).is_none());
    }

    #[test]
    fn custom_status_is_not_pinned() {
        let mut table = Table::from_records(vec![
            record("B01", Status::Custom("Newish".into())),
            record("A01", Status::Approved),
        ]);
        OrderMaintainer::new().restore(&mut table);
        assert_eq!(ids(&table), vec!["A01", "B01"]);
    }

    fn status_strategy() -> impl Strategy<Value = Status> {
        prop_oneof![
            Just(Status::New),
            Just(Status::InProgress),
            Just(Status::Delivered),
            Just(Status::RequiresAttention),
        ]
    }

    proptest! {
        #[test]
        fn prop_restore_is_idempotent_and_partitions(
            rows in proptest::collection::vec(
                (prop_oneof![Just('A'), Just('B'), Just('C')], 1u32..120, status_strategy()),
                0..30,
            )
        ) {
            let records: Vec<AssetRecord> = rows
                .iter()
                .map(|(p, n, s)| record(&format!("{p}{n:02}"), s.clone()))
                .collect();
            let mut table = Table::from_records(records);
            let maintainer = OrderMaintainer::new();

            maintainer.restore(&mut table);
            let once = table.clone();
            prop_assert!(maintainer.restore(&mut table).is_none());
            prop_assert_eq!(&once, &table);

            let records = table.records();
            let first_plain = records.iter().position(|r| !r.status.is_new()).unwrap_or(records.len());
            prop_assert!(records[first_plain..].iter().all(|r| !r.status.is_new()));
            for pair in records[first_plain..].windows(2) {
                prop_assert!(pair[0].id <= pair[1].id);
            }
        }
    }
}
