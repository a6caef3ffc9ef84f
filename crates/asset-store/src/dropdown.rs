//! Dropdown lists for the forms
//!
//! Every list except `Material` lives here. Materials are backed by the
//! material id registry so that the list and the prefixes cannot drift.

use crate::error::StoreError;
use asset_core::DropdownField;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Non-material dropdown lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropdownLists {
    lists: BTreeMap<DropdownField, IndexSet<String>>,
}

impl DropdownLists {
    /// Empty lists for every non-material field
    #[must_use]
    pub fn provision() -> Self {
        let lists = DropdownField::ALL
            .into_iter()
            .filter(|f| *f != DropdownField::Material)
            .map(|f| (f, IndexSet::new()))
            .collect();
        Self { lists }
    }

    /// Values in insertion order
    #[must_use]
    pub fn list(&self, field: DropdownField) -> Vec<String> {
        self.lists
            .get(&field)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Add a value
    ///
    /// # Errors
    /// `Duplicate` if the value is already listed
    pub fn add(&mut self, field: DropdownField, value: &str) -> Result<(), StoreError> {
        let value = clean(field, value)?;
        let set = self.lists.entry(field).or_default();
        if set.contains(&value) {
            return Err(StoreError::Duplicate { field, value });
        }
        set.insert(value);
        Ok(())
    }

    /// Rename a value in place
    ///
    /// # Errors
    /// `ValueNotFound` for an unknown `old`, `Duplicate` if `new` is taken
    pub fn update(&mut self, field: DropdownField, old: &str, new: &str) -> Result<(), StoreError> {
        let new = clean(field, new)?;
        let old = old.trim();
        let set = self.lists.entry(field).or_default();
        let index = set.get_index_of(old).ok_or_else(|| StoreError::ValueNotFound {
            field,
            value: old.to_string(),
        })?;
        if old == new {
            return Ok(());
        }
        if set.contains(&new) {
            return Err(StoreError::Duplicate { field, value: new });
        }
        set.shift_remove_index(index);
        set.shift_insert(index, new);
        Ok(())
    }

    /// Remove a value
    ///
    /// # Errors
    /// `ValueNotFound` for an unknown value
    pub fn delete(&mut self, field: DropdownField, value: &str) -> Result<(), StoreError> {
        let value = value.trim();
        let removed = self
            .lists
            .get_mut(&field)
            .is_some_and(|set| set.shift_remove(value));
        if removed {
            Ok(())
        } else {
            Err(StoreError::ValueNotFound {
                field,
                value: value.to_string(),
            })
        }
    }
}

fn clean(field: DropdownField, value: &str) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::Record(asset_core::RecordError::invalid(
            dropdown_column(field),
            "dropdown value must not be empty",
        )));
    }
    Ok(value.to_string())
}

fn dropdown_column(field: DropdownField) -> asset_core::Column {
    use asset_core::Column;
    match field {
        DropdownField::Item => Column::Item,
        DropdownField::Material => Column::Material,
        DropdownField::Status => Column::Status,
        DropdownField::Venue => Column::Venue,
        DropdownField::Area => Column::Area,
        DropdownField::ProductionStatus => Column::ProductionStatus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_core::ErrorKind;

    #[test]
    fn provision_creates_empty_lists() {
        let lists = DropdownLists::provision();
        for field in DropdownField::ALL {
            assert!(lists.list(field).is_empty());
        }
    }

    #[test]
    fn add_list_and_duplicate() {
        let mut lists = DropdownLists::provision();
        lists.add(DropdownField::Venue, "Hall A").unwrap();
        lists.add(DropdownField::Venue, "Hall B").unwrap();
        assert_eq!(lists.list(DropdownField::Venue), vec!["Hall A", "Hall B"]);

        let err = lists.add(DropdownField::Venue, " Hall A ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);
    }

    #[test]
    fn update_keeps_position() {
        let mut lists = DropdownLists::provision();
        for v in ["Lobby", "Stage", "Foyer"] {
            lists.add(DropdownField::Area, v).unwrap();
        }
        lists.update(DropdownField::Area, "Stage", "Main Stage").unwrap();
        assert_eq!(lists.list(DropdownField::Area), vec!["Lobby", "Main Stage", "Foyer"]);

        assert_eq!(
            lists.update(DropdownField::Area, "Roof", "Deck").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            lists.update(DropdownField::Area, "Lobby", "Foyer").unwrap_err().kind(),
            ErrorKind::Duplicate
        );
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut lists = DropdownLists::provision();
        lists.add(DropdownField::Item, "Banner").unwrap();
        lists.delete(DropdownField::Item, "Banner").unwrap();
        assert!(lists.list(DropdownField::Item).is_empty());
        assert!(matches!(
            lists.delete(DropdownField::Item, "Banner"),
            Err(StoreError::ValueNotFound { .. })
        ));
    }

    #[test]
    fn blank_values_rejected() {
        let mut lists = DropdownLists::provision();
        assert_eq!(
            lists.add(DropdownField::Status, "  ").unwrap_err().kind(),
            ErrorKind::Validation
        );
    }
}
