//! Table schema
//!
//! Provides [`Column`] for the fixed 18-column row layout and
//! [`DropdownField`] for the managed dropdown lists.

use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Number of cells in every asset row
pub const COLUMN_COUNT: usize = 18;

/// One column of the asset table, in sheet order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    /// Stable record identifier (`A01`)
    Id,
    /// Area of the venue
    Area,
    /// Asset name
    Asset,
    /// Workflow status
    Status,
    /// Derived `W" x H"` string
    Dimensions,
    /// Number of pieces
    Quantity,
    /// Item kind
    Item,
    /// Material (drives the identifier prefix)
    Material,
    /// Due date
    DueDate,
    /// Strike date
    StrikeDate,
    /// Venue
    Venue,
    /// Location within the venue
    Location,
    /// Artwork link
    Artwork,
    /// Image link
    ImageLink,
    /// Printed on both sides
    DoubleSided,
    /// Die cut
    Diecut,
    /// Production status
    ProductionStatus,
    /// Log id of the latest audit entry for the row
    EditMarker,
}

impl Column {
    /// All columns in sheet order
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Id,
        Column::Area,
        Column::Asset,
        Column::Status,
        Column::Dimensions,
        Column::Quantity,
        Column::Item,
        Column::Material,
        Column::DueDate,
        Column::StrikeDate,
        Column::Venue,
        Column::Location,
        Column::Artwork,
        Column::ImageLink,
        Column::DoubleSided,
        Column::Diecut,
        Column::ProductionStatus,
        Column::EditMarker,
    ];

    /// Header label as written by provisioning
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Area => "Area",
            Column::Asset => "Asset",
            Column::Status => "Status",
            Column::Dimensions => "Dimensions",
            Column::Quantity => "Quantity",
            Column::Item => "Item",
            Column::Material => "Material",
            Column::DueDate => "DueDate",
            Column::StrikeDate => "StrikeDate",
            Column::Venue => "Venue",
            Column::Location => "Location",
            Column::Artwork => "Artwork",
            Column::ImageLink => "ImageLink",
            Column::DoubleSided => "DoubleSided",
            Column::Diecut => "Diecut",
            Column::ProductionStatus => "ProductionStatus",
            Column::EditMarker => "EditMarker",
        }
    }

    /// Zero-based cell index
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column at a zero-based cell index
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|c| normalize(c.header()) == wanted)
            .ok_or_else(|| RecordError::UnknownColumn(s.to_string()))
    }
}

/// Header row written by provisioning
#[must_use]
pub fn header_row() -> Vec<String> {
    Column::ALL.iter().map(|c| c.header().to_string()).collect()
}

/// Dropdown lists managed for the forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DropdownField {
    /// Item kinds
    Item,
    /// Materials, backed by the material id registry
    Material,
    /// Status values
    Status,
    /// Venues
    Venue,
    /// Areas
    Area,
    /// Production status values
    ProductionStatus,
}

impl DropdownField {
    /// All lists created by provisioning
    pub const ALL: [DropdownField; 6] = [
        DropdownField::Item,
        DropdownField::Material,
        DropdownField::Status,
        DropdownField::Venue,
        DropdownField::Area,
        DropdownField::ProductionStatus,
    ];

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DropdownField::Item => "Item",
            DropdownField::Material => "Material",
            DropdownField::Status => "Status",
            DropdownField::Venue => "Venue",
            DropdownField::Area => "Area",
            DropdownField::ProductionStatus => "ProductionStatus",
        }
    }
}

impl Display for DropdownField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DropdownField {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|d| normalize(d.label()) == wanted)
            .ok_or_else(|| RecordError::UnknownDropdown(s.to_string()))
    }
}

// "Production Status", "production_status" and "ProductionStatus" all match
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_has_eighteen_columns_in_order() {
        let header = header_row();
        assert_eq!(header.len(), COLUMN_COUNT);
        assert_eq!(header[0], "ID");
        assert_eq!(header[3], "Status");
        assert_eq!(header[17], "EditMarker");
    }

    #[test]
    fn column_index_roundtrip() {
        for (i, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), i);
            assert_eq!(Column::from_index(i), Some(*column));
        }
        assert_eq!(Column::from_index(COLUMN_COUNT), None);
    }

    #[test]
    fn column_parse_is_lenient() {
        assert_eq!("image link".parse::<Column>().unwrap(), Column::ImageLink);
        assert_eq!("due_date".parse::<Column>().unwrap(), Column::DueDate);
        assert!("Colour".parse::<Column>().is_err());
    }

    #[test]
    fn dropdown_parse() {
        assert_eq!(
            "Production Status".parse::<DropdownField>().unwrap(),
            DropdownField::ProductionStatus
        );
        assert!(matches!(
            "Vendor".parse::<DropdownField>(),
            Err(RecordError::UnknownDropdown(_))
        ));
    }
}
