//! Asset records
//!
//! Provides [`AssetRecord`] (one table row), [`AssetFields`] (a form
//! submission), [`RowRef`] (positional handle) and [`Dimensions`].

use crate::error::RecordError;
use crate::schema::{Column, COLUMN_COUNT};
use crate::status::Status;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Positional handle into the table
///
/// Numbered like sheet rows: row 1 is the header, the first record sits at
/// row 2. Stable across edits; invalidated when the order maintainer moves
/// the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowRef(u32);

impl RowRef {
    /// Sheet row of the first record
    pub const FIRST_DATA_ROW: u32 = 2;

    /// Wrap a sheet row number
    #[inline]
    #[must_use]
    pub fn new(row: u32) -> Self {
        Self(row)
    }

    /// Row reference for a zero-based record index
    #[inline]
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        let index = u32::try_from(index).unwrap_or(u32::MAX - Self::FIRST_DATA_ROW);
        Self(index + Self::FIRST_DATA_ROW)
    }

    /// Zero-based record index, `None` for the header or below
    #[inline]
    #[must_use]
    pub fn index(self) -> Option<usize> {
        self.0
            .checked_sub(Self::FIRST_DATA_ROW)
            .and_then(|i| usize::try_from(i).ok())
    }

    /// Sheet row number
    #[inline]
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Display for RowRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static DIMENSIONS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(\d+(?:\.\d+)?)\s*"?\s*[xX×]\s*(\d+(?:\.\d+)?)\s*"?\s*$"#)
        .expect("dimensions pattern is valid")
});

/// Width and height in inches, rendered as `W" x H"`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dimensions {
    /// Width in inches
    pub width: f64,
    /// Height in inches
    pub height: f64,
}

impl Dimensions {
    /// Create dimensions
    ///
    /// # Errors
    /// Rejects negative or non-finite values
    pub fn new(width: f64, height: f64) -> Result<Self, RecordError> {
        for value in [width, height] {
            if !value.is_finite() || value < 0.0 {
                return Err(RecordError::invalid(
                    Column::Dimensions,
                    format!("{value} is not a size"),
                ));
            }
        }
        Ok(Self { width, height })
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}\" x {}\"", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DIMENSIONS_RE
            .captures(s)
            .ok_or_else(|| RecordError::invalid(Column::Dimensions, format!("cannot read '{s}'")))?;
        let parse = |i: usize| -> Result<f64, RecordError> {
            caps[i]
                .parse::<f64>()
                .map_err(|e| RecordError::invalid(Column::Dimensions, e.to_string()))
        };
        Self::new(parse(1)?, parse(2)?)
    }
}

impl TryFrom<String> for Dimensions {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dimensions> for String {
    fn from(value: Dimensions) -> Self {
        value.to_string()
    }
}

/// Fields submitted by the add/edit forms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetFields {
    /// Area
    pub area: String,
    /// Asset name (required)
    pub asset_name: String,
    /// Status; ignored on create
    pub status: Option<Status>,
    /// Width in inches
    pub width: Option<f64>,
    /// Height in inches
    pub height: Option<f64>,
    /// Quantity (required, positive)
    pub quantity: Option<u32>,
    /// Item
    pub item: String,
    /// Material (required)
    pub material: String,
    /// Due date
    pub due_date: Option<NaiveDate>,
    /// Strike date
    pub strike_date: Option<NaiveDate>,
    /// Venue
    pub venue: String,
    /// Location
    pub location: String,
    /// Artwork link
    pub artwork_ref: String,
    /// Image link
    pub image_ref: String,
    /// Double sided
    pub double_sided: bool,
    /// Die cut
    pub die_cut: bool,
    /// Production status
    pub production_status: String,
    /// Comment for the attention notification
    pub comment: Option<String>,
}

impl AssetFields {
    /// Check required fields and value ranges
    ///
    /// # Errors
    /// `MissingField` for material, asset name or quantity; `InvalidField`
    /// for a zero quantity or half-specified dimensions
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.material.trim().is_empty() {
            return Err(RecordError::MissingField(Column::Material));
        }
        if self.asset_name.trim().is_empty() {
            return Err(RecordError::MissingField(Column::Asset));
        }
        match self.quantity {
            None => return Err(RecordError::MissingField(Column::Quantity)),
            Some(0) => return Err(RecordError::invalid(Column::Quantity, "must be positive")),
            Some(_) => {}
        }
        self.dimensions().map(|_| ())
    }

    /// Derived dimensions
    ///
    /// # Errors
    /// `InvalidField` when only one side is given or a side is negative
    pub fn dimensions(&self) -> Result<Option<Dimensions>, RecordError> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Dimensions::new(w, h).map(Some),
            (None, None) => Ok(None),
            _ => Err(RecordError::invalid(
                Column::Dimensions,
                "width and height must be given together",
            )),
        }
    }

    /// Form values for an existing record (edit form prefill)
    #[must_use]
    pub fn from_record(record: &AssetRecord) -> Self {
        Self {
            area: record.area.clone(),
            asset_name: record.asset_name.clone(),
            status: Some(record.status.clone()),
            width: record.dimensions.map(|d| d.width),
            height: record.dimensions.map(|d| d.height),
            quantity: Some(record.quantity),
            item: record.item.clone(),
            material: record.material.clone(),
            due_date: record.due_date,
            strike_date: record.strike_date,
            venue: record.venue.clone(),
            location: record.location.clone(),
            artwork_ref: record.artwork_ref.clone(),
            image_ref: record.image_ref.clone(),
            double_sided: record.double_sided,
            die_cut: record.die_cut,
            production_status: record.production_status.clone(),
            comment: None,
        }
    }
}

/// One row of the asset table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Identifier, immutable once assigned
    pub id: String,
    /// Area
    pub area: String,
    /// Asset name
    pub asset_name: String,
    /// Status
    pub status: Status,
    /// Derived dimensions
    pub dimensions: Option<Dimensions>,
    /// Quantity
    pub quantity: u32,
    /// Item
    pub item: String,
    /// Material
    pub material: String,
    /// Due date
    pub due_date: Option<NaiveDate>,
    /// Strike date
    pub strike_date: Option<NaiveDate>,
    /// Venue
    pub venue: String,
    /// Location
    pub location: String,
    /// Artwork link
    pub artwork_ref: String,
    /// Image link
    pub image_ref: String,
    /// Double sided
    pub double_sided: bool,
    /// Die cut
    pub die_cut: bool,
    /// Production status
    pub production_status: String,
    /// Log id of the latest audit entry
    pub edit_marker: String,
}

impl AssetRecord {
    /// Build a record from validated fields
    ///
    /// Call [`AssetFields::validate`] first; a missing quantity becomes 1.
    #[must_use]
    pub fn from_fields(id: impl Into<String>, fields: &AssetFields, status: Status) -> Self {
        Self {
            id: id.into(),
            area: fields.area.trim().to_string(),
            asset_name: fields.asset_name.trim().to_string(),
            status,
            dimensions: fields.dimensions().ok().flatten(),
            quantity: fields.quantity.unwrap_or(1),
            item: fields.item.trim().to_string(),
            material: fields.material.trim().to_string(),
            due_date: fields.due_date,
            strike_date: fields.strike_date,
            venue: fields.venue.trim().to_string(),
            location: fields.location.trim().to_string(),
            artwork_ref: fields.artwork_ref.trim().to_string(),
            image_ref: fields.image_ref.trim().to_string(),
            double_sided: fields.double_sided,
            die_cut: fields.die_cut,
            production_status: fields.production_status.trim().to_string(),
            edit_marker: String::new(),
        }
    }

    /// Overwrite editable fields; `id` and `edit_marker` are kept
    pub fn apply_fields(&mut self, fields: &AssetFields) {
        let status = fields.status.clone().unwrap_or_else(|| self.status.clone());
        let id = std::mem::take(&mut self.id);
        let marker = std::mem::take(&mut self.edit_marker);
        *self = Self::from_fields(id, fields, status);
        self.edit_marker = marker;
    }

    /// Identifier prefix letter
    #[must_use]
    pub fn prefix(&self) -> Option<char> {
        self.id.chars().next()
    }

    /// Render one cell
    #[must_use]
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Id => self.id.clone(),
            Column::Area => self.area.clone(),
            Column::Asset => self.asset_name.clone(),
            Column::Status => self.status.label().to_string(),
            Column::Dimensions => self.dimensions.map(|d| d.to_string()).unwrap_or_default(),
            Column::Quantity => self.quantity.to_string(),
            Column::Item => self.item.clone(),
            Column::Material => self.material.clone(),
            Column::DueDate => format_date(self.due_date),
            Column::StrikeDate => format_date(self.strike_date),
            Column::Venue => self.venue.clone(),
            Column::Location => self.location.clone(),
            Column::Artwork => self.artwork_ref.clone(),
            Column::ImageLink => self.image_ref.clone(),
            Column::DoubleSided => format_flag(self.double_sided),
            Column::Diecut => format_flag(self.die_cut),
            Column::ProductionStatus => self.production_status.clone(),
            Column::EditMarker => self.edit_marker.clone(),
        }
    }

    /// Write one cell from its sheet text
    ///
    /// # Errors
    /// `ImmutableField` for the ID column; `InvalidField` when the text does
    /// not parse for the column's type
    pub fn set_cell(&mut self, column: Column, value: &str) -> Result<(), RecordError> {
        let text = value.trim().to_string();
        match column {
            Column::Id => return Err(RecordError::ImmutableField(Column::Id)),
            Column::Area => self.area = text,
            Column::Asset => self.asset_name = text,
            Column::Status => self.status = Status::parse(&text),
            Column::Dimensions => {
                self.dimensions = if text.is_empty() { None } else { Some(text.parse()?) };
            }
            Column::Quantity => self.quantity = parse_quantity(&text)?,
            Column::Item => self.item = text,
            Column::Material => self.material = text,
            Column::DueDate => self.due_date = parse_date(Column::DueDate, &text)?,
            Column::StrikeDate => self.strike_date = parse_date(Column::StrikeDate, &text)?,
            Column::Venue => self.venue = text,
            Column::Location => self.location = text,
            Column::Artwork => self.artwork_ref = text,
            Column::ImageLink => self.image_ref = text,
            Column::DoubleSided => self.double_sided = parse_flag(Column::DoubleSided, &text)?,
            Column::Diecut => self.die_cut = parse_flag(Column::Diecut, &text)?,
            Column::ProductionStatus => self.production_status = text,
            Column::EditMarker => self.edit_marker = text,
        }
        Ok(())
    }

    /// Render the full row
    #[must_use]
    pub fn to_cells(&self) -> Vec<String> {
        Column::ALL.iter().map(|c| self.cell(*c)).collect()
    }

    /// Parse a full row
    ///
    /// # Errors
    /// `CellCount` for the wrong width, `MissingField` for a blank ID, or
    /// any cell parse error
    pub fn from_cells(cells: &[String]) -> Result<Self, RecordError> {
        if cells.len() != COLUMN_COUNT {
            return Err(RecordError::CellCount {
                expected: COLUMN_COUNT,
                actual: cells.len(),
            });
        }
        let id = cells[Column::Id.index()].trim();
        if id.is_empty() {
            return Err(RecordError::MissingField(Column::Id));
        }
        let mut record = Self::from_fields(id, &AssetFields::default(), Status::New);
        for column in Column::ALL.into_iter().skip(1) {
            record.set_cell(column, &cells[column.index()])?;
        }
        Ok(record)
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn format_flag(flag: bool) -> String {
    String::from(if flag { "Yes" } else { "No" })
}

fn parse_quantity(text: &str) -> Result<u32, RecordError> {
    match text.parse::<u32>() {
        Ok(0) => Err(RecordError::invalid(Column::Quantity, "must be positive")),
        Ok(n) => Ok(n),
        Err(e) => Err(RecordError::invalid(Column::Quantity, e.to_string())),
    }
}

fn parse_date(column: Column, text: &str) -> Result<Option<NaiveDate>, RecordError> {
    if text.is_empty() {
        return Ok(None);
    }
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(Some)
        .ok_or_else(|| RecordError::invalid(column, format!("'{text}' is not a date")))
}

fn parse_flag(column: Column, text: &str) -> Result<bool, RecordError> {
    match text.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" | "" => Ok(false),
        _ => Err(RecordError::invalid(column, format!("'{text}' is not yes/no"))),
    }
}
