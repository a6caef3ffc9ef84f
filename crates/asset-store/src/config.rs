//! Engine configuration
//!
//! [`EngineConfig`] is plain data with defaults for every key, so a TOML
//! file only needs the keys it changes:
//!
//! ```toml
//! fallback_prefix = "Z"
//! sheet_url = "https://sheets.example.com/d/abc123"
//!
//! [palette]
//! attention = "#ea9999"
//! ```

use crate::error::ConfigError;
use asset_core::{Highlight, Treatment};
use asset_ids::{DEFAULT_FALLBACK_PREFIX, DEFAULT_PAD_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix reported for materials with no assigned letter
    pub fallback_prefix: char,
    /// Zero-padding width of identifier sequence numbers
    pub id_pad_width: usize,
    /// Leading segment of audit log ids
    pub log_id_prefix: String,
    /// Base URL of the shared table, used for notification links
    pub sheet_url: String,
    /// Row colours per highlight slot
    pub palette: Palette,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With sheet URL
    #[inline]
    #[must_use]
    pub fn with_sheet_url(mut self, url: impl Into<String>) -> Self {
        self.sheet_url = url.into();
        self
    }

    /// With fallback prefix
    #[inline]
    #[must_use]
    pub fn with_fallback_prefix(mut self, prefix: char) -> Self {
        self.fallback_prefix = prefix;
        self
    }

    /// With log id prefix
    #[inline]
    #[must_use]
    pub fn with_log_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_id_prefix = prefix.into();
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed TOML, `ConfigError::Invalid` for
    /// values that parse but cannot be used
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, plus the errors of
    /// [`from_toml_str`](Self::from_toml_str)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check semantic constraints
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first bad key
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fallback_prefix.is_ascii_uppercase() {
            return Err(ConfigError::Invalid {
                key: "fallback_prefix",
                reason: format!("'{}' is not an uppercase letter", self.fallback_prefix),
            });
        }
        if self.id_pad_width == 0 {
            return Err(ConfigError::Invalid {
                key: "id_pad_width",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.log_id_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "log_id_prefix",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Link to a row of the shared table
    #[must_use]
    pub fn row_link(&self, row: asset_core::RowRef) -> String {
        if self.sheet_url.is_empty() {
            format!("row {row}")
        } else {
            format!("{}#row={row}", self.sheet_url.trim_end_matches('#'))
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_prefix: DEFAULT_FALLBACK_PREFIX,
            id_pad_width: DEFAULT_PAD_WIDTH,
            log_id_prefix: "LOG".to_string(),
            sheet_url: String::new(),
            palette: Palette::default(),
        }
    }
}

/// Background colours for highlighted rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Slot A: new rows
    pub new: String,
    /// Slot B: rows requiring attention
    pub attention: String,
    /// Slot C: delivered rows
    pub delivered: String,
    /// Slot D: rows on hold
    pub on_hold: String,
}

impl Palette {
    /// Colour for a treatment, `None` for plain rows
    #[must_use]
    pub fn color(&self, treatment: Treatment) -> Option<&str> {
        match treatment {
            Treatment::Plain => None,
            Treatment::Highlight(Highlight::A) => Some(self.new.as_str()),
            Treatment::Highlight(Highlight::B) => Some(self.attention.as_str()),
            Treatment::Highlight(Highlight::C) => Some(self.delivered.as_str()),
            Treatment::Highlight(Highlight::D) => Some(self.on_hold.as_str()),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            new: "#d9ead3".to_string(),
            attention: "#f4cccc".to_string(),
            delivered: "#cfe2f3".to_string(),
            on_hold: "#fff2cc".to_string(),
        }
    }
}
