//! Identifier generation
//!
//! Identifiers are a prefix letter followed by a zero-padded sequence number
//! (`A01`, `B12`, `A100`). The next number for a prefix is one past the
//! highest number currently used by that prefix in the table.

use crate::error::RegistryError;

/// Default zero-padding width of the sequence number
pub const DEFAULT_PAD_WIDTH: usize = 2;

/// Split an identifier into prefix letter and sequence number
///
/// Returns `None` when the suffix is not a plain number.
#[must_use]
pub fn parse_identifier(id: &str) -> Option<(char, u32)> {
    let mut chars = id.chars();
    let prefix = chars.next()?;
    let suffix = chars.as_str();
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok().map(|seq| (prefix, seq))
}

/// Computes the next unused identifier for a prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierGenerator {
    pad_width: usize,
}

impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierGenerator {
    /// Generator with two-digit padding
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            pad_width: DEFAULT_PAD_WIDTH,
        }
    }

    /// Use a different padding width
    #[inline]
    #[must_use]
    pub fn with_pad_width(mut self, pad_width: usize) -> Self {
        self.pad_width = pad_width;
        self
    }

    /// Highest sequence number in use for `prefix`
    pub fn max_sequence<'a, I>(prefix: char, existing: I) -> Option<u32>
    where
        I: IntoIterator<Item = &'a str>,
    {
        existing
            .into_iter()
            .filter_map(parse_identifier)
            .filter(|(p, _)| *p == prefix)
            .map(|(_, seq)| seq)
            .max()
    }

    /// Render an identifier
    #[must_use]
    pub fn format(&self, prefix: char, sequence: u32) -> String {
        format!("{prefix}{sequence:0width$}", width = self.pad_width)
    }

    /// Next identifier for `prefix` given every identifier in the table.
    ///
    /// Numbers are padded to the configured width and grow past it
    /// unpadded (`A99` → `A100`).
    ///
    /// # Errors
    /// `SequenceExhausted` when the prefix already holds the largest number
    pub fn next<'a, I>(&self, prefix: char, existing: I) -> Result<String, RegistryError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let next = match Self::max_sequence(prefix, existing) {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .ok_or(RegistryError::SequenceExhausted(prefix))?,
        };
        Ok(self.format(prefix, next))
    }
}
