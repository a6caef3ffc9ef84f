//! Material prefix registry
//!
//! Provides [`MaterialIdRegistry`], mapping material names to the single
//! uppercase letter that prefixes their identifiers.

use crate::error::RegistryError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix returned for materials that were never assigned
pub const DEFAULT_FALLBACK_PREFIX: char = 'Z';

fn default_fallback() -> char {
    DEFAULT_FALLBACK_PREFIX
}

/// What [`MaterialIdRegistry::assign`] would do for a material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Prefix letter
    pub prefix: char,
    /// Whether assigning would create a new entry
    pub is_new: bool,
}

/// Material name → prefix letter
///
/// Letters are handed out monotonically: the next letter is always one past
/// the highest letter in use, so a letter freed by deletion is never reused
/// unless it was the highest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialIdRegistry {
    entries: IndexMap<String, char>,
    #[serde(default = "default_fallback")]
    fallback: char,
}

impl Default for MaterialIdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialIdRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            fallback: DEFAULT_FALLBACK_PREFIX,
        }
    }

    /// Use a different fallback prefix for unmapped materials
    #[inline]
    #[must_use]
    pub fn with_fallback(mut self, fallback: char) -> Self {
        self.fallback = fallback;
        self
    }

    /// Letter the next new material would receive
    ///
    /// # Errors
    /// `RegistryError::Exhausted` once 'Z' is in use
    pub fn next_letter(&self) -> Result<char, RegistryError> {
        match self.entries.values().max() {
            None => Ok('A'),
            Some(&max) if max >= 'Z' => Err(RegistryError::Exhausted(max)),
            Some(&max) => char::from_u32(u32::from(max) + 1).ok_or(RegistryError::Exhausted(max)),
        }
    }

    /// Compute the prefix [`assign`](Self::assign) would return, without
    /// persisting anything
    ///
    /// # Errors
    /// `EmptyName` for a blank material, `Exhausted` if a new letter is
    /// needed and none is left
    pub fn peek(&self, material: &str) -> Result<Assignment, RegistryError> {
        let material = material.trim();
        if material.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if let Some(&prefix) = self.entries.get(material) {
            return Ok(Assignment { prefix, is_new: false });
        }
        Ok(Assignment {
            prefix: self.next_letter()?,
            is_new: true,
        })
    }

    /// Existing prefix, or a newly assigned one
    ///
    /// # Errors
    /// Same as [`peek`](Self::peek)
    pub fn assign(&mut self, material: &str) -> Result<char, RegistryError> {
        let assignment = self.peek(material)?;
        if assignment.is_new {
            self.entries.insert(material.trim().to_string(), assignment.prefix);
            tracing::debug!(material = material.trim(), prefix = %assignment.prefix, "assigned material prefix");
        }
        Ok(assignment.prefix)
    }

    /// Add a material that must not exist yet
    ///
    /// # Errors
    /// `Duplicate` if already mapped, plus the errors of [`assign`](Self::assign)
    pub fn add(&mut self, material: &str) -> Result<char, RegistryError> {
        if self.contains(material) {
            return Err(RegistryError::Duplicate(material.trim().to_string()));
        }
        self.assign(material)
    }

    /// Assigned prefix, or the fallback letter for unmapped materials
    #[must_use]
    pub fn prefix_of(&self, material: &str) -> char {
        self.letter_of(material).unwrap_or(self.fallback)
    }

    /// Assigned prefix, if any
    #[must_use]
    pub fn letter_of(&self, material: &str) -> Option<char> {
        self.entries.get(material.trim()).copied()
    }

    /// Rename a material, keeping its letter and list position.
    ///
    /// Identifiers already issued are untouched.
    ///
    /// # Errors
    /// `NotFound` for an unknown `old`, `Duplicate` if `new` is taken,
    /// `EmptyName` for a blank `new`
    pub fn rename(&mut self, old: &str, new: &str) -> Result<char, RegistryError> {
        let (old, new) = (old.trim(), new.trim());
        if new.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let index = self
            .entries
            .get_index_of(old)
            .ok_or_else(|| RegistryError::NotFound(old.to_string()))?;
        if old == new {
            return Ok(self.entries[index]);
        }
        if self.entries.contains_key(new) {
            return Err(RegistryError::Duplicate(new.to_string()));
        }
        let letter = self.entries.shift_remove(old).unwrap_or(self.fallback);
        self.entries.shift_insert(index, new.to_string(), letter);
        tracing::debug!(old, new, prefix = %letter, "renamed material");
        Ok(letter)
    }

    /// Remove a material; its letter is not recycled unless it was the
    /// highest letter in use
    ///
    /// # Errors
    /// `NotFound` for an unknown material
    pub fn delete(&mut self, material: &str) -> Result<char, RegistryError> {
        let material = material.trim();
        let letter = self
            .entries
            .shift_remove(material)
            .ok_or_else(|| RegistryError::NotFound(material.to_string()))?;
        tracing::debug!(material, prefix = %letter, "deleted material");
        Ok(letter)
    }

    /// Whether the material is mapped
    #[inline]
    #[must_use]
    pub fn contains(&self, material: &str) -> bool {
        self.entries.contains_key(material.trim())
    }

    /// Material names in first-use order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// `(material, letter)` pairs in first-use order
    pub fn iter(&self) -> impl Iterator<Item = (&str, char)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of mapped materials
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No materials mapped
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
