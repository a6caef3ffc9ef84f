//! Registry errors

use asset_core::ErrorKind;

/// Errors from the material id registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Material name blank
    #[error("material name must not be empty")]
    EmptyName,

    /// Material not mapped
    #[error("material not found: {0}")]
    NotFound(String),

    /// Material already mapped
    #[error("material already exists: {0}")]
    Duplicate(String),

    /// Every letter up to 'Z' has been handed out
    #[error("no prefix letters left after '{0}'")]
    Exhausted(char),

    /// The prefix already uses the largest sequence number
    #[error("no sequence numbers left for prefix '{0}'")]
    SequenceExhausted(char),
}

impl RegistryError {
    /// Classify for the caller
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Duplicate(_) => ErrorKind::Duplicate,
            Self::EmptyName | Self::Exhausted(_) | Self::SequenceExhausted(_) => {
                ErrorKind::Validation
            }
        }
    }
}
