//! Error type for the chemistry toolkit.

use thiserror::Error;

/// Failures raised while parsing structure descriptors or deriving bond orders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The descriptor string is not valid SMILES (or uses an unsupported feature).
    #[error("invalid SMILES '{smiles}' at position {position}: {details}")]
    Smiles {
        /// Full descriptor being parsed.
        smiles: String,
        /// Byte offset where parsing stopped.
        position: usize,
        /// Human-readable description of the problem.
        details: String,
    },

    /// No alternating single/double assignment exists for an aromatic system.
    #[error("cannot kekulize aromatic system: atom {atom_idx} has no double-bond partner")]
    Kekulize { atom_idx: usize },
}

impl Error {
    /// Helper for constructing an [`Error::Smiles`] variant.
    ///
    /// # Arguments
    ///
    /// * `smiles` - Descriptor being parsed.
    /// * `position` - Byte offset of the offending character.
    /// * `details` - Explanation of the failure.
    pub fn smiles(smiles: impl Into<String>, position: usize, details: impl Into<String>) -> Self {
        Self::Smiles {
            smiles: smiles.into(),
            position,
            details: details.into(),
        }
    }
}
