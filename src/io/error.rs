//! Error type for molecule serialization.
//!
//! Writers report either a failure of the underlying stream or a molecule that the
//! target format cannot represent.

use thiserror::Error;

/// Errors that can occur while writing molecular data.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper around failures of the destination stream.
    #[error("I/O error while writing {format}: {source}")]
    Io {
        /// Name of the format being written (e.g., `"SDF"`).
        format: &'static str,
        /// Underlying error emitted by the standard library.
        #[source]
        source: std::io::Error,
    },

    /// Reports content the format cannot encode, such as counts beyond its field widths.
    #[error("inconsistent data for {format}: {details}")]
    InconsistentData {
        /// Name of the format being written.
        format: &'static str,
        /// Summary of the detected inconsistency.
        details: String,
    },
}

impl Error {
    /// Constructs an [`Error::Io`] variant from a standard I/O error.
    ///
    /// # Arguments
    ///
    /// * `format` - Name of the format being written.
    /// * `source` - The original `std::io::Error`.
    pub fn from_io(format: &'static str, source: std::io::Error) -> Self {
        Self::Io { format, source }
    }

    /// Creates an [`Error::InconsistentData`] describing unrepresentable content.
    ///
    /// # Arguments
    ///
    /// * `format` - Name of the format being written.
    /// * `details` - Explanation of the inconsistency.
    pub fn inconsistent_data(format: &'static str, details: impl Into<String>) -> Self {
        Self::InconsistentData {
            format,
            details: details.into(),
        }
    }
}
