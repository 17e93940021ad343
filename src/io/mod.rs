//! Serialization of reconstructed molecules.
//!
//! Multi-conformer molecules are exported as MDL SD files, one record per conformer, with
//! optional data items carrying per-pose annotations.

mod error;
mod sdf;

pub use sdf::writer::{DataItem, write_sdf};

pub use error::Error;
