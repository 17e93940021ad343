//! Chemistry services used by pose reconstruction.
//!
//! This module is the narrow interface between the reconstruction operations and
//! chemistry proper: it turns SMILES descriptors into graphs, materializes implicit
//! hydrogens with estimated coordinates, places terminal atoms, and derives Kekulé bond
//! orders for output.

mod error;
mod geometry;
mod hydrogens;
mod kekulize;
mod smiles;
mod valence;

pub use error::Error;
pub use geometry::{Hybridization, bond_length, hybridization, substituent_directions};
pub use hydrogens::{add_hydrogens, terminal_position};
pub use kekulize::kekulize;
pub use smiles::parse_smiles;
