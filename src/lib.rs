//! # PoseForge
//!
//! **PoseForge** rebuilds chemically annotated molecules from docking output. Docking
//! engines report poses as bare coordinates in their own atom order; this crate
//! regenerates the bonding graph from a stored SMILES descriptor, reconciles the two atom
//! orders through recorded index correspondences, attaches every pose as a conformer,
//! restores hydrogens, and writes the result as an SD file with per-pose scores.
//!
//! ## Features
//!
//! - **Explicit molecular graph** – `Molecule` keeps atoms, bonds in insertion order, and any number of conformers backed by `nalgebra` points.
//! - **Built-in chemistry** – A SMILES reader, implicit-hydrogen expansion with geometric placement, terminal-atom placement, and kekulization live under `chem`.
//! - **Flexible residue recovery** – An embedded TOML catalog of side-chain variants identifies flexible receptor residues from their atom names, resolving protonation-ambiguous labels in a fixed order.
//! - **Failure-tolerant assembly** – `ops::assemble` rebuilds every pose group independently and reports failed groups by position instead of aborting the batch.
//! - **SD export** – `ops::export_sdf` joins all entities pose by pose and writes V2000 records carrying JSON score annotations.

mod db;
mod model;

pub mod chem;
pub mod io;
pub mod ops;

pub use db::{AmbiguityGroup, Catalog, ResidueTemplate};
pub use model::atom::Atom;
pub use model::bond::Bond;
pub use model::conformer::Conformer;
pub use model::molecule::Molecule;
pub use model::pose::{
    CorrespondenceError, IndexCorrespondence, IndexPair, PoseAtom, PoseGroup, PoseProperties,
    PoseSet,
};
pub use model::types::{BondOrder, Element, Point};
