//! Core data structures for molecular graphs and docking pose records.
//!
//! Graph types (atoms, bonds, conformers, molecules) are produced by the chemistry toolkit
//! and mutated by the reconstruction operations; pose types describe the docking output
//! those operations consume.

pub mod atom;
pub mod bond;
pub mod conformer;
pub mod molecule;
pub mod pose;
pub mod types;
