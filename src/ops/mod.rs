//! Reconstruction of multi-conformer molecules from docking poses.
//!
//! The operations follow the order in which a pose group is rebuilt: flexible residues
//! without a recorded descriptor are identified against the residue catalog, a
//! [`ConformerBuilder`] attaches one conformer per retained pose, hydrogens are expanded
//! and the recorded ones moved to their pose coordinates, and finally all groups are
//! joined and exported. Per-group failures never abort a batch; they are reported by
//! position next to the molecules that were rebuilt.

mod assemble;
mod conformer;
mod error;
mod export;
mod flexres;
mod hydro;

pub use flexres::{FlexResidueMatch, identify_flexres};

pub use conformer::ConformerBuilder;

pub use hydro::reattach_hydrogens;

pub use assemble::{AssembleConfig, Assembly, assemble, combine_molecules};

pub use export::{ExportError, SdfExport, export_sdf};

pub use error::Error;
