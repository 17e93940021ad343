use crate::chem;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("residue template '{template}' declares atom name '{atom_name}' more than once")]
    DuplicateTemplateAtom { template: String, atom_name: String },

    #[error(
        "residue template '{template}' attaches hydrogen '{hydrogen}' to unknown heavy atom '{parent}'"
    )]
    UnknownTemplateParent {
        template: String,
        hydrogen: String,
        parent: String,
    },

    #[error("residue template '{template}' is defined more than once")]
    DuplicateTemplate { template: String },

    #[error("ambiguity group '{group}' lists unknown residue template '{candidate}'")]
    UnknownCandidate { group: String, candidate: String },

    #[error("atom name '{atom_name}' appears more than once in residue '{res_name}'")]
    DuplicateAtomName { res_name: String, atom_name: String },

    #[error("flexible group spans several residues ({})", res_names.join(", "))]
    MixedResidueNames { res_names: Vec<String> },

    #[error("no residue template for '{res_name}' matches the observed atom names")]
    NoMatchingTemplate { res_name: String },

    #[error("index map has {pairs} pairs but the molecule only has {atom_count} atoms")]
    IndexMapExceedsAtomCount { pairs: usize, atom_count: usize },

    #[error("only hydrogens may be left unmapped, but atom {atom_idx} is {element}")]
    UnmappedHeavyAtom { atom_idx: usize, element: String },

    #[error("unmapped hydrogen {atom_idx} must have exactly one neighbor, found {neighbors}")]
    UnmappedHydrogenNeighbors { atom_idx: usize, neighbors: usize },

    #[error("{context} index {index} is out of range (length {len})")]
    IndexOutOfRange {
        context: &'static str,
        index: usize,
        len: usize,
    },

    #[error("atom {parent_idx} has no unassigned hydrogen left in conformer {conformer_id}")]
    HydrogenCandidatesExhausted {
        parent_idx: usize,
        conformer_id: usize,
    },

    #[error("conformer count mismatch: expected {expected}, found {found}")]
    ConformerCountMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Descriptor(#[from] chem::Error),

    #[error("only cluster leads were requested but none are recorded")]
    NoClusterLeads,
}

impl Error {
    pub fn duplicate_template_atom(
        template: impl Into<String>,
        atom_name: impl Into<String>,
    ) -> Self {
        Self::DuplicateTemplateAtom {
            template: template.into(),
            atom_name: atom_name.into(),
        }
    }

    pub fn duplicate_atom_name(res_name: impl Into<String>, atom_name: impl Into<String>) -> Self {
        Self::DuplicateAtomName {
            res_name: res_name.into(),
            atom_name: atom_name.into(),
        }
    }

    pub fn no_matching_template(res_name: impl Into<String>) -> Self {
        Self::NoMatchingTemplate {
            res_name: res_name.into(),
        }
    }

    pub fn index_out_of_range(context: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            context,
            index,
            len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_items() {
        let err = Error::duplicate_atom_name("LYS", "HZ1");
        assert_eq!(
            err.to_string(),
            "atom name 'HZ1' appears more than once in residue 'LYS'"
        );

        let err = Error::MixedResidueNames {
            res_names: vec!["LYS".into(), "ARG".into()],
        };
        assert_eq!(
            err.to_string(),
            "flexible group spans several residues (LYS, ARG)"
        );
    }

    #[test]
    fn chemistry_errors_convert_transparently() {
        let inner = chem::Error::Kekulize { atom_idx: 4 };
        let err: Error = inner.clone().into();

        assert_eq!(err.to_string(), inner.to_string());
        assert!(matches!(err, Error::Descriptor(_)));
    }
}
