use crate::db::{Catalog, ResidueTemplate};
use crate::model::pose::{IndexCorrespondence, IndexPair};
use crate::ops::error::Error;
use std::collections::HashSet;

/// Structure descriptor and index correspondences recovered for a flexible residue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlexResidueMatch {
    /// Name of the matching catalog variant, e.g. `"HIE"` for a `HIS` label.
    pub variant: String,
    pub smiles: String,
    /// Heavy atoms: descriptor index → position in the observed name list.
    pub index_map: IndexCorrespondence,
    /// Hydrogens: descriptor index of the parent → position in the observed name list.
    pub h_parent: IndexCorrespondence,
}

/// Finds the catalog variant whose atom names are exactly `atom_names`.
///
/// Candidates come from [`Catalog::candidates`] and are tried in order; the first one
/// whose expected names (heavy atoms and hydrogens) all appear among `atom_names`, with
/// the same count, wins. Partial matches are never scored.
///
/// # Arguments
///
/// * `catalog` - Residue templates and ambiguity groups to search.
/// * `res_name` - Residue label shared by the observed atoms.
/// * `atom_names` - Observed atom names in pose-file order.
///
/// # Errors
///
/// Returns [`Error::DuplicateAtomName`] when a name occurs twice in `atom_names`, and
/// [`Error::NoMatchingTemplate`] when no candidate matches.
pub fn identify_flexres<S: AsRef<str>>(
    catalog: &Catalog,
    res_name: &str,
    atom_names: &[S],
) -> Result<FlexResidueMatch, Error> {
    let mut observed = HashSet::with_capacity(atom_names.len());
    for name in atom_names {
        if !observed.insert(name.as_ref()) {
            return Err(Error::duplicate_atom_name(res_name, name.as_ref()));
        }
    }

    let template = catalog
        .candidates(res_name)
        .into_iter()
        .filter_map(|candidate| catalog.template(candidate))
        .find(|t| {
            t.expected_count() == atom_names.len()
                && t.expected_names().all(|n| observed.contains(n))
        })
        .ok_or_else(|| Error::no_matching_template(res_name))?;

    Ok(derive_maps(template, atom_names))
}

fn derive_maps<S: AsRef<str>>(template: &ResidueTemplate, atom_names: &[S]) -> FlexResidueMatch {
    let position_of = |name: &str| atom_names.iter().position(|n| n.as_ref() == name);

    let index_map = template
        .heavy_atom_names()
        .enumerate()
        .filter_map(|(descriptor, name)| {
            position_of(name).map(|source| IndexPair::new(descriptor, source))
        })
        .collect();

    let h_parent = template
        .hydrogens()
        .filter_map(|(name, parent)| position_of(name).map(|source| IndexPair::new(parent, source)))
        .collect();

    FlexResidueMatch {
        variant: template.name().to_string(),
        smiles: template.smiles().to_string(),
        index_map,
        h_parent,
    }
}
