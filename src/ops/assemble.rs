use crate::db::Catalog;
use crate::model::{
    molecule::Molecule,
    pose::{PoseGroup, PoseSet},
    types::Point,
};
use crate::ops::conformer::ConformerBuilder;
use crate::ops::error::Error;
use crate::ops::flexres::identify_flexres;
use crate::ops::hydro::reattach_hydrogens;
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct AssembleConfig {
    pub only_cluster_leads: bool,
    pub annotation_tag: String,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            only_cluster_leads: false,
            annotation_tag: "docking".to_string(),
        }
    }
}

/// Result of rebuilding every pose group of a [`PoseSet`].
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// One entry per group in input order; `None` for groups that failed.
    pub molecules: Vec<Option<Molecule>>,
    /// Input positions of the failed groups, ascending.
    pub failures: Vec<usize>,
    /// Pose indices that became conformers, in conformer order.
    pub pose_ids: Vec<usize>,
}

/// Rebuilds one molecule per pose group with one conformer per retained pose.
///
/// Groups without a recorded descriptor are treated as flexible residues and looked up in
/// `catalog` by residue label and atom names. Any failure inside a group is logged and
/// recorded in [`Assembly::failures`]; the remaining groups are still built.
///
/// # Errors
///
/// Returns [`Error::NoClusterLeads`] when `config` asks for cluster leads only and
/// `poses` records none.
pub fn assemble(
    catalog: &Catalog,
    poses: &PoseSet,
    config: &AssembleConfig,
) -> Result<Assembly, Error> {
    let pose_ids: Vec<usize> = if config.only_cluster_leads {
        if poses.cluster_leads.is_empty() {
            return Err(Error::NoClusterLeads);
        }
        poses.cluster_leads.clone()
    } else {
        (0..poses.pose_count()).collect()
    };

    let mut assembly = Assembly {
        molecules: Vec::with_capacity(poses.groups.len()),
        failures: Vec::new(),
        pose_ids,
    };

    for (group_idx, group) in poses.groups.iter().enumerate() {
        match build_group(catalog, poses, group, &assembly.pose_ids) {
            Ok(molecule) => {
                log::debug!("pose group {}: {}", group_idx, molecule);
                assembly.molecules.push(Some(molecule));
            }
            Err(e) => {
                log::warn!("pose group {} skipped: {}", group_idx, e);
                assembly.molecules.push(None);
                assembly.failures.push(group_idx);
            }
        }
    }

    Ok(assembly)
}

fn build_group(
    catalog: &Catalog,
    poses: &PoseSet,
    group: &PoseGroup,
    pose_ids: &[usize],
) -> Result<Molecule, Error> {
    let (smiles, index_map, h_parent) = match &group.smiles {
        Some(smiles) => (
            Cow::Borrowed(smiles.as_str()),
            Cow::Borrowed(&group.index_map),
            Cow::Borrowed(&group.h_parent),
        ),
        None => {
            let atoms = poses.atoms_of(&group.atom_indices).ok_or_else(|| {
                Error::index_out_of_range("atom table", max_index(group), poses.atoms.len())
            })?;

            let mut res_names: Vec<&str> = Vec::new();
            for atom in &atoms {
                if !res_names.contains(&atom.res_name.as_str()) {
                    res_names.push(atom.res_name.as_str());
                }
            }
            let res_name = match res_names.as_slice() {
                [single] => *single,
                [] => return Err(Error::no_matching_template("")),
                _ => {
                    return Err(Error::MixedResidueNames {
                        res_names: res_names.iter().map(|s| s.to_string()).collect(),
                    });
                }
            };

            let names: Vec<&str> = atoms.iter().map(|a| a.name.as_str()).collect();
            let found = identify_flexres(catalog, res_name, &names)?;
            log::debug!("flexible residue {} matched variant {}", res_name, found.variant);
            (
                Cow::Owned(found.smiles),
                Cow::Owned(found.index_map),
                Cow::Owned(found.h_parent),
            )
        }
    };

    let mut builder = ConformerBuilder::new(&smiles, &index_map);
    let mut coordinates: Vec<Vec<Point>> = Vec::with_capacity(pose_ids.len());
    for &pose in pose_ids {
        let points = poses.positions(pose, &group.atom_indices).ok_or_else(|| {
            Error::index_out_of_range("pose", pose, poses.pose_count())
        })?;
        builder.add_pose(&points)?;
        coordinates.push(points);
    }

    let mut molecule = builder.finish()?;
    reattach_hydrogens(&mut molecule, &coordinates, &h_parent)?;
    Ok(molecule)
}

fn max_index(group: &PoseGroup) -> usize {
    group.atom_indices.iter().copied().max().unwrap_or(0)
}

/// Joins molecules into one graph, skipping absent entries.
///
/// Atoms and bonds are appended in input order. Conformer `k` of the result joins
/// conformer `k` of every input, so each output conformer holds every entity in one
/// pose.
///
/// # Returns
///
/// `None` when the input is empty or holds only absent entries.
///
/// # Errors
///
/// Returns [`Error::ConformerCountMismatch`] when the present molecules carry different
/// numbers of conformers.
pub fn combine_molecules<I>(molecules: I) -> Result<Option<Molecule>, Error>
where
    I: IntoIterator<Item = Option<Molecule>>,
{
    let mut combined: Option<Molecule> = None;
    for molecule in molecules.into_iter().flatten() {
        match combined.as_mut() {
            None => combined = Some(molecule),
            Some(acc) => {
                if acc.conformer_count() != molecule.conformer_count() {
                    return Err(Error::ConformerCountMismatch {
                        expected: acc.conformer_count(),
                        found: molecule.conformer_count(),
                    });
                }
                acc.merge(&molecule);
            }
        }
    }
    Ok(combined)
}
