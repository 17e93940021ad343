use crate::chem;
use crate::model::{molecule::Molecule, pose::IndexCorrespondence, types::Point};
use crate::ops::error::Error;
use std::collections::HashSet;

/// Adds explicit hydrogens and moves the recorded ones to their pose coordinates.
///
/// Every implicit hydrogen becomes an explicit atom with an estimated position in each
/// conformer. Then, for each conformer paired with its pose coordinates, every
/// `h_parent` entry claims the first hydrogen neighbor of its parent not yet claimed in
/// that conformer and moves it to the recorded coordinate. Claims reset between
/// conformers. Equivalent hydrogens on one parent (the two amide hydrogens, say) are
/// therefore assigned in declaration order.
///
/// # Arguments
///
/// * `molecule` - Graph with all conformers already attached.
/// * `pose_coordinates` - Coordinates per conformer, in conformer order.
/// * `h_parent` - Parent descriptor index → source index of each recorded hydrogen.
///
/// # Errors
///
/// Returns [`Error::ConformerCountMismatch`] unless there is exactly one coordinate list
/// per conformer; the molecule is left untouched in that case.
/// Returns [`Error::IndexOutOfRange`] for a parent outside the graph or a source index
/// outside the pose coordinates, and [`Error::HydrogenCandidatesExhausted`] when a
/// parent has fewer hydrogens than entries naming it.
pub fn reattach_hydrogens(
    molecule: &mut Molecule,
    pose_coordinates: &[Vec<Point>],
    h_parent: &IndexCorrespondence,
) -> Result<(), Error> {
    if pose_coordinates.len() != molecule.conformer_count() {
        return Err(Error::ConformerCountMismatch {
            expected: molecule.conformer_count(),
            found: pose_coordinates.len(),
        });
    }

    chem::add_hydrogens(molecule);

    let atom_count = molecule.atom_count();
    let candidates = h_parent
        .iter()
        .map(|pair| {
            if pair.descriptor >= atom_count {
                return Err(Error::index_out_of_range(
                    "hydrogen parent",
                    pair.descriptor,
                    atom_count,
                ));
            }
            let hydrogens: Vec<usize> = molecule
                .neighbors_of(pair.descriptor)
                .filter(|&n| molecule.atom(n).is_some_and(|a| a.is_hydrogen()))
                .collect();
            Ok(hydrogens)
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (conformer, coordinates) in molecule.conformers_mut().iter_mut().zip(pose_coordinates) {
        let mut claimed = HashSet::new();
        for (pair, hydrogens) in h_parent.iter().zip(&candidates) {
            let h = hydrogens
                .iter()
                .copied()
                .find(|h| !claimed.contains(h))
                .ok_or(Error::HydrogenCandidatesExhausted {
                    parent_idx: pair.descriptor,
                    conformer_id: conformer.id(),
                })?;
            let point = coordinates.get(pair.source).ok_or_else(|| {
                Error::index_out_of_range("pose coordinate", pair.source, coordinates.len())
            })?;
            claimed.insert(h);
            conformer.set_position(h, *point);
        }
    }

    Ok(())
}
