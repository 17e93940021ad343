use crate::chem;
use crate::model::{molecule::Molecule, pose::IndexCorrespondence, types::Point};
use crate::ops::error::Error;

/// Accumulates one conformer per pose on a graph parsed from a structure descriptor.
///
/// The descriptor is parsed lazily on the first pose, so a builder that never receives a
/// pose costs nothing until [`finish`](Self::finish).
#[derive(Debug)]
pub struct ConformerBuilder<'a> {
    smiles: &'a str,
    index_map: &'a IndexCorrespondence,
    molecule: Option<Molecule>,
}

impl<'a> ConformerBuilder<'a> {
    pub fn new(smiles: &'a str, index_map: &'a IndexCorrespondence) -> Self {
        Self {
            smiles,
            index_map,
            molecule: None,
        }
    }

    fn molecule(&mut self) -> Result<&mut Molecule, Error> {
        if self.molecule.is_none() {
            self.molecule = Some(chem::parse_smiles(self.smiles)?);
        }
        Ok(self.molecule.get_or_insert_with(Molecule::new))
    }

    /// Attaches the coordinates of one pose as a new conformer.
    ///
    /// Mapped atoms take the coordinate at their source index. Every other atom must be a
    /// hydrogen with exactly one neighbor; it is placed from its neighbor's geometry.
    ///
    /// # Arguments
    ///
    /// * `coordinates` - Positions of the entity's atoms in pose-file order.
    ///
    /// # Returns
    ///
    /// The id of the new conformer; ids count up from zero in call order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Descriptor`] when the descriptor does not parse,
    /// [`Error::IndexMapExceedsAtomCount`] when the map has more pairs than the graph has
    /// atoms, [`Error::IndexOutOfRange`] for a pair pointing outside the graph or the
    /// coordinates, and [`Error::UnmappedHeavyAtom`] or
    /// [`Error::UnmappedHydrogenNeighbors`] when an unmapped atom cannot be recovered.
    pub fn add_pose(&mut self, coordinates: &[Point]) -> Result<usize, Error> {
        let index_map = self.index_map;
        let mol = self.molecule()?;
        let atom_count = mol.atom_count();

        if index_map.len() > atom_count {
            return Err(Error::IndexMapExceedsAtomCount {
                pairs: index_map.len(),
                atom_count,
            });
        }

        let mut positions = vec![Point::origin(); atom_count];
        let mut placed = vec![false; atom_count];
        for pair in index_map.iter() {
            if pair.descriptor >= atom_count {
                return Err(Error::index_out_of_range(
                    "descriptor atom",
                    pair.descriptor,
                    atom_count,
                ));
            }
            let point = coordinates.get(pair.source).ok_or_else(|| {
                Error::index_out_of_range("pose coordinate", pair.source, coordinates.len())
            })?;
            positions[pair.descriptor] = *point;
            placed[pair.descriptor] = true;
        }

        for idx in 0..atom_count {
            if placed[idx] {
                continue;
            }
            let Some(atom) = mol.atom(idx) else {
                continue;
            };
            if !atom.is_hydrogen() {
                return Err(Error::UnmappedHeavyAtom {
                    atom_idx: idx,
                    element: atom.element.to_string(),
                });
            }
            let neighbors: Vec<usize> = mol.neighbors_of(idx).collect();
            let [anchor] = neighbors.as_slice() else {
                return Err(Error::UnmappedHydrogenNeighbors {
                    atom_idx: idx,
                    neighbors: neighbors.len(),
                });
            };
            positions[idx] = chem::terminal_position(mol, &positions, &placed, idx, *anchor);
            placed[idx] = true;
        }

        Ok(mol.add_conformer(positions))
    }

    /// Returns the molecule with every conformer added so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Descriptor`] when no pose was added and the descriptor does not
    /// parse.
    pub fn finish(mut self) -> Result<Molecule, Error> {
        self.molecule()?;
        Ok(self.molecule.unwrap_or_default())
    }
}
