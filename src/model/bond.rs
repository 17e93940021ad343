//! Undirected bonds between atoms of a [`Molecule`](super::molecule::Molecule).

use super::types::BondOrder;

/// Undirected bond connecting two atoms of one molecular graph.
///
/// Endpoints are stored in ascending order so equality and hashing do not depend on
/// the direction in which the descriptor wrote the bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    /// Index of the first atom (always the lesser index after canonicalization).
    pub a1_idx: usize,
    /// Index of the second atom (greater-or-equal to `a1_idx`).
    pub a2_idx: usize,
    /// Chemical multiplicity assigned to the bond.
    pub order: BondOrder,
}

impl Bond {
    /// Creates a new bond while canonicalizing the endpoint ordering.
    ///
    /// # Arguments
    ///
    /// * `idx1` - Index of one bonded atom.
    /// * `idx2` - Index of the partner atom.
    /// * `order` - Bond multiplicity or aromaticity.
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        Self {
            a1_idx: idx1.min(idx2),
            a2_idx: idx1.max(idx2),
            order,
        }
    }

    pub fn contains(&self, atom_idx: usize) -> bool {
        self.a1_idx == atom_idx || self.a2_idx == atom_idx
    }

    /// Returns the endpoint opposite to `atom_idx`, or `None` when the atom is not part
    /// of this bond.
    pub fn partner_of(&self, atom_idx: usize) -> Option<usize> {
        if self.a1_idx == atom_idx {
            Some(self.a2_idx)
        } else if self.a2_idx == atom_idx {
            Some(self.a1_idx)
        } else {
            None
        }
    }
}
