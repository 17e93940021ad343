//! Per-pose coordinate sets attached to a molecular graph.

use super::types::Point;

/// One 3D embedding of a molecule, indexed by atom.
///
/// The conformer never owns graph information; its length always equals the atom count of
/// the owning [`Molecule`](super::molecule::Molecule), which extends every conformer when
/// it grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    id: usize,
    positions: Vec<Point>,
}

impl Conformer {
    pub(crate) fn new(id: usize, positions: Vec<Point>) -> Self {
        Self { id, positions }
    }

    /// Stable identifier assigned in attachment order, starting at zero.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn position(&self, atom_idx: usize) -> Option<Point> {
        self.positions.get(atom_idx).copied()
    }

    /// Overwrites the position of one atom.
    ///
    /// # Panics
    ///
    /// Panics when `atom_idx` is outside the conformer; callers index with atom ids
    /// taken from the owning molecule.
    pub fn set_position(&mut self, atom_idx: usize, pos: Point) {
        self.positions[atom_idx] = pos;
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub(crate) fn push(&mut self, pos: Point) {
        self.positions.push(pos);
    }

    pub(crate) fn extend_from(&mut self, other: &Conformer) {
        self.positions.extend_from_slice(&other.positions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conformer_set_position_overwrites_single_atom() {
        let mut conformer = Conformer::new(3, vec![Point::origin(); 2]);
        conformer.set_position(1, Point::new(1.0, 2.0, 3.0));

        assert_eq!(conformer.id(), 3);
        assert_eq!(conformer.len(), 2);
        assert_eq!(conformer.position(0), Some(Point::origin()));
        assert_eq!(conformer.position(1), Some(Point::new(1.0, 2.0, 3.0)));
        assert_eq!(conformer.position(2), None);
    }

    #[test]
    fn conformer_extend_from_appends_positions() {
        let mut first = Conformer::new(0, vec![Point::new(1.0, 0.0, 0.0)]);
        let second = Conformer::new(0, vec![Point::new(0.0, 1.0, 0.0)]);

        first.extend_from(&second);

        assert_eq!(
            first.positions(),
            &[Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0)]
        );
    }
}
