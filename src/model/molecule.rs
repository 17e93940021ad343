//! Molecular graph with an arbitrary number of conformers.
//!
//! A [`Molecule`] owns an atom table, a bond table kept in insertion order, and a list of
//! [`Conformer`]s. Growing the graph never invalidates existing conformers: every new atom
//! receives a provisional position in each of them, which callers are expected to refine.

use super::atom::Atom;
use super::bond::Bond;
use super::conformer::Conformer;
use super::types::{BondOrder, Point};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    conformers: Vec<Conformer>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, idx: usize) -> Option<&Atom> {
        self.atoms.get(idx)
    }

    pub fn atom_mut(&mut self, idx: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(idx)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Appends an atom and returns its index.
    ///
    /// Every existing conformer is extended with the origin as a provisional position so
    /// that conformer lengths keep matching the atom table.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        for conformer in &mut self.conformers {
            conformer.push(Point::origin());
        }
        self.atoms.len() - 1
    }

    /// Connects two existing atoms.
    ///
    /// Both indices must refer to atoms already present; self-bonds are rejected in debug
    /// builds.
    pub fn add_bond(&mut self, idx1: usize, idx2: usize, order: BondOrder) {
        debug_assert!(
            idx1 < self.atoms.len() && idx2 < self.atoms.len(),
            "Bond index out of bounds"
        );
        debug_assert_ne!(idx1, idx2, "Self-bond");
        self.bonds.push(Bond::new(idx1, idx2, order));
    }

    pub fn bond_between(&self, idx1: usize, idx2: usize) -> Option<&Bond> {
        let probe = Bond::new(idx1, idx2, BondOrder::Single);
        self.bonds
            .iter()
            .find(|b| b.a1_idx == probe.a1_idx && b.a2_idx == probe.a2_idx)
    }

    /// Iterates over all bonds incident to `atom_idx`, in insertion order.
    pub fn bonds_of(&self, atom_idx: usize) -> impl Iterator<Item = &Bond> {
        self.bonds.iter().filter(move |b| b.contains(atom_idx))
    }

    /// Enumerates neighbors of `atom_idx` in the order their bonds were created.
    ///
    /// The order is stable: descriptor bonds come first, hydrogens added later follow in
    /// the order they were attached. Hydrogen re-identification relies on this.
    pub fn neighbors_of(&self, atom_idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.bonds_of(atom_idx)
            .filter_map(move |b| b.partner_of(atom_idx))
    }

    pub fn degree(&self, atom_idx: usize) -> usize {
        self.bonds_of(atom_idx).count()
    }

    pub fn conformers(&self) -> &[Conformer] {
        &self.conformers
    }

    pub fn conformers_mut(&mut self) -> &mut [Conformer] {
        &mut self.conformers
    }

    pub fn conformer(&self, id: usize) -> Option<&Conformer> {
        self.conformers.get(id)
    }

    pub fn conformer_count(&self) -> usize {
        self.conformers.len()
    }

    /// Attaches a new conformer and returns its id.
    ///
    /// Ids are assigned sequentially from zero in call order. `positions` must hold one
    /// point per atom.
    pub fn add_conformer(&mut self, positions: Vec<Point>) -> usize {
        debug_assert_eq!(
            positions.len(),
            self.atoms.len(),
            "Conformer size must match atom count"
        );
        let id = self.conformers.len();
        self.conformers.push(Conformer::new(id, positions));
        id
    }

    /// Appends a disjoint copy of `other` to this molecule.
    ///
    /// Atom and bond indices of `other` are shifted past the current atom table.
    /// Conformer `k` of `other` is joined onto conformer `k` of `self`, so both molecules
    /// must carry the same number of conformers; conformer ids stay `0..n`.
    pub fn merge(&mut self, other: &Molecule) {
        debug_assert_eq!(
            self.conformers.len(),
            other.conformers.len(),
            "Merged molecules must carry the same number of conformers"
        );
        let offset = self.atoms.len();
        self.atoms.extend(other.atoms.iter().cloned());
        self.bonds.extend(
            other
                .bonds
                .iter()
                .map(|b| Bond::new(b.a1_idx + offset, b.a2_idx + offset, b.order)),
        );
        for (mine, theirs) in self.conformers.iter_mut().zip(&other.conformers) {
            mine.extend_from(theirs);
        }
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Molecule {{ atoms: {}, bonds: {}, conformers: {} }}",
            self.atom_count(),
            self.bond_count(),
            self.conformer_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;

    fn ethanol_skeleton() -> Molecule {
        let mut mol = Molecule::new();
        let c1 = mol.add_atom(Atom::new(Element::C));
        let c2 = mol.add_atom(Atom::new(Element::C));
        let o = mol.add_atom(Atom::new(Element::O));
        mol.add_bond(c1, c2, BondOrder::Single);
        mol.add_bond(c2, o, BondOrder::Single);
        mol
    }

    #[test]
    fn add_atom_returns_sequential_indices() {
        let mol = ethanol_skeleton();

        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.atom(2).map(|a| a.element), Some(Element::O));
        assert!(mol.atom(3).is_none());
    }

    #[test]
    fn neighbors_follow_bond_insertion_order() {
        let mut mol = ethanol_skeleton();
        let h = mol.add_atom(Atom::new(Element::H));
        mol.add_bond(1, h, BondOrder::Single);

        let neighbors: Vec<usize> = mol.neighbors_of(1).collect();
        assert_eq!(neighbors, vec![0, 2, 3]);
        assert_eq!(mol.degree(0), 1);
        assert!(mol.bond_between(2, 1).is_some());
        assert!(mol.bond_between(0, 2).is_none());
    }

    #[test]
    fn add_conformer_assigns_ids_in_call_order() {
        let mut mol = ethanol_skeleton();

        let first = mol.add_conformer(vec![Point::origin(); 3]);
        let second = mol.add_conformer(vec![Point::new(1.0, 1.0, 1.0); 3]);

        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(mol.conformer(1).map(|c| c.id()), Some(1));
    }

    #[test]
    fn add_atom_extends_every_conformer() {
        let mut mol = ethanol_skeleton();
        mol.add_conformer(vec![Point::new(1.0, 0.0, 0.0); 3]);
        mol.add_conformer(vec![Point::new(2.0, 0.0, 0.0); 3]);

        let h = mol.add_atom(Atom::new(Element::H));

        for conformer in mol.conformers() {
            assert_eq!(conformer.len(), 4);
            assert_eq!(conformer.position(h), Some(Point::origin()));
        }
        assert_eq!(
            mol.conformer(1).and_then(|c| c.position(0)),
            Some(Point::new(2.0, 0.0, 0.0))
        );
    }

    #[test]
    fn merge_offsets_bonds_and_joins_conformers_pairwise() {
        let mut left = ethanol_skeleton();
        left.add_conformer(vec![Point::new(0.0, 0.0, 0.0); 3]);
        left.add_conformer(vec![Point::new(1.0, 0.0, 0.0); 3]);

        let mut right = Molecule::new();
        let n = right.add_atom(Atom::new(Element::N));
        let c = right.add_atom(Atom::new(Element::C));
        right.add_bond(n, c, BondOrder::Triple);
        right.add_conformer(vec![Point::new(5.0, 0.0, 0.0); 2]);
        right.add_conformer(vec![Point::new(6.0, 0.0, 0.0); 2]);

        left.merge(&right);

        assert_eq!(left.atom_count(), 5);
        assert_eq!(left.bonds()[2], Bond::new(3, 4, BondOrder::Triple));
        assert_eq!(left.conformer_count(), 2);
        let second = left.conformer(1).expect("second conformer");
        assert_eq!(second.id(), 1);
        assert_eq!(second.position(0), Some(Point::new(1.0, 0.0, 0.0)));
        assert_eq!(second.position(4), Some(Point::new(6.0, 0.0, 0.0)));
    }

    #[test]
    fn molecule_display_reports_counts() {
        let mol = ethanol_skeleton();
        assert_eq!(
            format!("{}", mol),
            "Molecule { atoms: 3, bonds: 2, conformers: 0 }"
        );
    }
}
