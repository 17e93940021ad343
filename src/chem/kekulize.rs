//! Alternating single/double assignment for aromatic bonds.

use super::error::Error;
use super::valence;
use crate::model::{molecule::Molecule, types::BondOrder};

/// Resolves every aromatic bond to a single or double bond.
///
/// Aromatic atoms that need a pi partner are matched pairwise over aromatic bonds; matched
/// bonds become double, every other aromatic bond becomes single. Non-aromatic bonds keep
/// their order.
///
/// # Returns
///
/// One order per bond of `mol`, in bond order.
///
/// # Errors
///
/// Returns [`Error::Kekulize`] naming an atom that cannot be paired.
pub fn kekulize(mol: &Molecule) -> Result<Vec<BondOrder>, Error> {
    let mut orders: Vec<BondOrder> = mol
        .bonds()
        .iter()
        .map(|b| match b.order {
            BondOrder::Aromatic => BondOrder::Single,
            other => other,
        })
        .collect();

    let needs: Vec<bool> = (0..mol.atom_count())
        .map(|i| valence::needs_pi_partner(mol, i))
        .collect();
    if !needs.iter().any(|&n| n) {
        return Ok(orders);
    }

    let mut edges: Vec<Vec<(usize, usize)>> = vec![Vec::new(); mol.atom_count()];
    for (bond_idx, bond) in mol.bonds().iter().enumerate() {
        if bond.order == BondOrder::Aromatic && needs[bond.a1_idx] && needs[bond.a2_idx] {
            edges[bond.a1_idx].push((bond.a2_idx, bond_idx));
            edges[bond.a2_idx].push((bond.a1_idx, bond_idx));
        }
    }

    let mut matching = Matching {
        edges: &edges,
        open: needs,
        chosen: Vec::new(),
        stuck: None,
    };
    if !matching.solve() {
        let atom_idx = matching
            .stuck
            .or_else(|| matching.open.iter().position(|&o| o))
            .unwrap_or(0);
        return Err(Error::Kekulize { atom_idx });
    }

    for bond_idx in matching.chosen {
        orders[bond_idx] = BondOrder::Double;
    }
    Ok(orders)
}

struct Matching<'a> {
    edges: &'a [Vec<(usize, usize)>],
    open: Vec<bool>,
    chosen: Vec<usize>,
    stuck: Option<usize>,
}

impl Matching<'_> {
    fn options(&self, atom: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges[atom]
            .iter()
            .copied()
            .filter(|&(partner, _)| self.open[partner])
    }

    /// The open atom with the fewest open partners; ties go to the lowest index.
    fn most_constrained(&self) -> Option<(usize, usize)> {
        self.open
            .iter()
            .enumerate()
            .filter(|&(_, &o)| o)
            .map(|(atom, _)| (atom, self.options(atom).count()))
            .min_by_key(|&(_, n)| n)
    }

    fn solve(&mut self) -> bool {
        let Some((atom, n)) = self.most_constrained() else {
            return true;
        };
        if n == 0 {
            self.stuck.get_or_insert(atom);
            return false;
        }

        let options: Vec<(usize, usize)> = self.options(atom).collect();
        for (partner, bond_idx) in options {
            self.open[atom] = false;
            self.open[partner] = false;
            self.chosen.push(bond_idx);

            if self.solve() {
                return true;
            }

            self.chosen.pop();
            self.open[atom] = true;
            self.open[partner] = true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::smiles::parse_smiles;

    fn double_count(orders: &[BondOrder]) -> usize {
        orders.iter().filter(|&&o| o == BondOrder::Double).count()
    }

    #[test]
    fn benzene_gets_three_alternating_double_bonds() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        let orders = kekulize(&mol).unwrap();

        assert_eq!(double_count(&orders), 3);
        for atom in 0..6 {
            let doubles = mol
                .bonds()
                .iter()
                .zip(&orders)
                .filter(|(b, o)| b.contains(atom) && **o == BondOrder::Double)
                .count();
            assert_eq!(doubles, 1);
        }
    }

    #[test]
    fn indole_and_imidazolium_kekulize() {
        let indole = parse_smiles("CCc1c[nH]c2ccccc12").unwrap();
        assert_eq!(double_count(&kekulize(&indole).unwrap()), 4);

        let hip = parse_smiles("CCc1c[nH+]c[nH]1").unwrap();
        assert_eq!(double_count(&kekulize(&hip).unwrap()), 2);
    }

    #[test]
    fn non_aromatic_orders_pass_through() {
        let mol = parse_smiles("C=CC#N").unwrap();
        let orders = kekulize(&mol).unwrap();

        assert_eq!(
            orders,
            vec![BondOrder::Double, BondOrder::Single, BondOrder::Triple]
        );
    }

    #[test]
    fn odd_ring_without_donor_fails() {
        let mol = parse_smiles("c1cccc1").unwrap();
        assert!(matches!(kekulize(&mol), Err(Error::Kekulize { .. })));
    }
}
