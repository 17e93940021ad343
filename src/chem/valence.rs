//! Valence bookkeeping shared by the SMILES reader and the kekulizer.

use crate::model::{molecule::Molecule, types::Element};

/// Elements whose aromatic form may donate a lone pair instead of taking a double bond
/// (pyrrole nitrogen, furan oxygen, thiophene sulfur).
fn donates_lone_pair(element: Element) -> bool {
    matches!(
        element,
        Element::N | Element::O | Element::S | Element::Se | Element::P | Element::As
    )
}

fn bonded_valence(mol: &Molecule, idx: usize) -> u8 {
    mol.bonds_of(idx)
        .map(|b| b.order.valence_contribution())
        .sum()
}

/// Implicit hydrogen count of an unbracketed (organic-subset) atom.
///
/// The atom is filled up to its smallest default valence that accommodates the explicit
/// bonds. Aromatic atoms reserve one valence for the pi system unless they already sit at
/// a saturated valence and can donate a lone pair.
pub(crate) fn organic_implicit_hydrogens(mol: &Molecule, idx: usize) -> u8 {
    let Some(atom) = mol.atom(idx) else {
        return 0;
    };
    let valences = atom.element.default_valences();
    let used = bonded_valence(mol, idx);

    if atom.aromatic {
        if donates_lone_pair(atom.element) && valences.contains(&used) {
            return 0;
        }
        return valences
            .iter()
            .find(|&&v| v > used)
            .map(|&v| v - used - 1)
            .unwrap_or(0);
    }

    valences
        .iter()
        .find(|&&v| v >= used)
        .map(|&v| v - used)
        .unwrap_or(0)
}

/// Whether an aromatic atom must receive one double bond when the ring is kekulized.
///
/// Hydrogens count whether they are still implicit or already explicit graph atoms, so
/// the answer does not change after hydrogen expansion.
pub(crate) fn needs_pi_partner(mol: &Molecule, idx: usize) -> bool {
    let Some(atom) = mol.atom(idx) else {
        return false;
    };
    if !atom.aromatic {
        return false;
    }
    let valences = atom.element.charged_valences(atom.formal_charge);
    let used = bonded_valence(mol, idx) + atom.implicit_hydrogens;

    if donates_lone_pair(atom.element) && valences.contains(&used) {
        return false;
    }
    valences
        .iter()
        .find(|&&v| v >= used)
        .is_some_and(|&v| v > used)
}
