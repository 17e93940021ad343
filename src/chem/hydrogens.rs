//! Materializes implicit hydrogens and places terminal atoms.

use super::geometry::{self, Hybridization};
use crate::model::{
    atom::Atom,
    molecule::Molecule,
    types::{BondOrder, Element, Point},
};

/// Replaces every implicit hydrogen with an explicit H atom.
///
/// Parents are visited in index order and their hydrogens appended consecutively after all
/// existing atoms, so the first new hydrogen of parent `p` always precedes those of any
/// parent with a larger index. Each new hydrogen gets an estimated position in every
/// conformer; existing positions are left untouched.
///
/// Returns the number of hydrogens added.
pub fn add_hydrogens(mol: &mut Molecule) -> usize {
    let original_count = mol.atom_count();
    let mut added = 0;

    for parent in 0..original_count {
        let count = mol.atom(parent).map_or(0, |a| a.implicit_hydrogens as usize);
        if count == 0 {
            continue;
        }

        let hybridization = geometry::hybridization(mol, parent);
        let heavy_neighbors: Vec<usize> = mol.neighbors_of(parent).collect();
        let reference = reference_atom(mol, parent, &heavy_neighbors);
        let parent_element = match mol.atom_mut(parent) {
            Some(atom) => {
                atom.implicit_hydrogens = 0;
                atom.element
            }
            None => continue,
        };
        let length = geometry::bond_length(parent_element, Element::H);

        let new_atoms: Vec<usize> = (0..count)
            .map(|_| {
                let h = mol.add_atom(Atom::new(Element::H));
                mol.add_bond(parent, h, BondOrder::Single);
                h
            })
            .collect();
        added += count;

        for conformer in mol.conformers_mut() {
            let positions = conformer.positions();
            let center = positions[parent];
            let neighbor_points: Vec<Point> =
                heavy_neighbors.iter().map(|&n| positions[n]).collect();
            let reference_point = reference.map(|r| positions[r]);
            let directions = geometry::substituent_directions(
                &center,
                &neighbor_points,
                reference_point.as_ref(),
                hybridization,
                count,
            );
            for (&h, dir) in new_atoms.iter().zip(directions) {
                conformer.set_position(h, center + dir.scale(length));
            }
        }
    }

    added
}

/// Position for a terminal `atom` bonded to `anchor`.
///
/// Only neighbors of `anchor` flagged in `placed` steer the geometry, so several missing
/// terminal atoms on the same anchor can be placed one after another by marking each as
/// placed before computing the next.
///
/// # Arguments
///
/// * `mol` - Graph providing connectivity and elements.
/// * `positions` - Current coordinates, one per atom.
/// * `placed` - Which entries of `positions` are trustworthy.
/// * `atom` - Terminal atom to place.
/// * `anchor` - Its sole bonded neighbor; must itself be placed.
pub fn terminal_position(
    mol: &Molecule,
    positions: &[Point],
    placed: &[bool],
    atom: usize,
    anchor: usize,
) -> Point {
    let center = positions[anchor];
    let known: Vec<usize> = mol
        .neighbors_of(anchor)
        .filter(|&n| n != atom && placed[n])
        .collect();

    let reference = match known.as_slice() {
        [only] => mol
            .neighbors_of(*only)
            .find(|&n| n != anchor && placed[n])
            .map(|n| positions[n]),
        _ => None,
    };

    let hybridization = geometry::hybridization(mol, anchor);
    let neighbor_points: Vec<Point> = known.iter().map(|&n| positions[n]).collect();
    let direction = geometry::substituent_directions(
        &center,
        &neighbor_points,
        reference.as_ref(),
        hybridization,
        1,
    )[0];

    let length = match (mol.atom(anchor), mol.atom(atom)) {
        (Some(a), Some(t)) => geometry::bond_length(a.element, t.element),
        _ => 1.0,
    };
    center + direction.scale(length)
}

fn reference_atom(mol: &Molecule, center: usize, neighbors: &[usize]) -> Option<usize> {
    match neighbors {
        [only] => mol.neighbors_of(*only).find(|&n| n != center),
        _ => None,
    }
}
