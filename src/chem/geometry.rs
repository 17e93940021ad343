//! Idealized placement of terminal substituents around a bonded center.
//!
//! Given the positions of a center atom and its already-placed neighbors, these helpers
//! return unit directions for new terminal atoms that follow VSEPR angles for the center's
//! hybridization. They serve both hydrogen expansion and the recovery of terminal atoms a
//! docking engine did not report.

use crate::model::{
    molecule::Molecule,
    types::{BondOrder, Element, Point},
};
use nalgebra::{Rotation3, Unit, Vector3};

const TETRAHEDRAL_ANGLE: f64 = 109.471_220_634_490_7;
const DEGENERATE_NORM: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hybridization {
    Sp,
    Sp2,
    Sp3,
}

fn carries_pi_bond(mol: &Molecule, idx: usize) -> bool {
    mol.atom(idx).is_some_and(|a| a.aromatic)
        || mol
            .bonds_of(idx)
            .any(|b| !matches!(b.order, BondOrder::Single))
}

/// Classifies the hybridization of an atom from its bond orders.
///
/// Nitrogen and oxygen with a free lone pair next to a pi system (amides, anilines,
/// carboxylic acids) are treated as planar.
pub fn hybridization(mol: &Molecule, idx: usize) -> Hybridization {
    let Some(atom) = mol.atom(idx) else {
        return Hybridization::Sp3;
    };

    let mut doubles = 0;
    let mut triple = false;
    let mut aromatic = atom.aromatic;
    for bond in mol.bonds_of(idx) {
        match bond.order {
            BondOrder::Double => doubles += 1,
            BondOrder::Triple => triple = true,
            BondOrder::Aromatic => aromatic = true,
            BondOrder::Single => {}
        }
    }

    if triple || doubles >= 2 {
        return Hybridization::Sp;
    }
    if doubles == 1 || aromatic {
        return Hybridization::Sp2;
    }

    let substituents = mol.degree(idx) + atom.implicit_hydrogens as usize;
    let lone_pair_donor = match atom.element {
        Element::N => substituents <= 3 && atom.formal_charge <= 0,
        Element::O => substituents <= 2 && atom.formal_charge <= 0,
        _ => false,
    };
    if lone_pair_donor && mol.neighbors_of(idx).any(|n| carries_pi_bond(mol, n)) {
        return Hybridization::Sp2;
    }

    Hybridization::Sp3
}

/// Equilibrium distance between two bonded atoms, in ångströms.
pub fn bond_length(center: Element, terminal: Element) -> f64 {
    match (center, terminal) {
        (Element::C, Element::H) | (Element::H, Element::C) => 1.09,
        (Element::N, Element::H) | (Element::H, Element::N) => 1.01,
        (Element::O, Element::H) | (Element::H, Element::O) => 0.96,
        (Element::S, Element::H) | (Element::H, Element::S) => 1.34,
        _ => center.covalent_radius() + terminal.covalent_radius(),
    }
}

fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let up = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&up).normalize()
}

fn unit_or(v: Vector3<f64>, fallback: impl FnOnce() -> Vector3<f64>) -> Vector3<f64> {
    if v.norm() < DEGENERATE_NORM {
        fallback()
    } else {
        v.normalize()
    }
}

/// Unit directions for `count` new terminal atoms on `center`.
///
/// # Arguments
///
/// * `center` - Position of the atom receiving the substituents.
/// * `neighbors` - Positions of substituents already placed on `center`.
/// * `reference` - With a single placed neighbor, a position bonded to that neighbor; it
///   fixes the torsion so that the first new atom lands anti (sp3) or trans (sp2) to it.
/// * `hybridization` - Geometry of `center`.
/// * `count` - Number of directions to return.
///
/// # Returns
///
/// Exactly `count` unit vectors. When the geometry offers fewer slots than requested,
/// the remainder is taken from a fixed set of 26 lattice directions, each time the one
/// farthest from every neighbor and slot chosen so far.
pub fn substituent_directions(
    center: &Point,
    neighbors: &[Point],
    reference: Option<&Point>,
    hybridization: Hybridization,
    count: usize,
) -> Vec<Vector3<f64>> {
    let units: Vec<Vector3<f64>> = neighbors
        .iter()
        .map(|p| unit_or(p - center, Vector3::x))
        .collect();

    let slots = match units.as_slice() {
        [] => isolated_slots(hybridization),
        [u] => single_neighbor_slots(u, neighbors[0], reference, hybridization),
        [u0, u1] => two_neighbor_slots(u0, u1, hybridization),
        many => {
            let sum: Vector3<f64> = many.iter().sum();
            let normal = (many[1] - many[0]).cross(&(many[2] - many[0]));
            vec![unit_or(-sum, || unit_or(normal, || any_perpendicular(&many[0])))]
        }
    };

    fill_slots(slots, &units, count)
}

fn fill_slots(
    mut slots: Vec<Vector3<f64>>,
    occupied: &[Vector3<f64>],
    count: usize,
) -> Vec<Vector3<f64>> {
    if slots.len() >= count {
        slots.truncate(count);
        return slots;
    }

    let lattice: Vec<Vector3<f64>> = (-1..=1)
        .flat_map(|x| (-1..=1).flat_map(move |y| (-1..=1).map(move |z| (x, y, z))))
        .filter(|&step| step != (0, 0, 0))
        .map(|(x, y, z)| Vector3::new(x as f64, y as f64, z as f64).normalize())
        .collect();

    while slots.len() < count {
        let nearest = |v: &Vector3<f64>| {
            occupied
                .iter()
                .chain(&slots)
                .map(|o| o.dot(v))
                .fold(-1.0, f64::max)
        };
        let best = lattice
            .iter()
            .map(|v| (nearest(v), *v))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        match best {
            Some((cos, v)) if cos < 1.0 - DEGENERATE_NORM => slots.push(v),
            _ => break,
        }
    }

    // Lattice exhausted: more than 26 substituents on one center.
    slots.iter().cycle().take(count).copied().collect()
}

fn isolated_slots(hybridization: Hybridization) -> Vec<Vector3<f64>> {
    match hybridization {
        Hybridization::Sp3 => vec![
            Vector3::new(1.0, 1.0, 1.0).normalize(),
            Vector3::new(1.0, -1.0, -1.0).normalize(),
            Vector3::new(-1.0, 1.0, -1.0).normalize(),
            Vector3::new(-1.0, -1.0, 1.0).normalize(),
        ],
        Hybridization::Sp2 => {
            let (s, c) = 120.0_f64.to_radians().sin_cos();
            vec![
                Vector3::x(),
                Vector3::new(c, s, 0.0),
                Vector3::new(c, -s, 0.0),
            ]
        }
        Hybridization::Sp => vec![Vector3::x(), -Vector3::x()],
    }
}

fn single_neighbor_slots(
    u: &Vector3<f64>,
    neighbor: Point,
    reference: Option<&Point>,
    hybridization: Hybridization,
) -> Vec<Vector3<f64>> {
    let away = -u;

    let perp = reference
        .map(|r| {
            let r = r - neighbor;
            r - u.scale(r.dot(u))
        })
        .filter(|rej| rej.norm() > DEGENERATE_NORM)
        .map(|rej| rej.normalize())
        .unwrap_or_else(|| any_perpendicular(u));

    match hybridization {
        Hybridization::Sp3 => {
            let tilt = (180.0 - TETRAHEDRAL_ANGLE).to_radians();
            let base = away.scale(tilt.cos()) - perp.scale(tilt.sin());
            let axis = Unit::new_normalize(away);
            [0.0_f64, 120.0, 240.0]
                .iter()
                .map(|deg| Rotation3::from_axis_angle(&axis, deg.to_radians()) * base)
                .collect()
        }
        Hybridization::Sp2 => {
            let tilt = 60.0_f64.to_radians();
            vec![
                away.scale(tilt.cos()) - perp.scale(tilt.sin()),
                away.scale(tilt.cos()) + perp.scale(tilt.sin()),
            ]
        }
        Hybridization::Sp => vec![away],
    }
}

fn two_neighbor_slots(
    u0: &Vector3<f64>,
    u1: &Vector3<f64>,
    hybridization: Hybridization,
) -> Vec<Vector3<f64>> {
    let bisector = unit_or(-(u0 + u1), || any_perpendicular(u0));

    match hybridization {
        Hybridization::Sp3 => {
            let normal = unit_or(u0.cross(u1), || any_perpendicular(&bisector));
            let half = (TETRAHEDRAL_ANGLE / 2.0).to_radians();
            vec![
                bisector.scale(half.cos()) + normal.scale(half.sin()),
                bisector.scale(half.cos()) - normal.scale(half.sin()),
            ]
        }
        Hybridization::Sp2 | Hybridization::Sp => vec![bisector],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::smiles::parse_smiles;

    fn angle_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
        a.angle(b).to_degrees()
    }

    #[test]
    fn hybridization_reads_bond_orders() {
        let mol = parse_smiles("C=CC#N").unwrap();
        assert_eq!(hybridization(&mol, 0), Hybridization::Sp2);
        assert_eq!(hybridization(&mol, 2), Hybridization::Sp);

        let mol = parse_smiles("CC").unwrap();
        assert_eq!(hybridization(&mol, 0), Hybridization::Sp3);
    }

    #[test]
    fn amide_nitrogen_is_planar_but_ammonium_is_not() {
        let amide = parse_smiles("CC(=O)N").unwrap();
        assert_eq!(hybridization(&amide, 3), Hybridization::Sp2);

        let ammonium = parse_smiles("CC(=O)C[NH3+]").unwrap();
        assert_eq!(hybridization(&ammonium, 4), Hybridization::Sp3);

        let amine = parse_smiles("CCN").unwrap();
        assert_eq!(hybridization(&amine, 2), Hybridization::Sp3);
    }

    #[test]
    fn bond_length_uses_xh_table_then_radii() {
        assert!((bond_length(Element::C, Element::H) - 1.09).abs() < 1e-12);
        assert!((bond_length(Element::H, Element::O) - 0.96).abs() < 1e-12);
        assert!((bond_length(Element::C, Element::Cl) - 1.78).abs() < 1e-12);
    }

    #[test]
    fn methyl_directions_are_tetrahedral() {
        let center = Point::origin();
        let neighbor = Point::new(-1.5, 0.0, 0.0);
        let dirs = substituent_directions(&center, &[neighbor], None, Hybridization::Sp3, 3);

        assert_eq!(dirs.len(), 3);
        let to_neighbor = Vector3::new(-1.0, 0.0, 0.0);
        for dir in &dirs {
            assert!((dir.norm() - 1.0).abs() < 1e-9);
            assert!((angle_deg(dir, &to_neighbor) - TETRAHEDRAL_ANGLE).abs() < 1e-6);
        }
        assert!((angle_deg(&dirs[0], &dirs[1]) - TETRAHEDRAL_ANGLE).abs() < 1e-6);
    }

    #[test]
    fn first_sp3_direction_is_anti_to_reference() {
        let center = Point::origin();
        let neighbor = Point::new(-1.5, 0.0, 0.0);
        let reference = Point::new(-2.0, 1.4, 0.0);
        let dirs = substituent_directions(
            &center,
            &[neighbor],
            Some(&reference),
            Hybridization::Sp3,
            1,
        );

        assert!(dirs[0].y < 0.0);
        assert!(dirs[0].z.abs() < 1e-9);
    }

    #[test]
    fn sp2_directions_sit_at_120_degrees() {
        let center = Point::origin();
        let neighbor = Point::new(-1.3, 0.0, 0.0);
        let reference = Point::new(-2.0, 1.1, 0.0);
        let dirs = substituent_directions(
            &center,
            &[neighbor],
            Some(&reference),
            Hybridization::Sp2,
            2,
        );

        let to_neighbor = Vector3::new(-1.0, 0.0, 0.0);
        for dir in &dirs {
            assert!((angle_deg(dir, &to_neighbor) - 120.0).abs() < 1e-6);
            assert!(dir.z.abs() < 1e-9);
        }
        assert!((angle_deg(&dirs[0], &dirs[1]) - 120.0).abs() < 1e-6);
    }

    #[test]
    fn two_neighbor_sp2_direction_bisects_outward() {
        let center = Point::origin();
        let neighbors = [Point::new(-1.0, 1.0, 0.0), Point::new(-1.0, -1.0, 0.0)];
        let dirs = substituent_directions(&center, &neighbors, None, Hybridization::Sp2, 1);

        assert!((dirs[0] - Vector3::x()).norm() < 1e-9);
    }

    #[test]
    fn three_neighbor_direction_opposes_their_sum() {
        let center = Point::origin();
        let neighbors = [
            Point::new(1.0, 0.0, -0.3),
            Point::new(-0.5, 0.866, -0.3),
            Point::new(-0.5, -0.866, -0.3),
        ];
        let dirs = substituent_directions(&center, &neighbors, None, Hybridization::Sp3, 1);

        assert!((dirs[0] - Vector3::z()).norm() < 1e-3);
    }

    #[test]
    fn extra_directions_avoid_existing_slots() {
        let dirs = substituent_directions(&Point::origin(), &[], None, Hybridization::Sp, 3);
        assert_eq!(dirs.len(), 3);
        assert!(dirs[2].dot(&dirs[0]).abs() < 1e-9);

        let dirs = substituent_directions(&Point::origin(), &[], None, Hybridization::Sp3, 5);
        assert_eq!(dirs.len(), 5);
        for i in 0..5 {
            assert!((dirs[i].norm() - 1.0).abs() < 1e-9);
            for j in (i + 1)..5 {
                assert!(angle_deg(&dirs[i], &dirs[j]) > 60.0, "slots {i} and {j}");
            }
        }
    }

    #[test]
    fn extra_directions_stay_clear_of_neighbors() {
        let center = Point::origin();
        let neighbors = [Point::new(-1.0, 1.0, 0.0), Point::new(-1.0, -1.0, 0.0)];
        let dirs = substituent_directions(&center, &neighbors, None, Hybridization::Sp2, 2);

        assert!((dirs[0] - Vector3::x()).norm() < 1e-9);
        assert!(angle_deg(&dirs[0], &dirs[1]) > 40.0);
        for n in &neighbors {
            assert!(angle_deg(&dirs[1], &n.coords.normalize()) > 40.0);
        }
    }
}
