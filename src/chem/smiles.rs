//! SMILES reader producing a [`Molecule`] in string order.
//!
//! The reader covers the OpenSMILES features docking preparation tools emit: organic-subset
//! and bracket atoms, explicit bond symbols, branches, ring closures (including `%nn`), and
//! dot-disconnected components. Stereo marks and atom classes are accepted and dropped; the
//! graph only keeps element, charge, isotope, aromaticity, and hydrogen counts.
//!
//! Atom `i` of the returned molecule is the `i`-th atom written in the string. Index
//! correspondences recorded at docking time rely on exactly this numbering.

use super::error::Error;
use super::valence;
use crate::model::{
    atom::Atom,
    molecule::Molecule,
    types::{BondOrder, Element},
};
use std::collections::HashMap;

/// Parses a SMILES string into a molecular graph without conformers.
///
/// Organic-subset atoms receive implicit hydrogens from their default valences; bracket
/// atoms carry exactly the hydrogen count written inside the brackets. `[H]` atoms become
/// real graph atoms.
///
/// # Errors
///
/// Returns [`Error::Smiles`] with the byte offset of the first problem.
pub fn parse_smiles(smiles: &str) -> Result<Molecule, Error> {
    Parser::new(smiles).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondSymbol {
    Single,
    Double,
    Triple,
    Aromatic,
    Directional,
}

impl BondSymbol {
    fn order(self) -> BondOrder {
        match self {
            BondSymbol::Single | BondSymbol::Directional => BondOrder::Single,
            BondSymbol::Double => BondOrder::Double,
            BondSymbol::Triple => BondOrder::Triple,
            BondSymbol::Aromatic => BondOrder::Aromatic,
        }
    }
}

struct Parser<'a> {
    smiles: &'a str,
    bytes: &'a [u8],
    pos: usize,
    mol: Molecule,
    prev: Option<usize>,
    branches: Vec<Option<usize>>,
    pending_bond: Option<(BondSymbol, usize)>,
    rings: HashMap<u16, (usize, Option<BondSymbol>, usize)>,
    bracketed: Vec<bool>,
}

impl<'a> Parser<'a> {
    fn new(smiles: &'a str) -> Self {
        Self {
            smiles,
            bytes: smiles.as_bytes(),
            pos: 0,
            mol: Molecule::new(),
            prev: None,
            branches: Vec::new(),
            pending_bond: None,
            rings: HashMap::new(),
            bracketed: Vec::new(),
        }
    }

    fn error(&self, position: usize, details: impl Into<String>) -> Error {
        Error::smiles(self.smiles, position, details)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn run(mut self) -> Result<Molecule, Error> {
        while let Some(c) = self.peek() {
            match c {
                b'(' => {
                    if self.prev.is_none() {
                        return Err(self.error(self.pos, "branch without preceding atom"));
                    }
                    self.branches.push(self.prev);
                    self.pos += 1;
                }
                b')' => {
                    if let Some((_, at)) = self.pending_bond {
                        return Err(self.error(at, "bond symbol before ')'"));
                    }
                    let restored = self
                        .branches
                        .pop()
                        .ok_or_else(|| self.error(self.pos, "unmatched ')'"))?;
                    self.prev = restored;
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => {
                    if self.pending_bond.is_some() {
                        return Err(self.error(self.pos, "consecutive bond symbols"));
                    }
                    let symbol = match c {
                        b'-' => BondSymbol::Single,
                        b'=' => BondSymbol::Double,
                        b'#' => BondSymbol::Triple,
                        b':' => BondSymbol::Aromatic,
                        _ => BondSymbol::Directional,
                    };
                    self.pending_bond = Some((symbol, self.pos));
                    self.pos += 1;
                }
                b'$' => return Err(self.error(self.pos, "quadruple bonds are not supported")),
                b'.' => {
                    if let Some((_, at)) = self.pending_bond {
                        return Err(self.error(at, "bond symbol before '.'"));
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                b'0'..=b'9' => {
                    let number = (c - b'0') as u16;
                    let start = self.pos;
                    self.pos += 1;
                    self.ring_closure(number, start)?;
                }
                b'%' => {
                    let start = self.pos;
                    let (Some(d1), Some(d2)) = (self.peek_at(1), self.peek_at(2)) else {
                        return Err(self.error(start, "'%' must be followed by two digits"));
                    };
                    if !d1.is_ascii_digit() || !d2.is_ascii_digit() {
                        return Err(self.error(start, "'%' must be followed by two digits"));
                    }
                    let number = ((d1 - b'0') * 10 + (d2 - b'0')) as u16;
                    self.pos += 3;
                    self.ring_closure(number, start)?;
                }
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.attach(atom, true)?;
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.attach(atom, false)?;
                }
            }
        }

        if let Some((_, at)) = self.pending_bond {
            return Err(self.error(at, "dangling bond at end of input"));
        }
        if !self.branches.is_empty() {
            return Err(self.error(self.bytes.len(), "unclosed branch"));
        }
        if let Some((number, (_, _, at))) = self.rings.iter().min_by_key(|(_, v)| v.2) {
            return Err(self.error(*at, format!("unclosed ring bond {}", number)));
        }

        for idx in 0..self.mol.atom_count() {
            if !self.bracketed[idx] {
                let count = valence::organic_implicit_hydrogens(&self.mol, idx);
                if let Some(atom) = self.mol.atom_mut(idx) {
                    atom.implicit_hydrogens = count;
                }
            }
        }

        Ok(self.mol)
    }

    fn attach(&mut self, atom: Atom, bracketed: bool) -> Result<(), Error> {
        let aromatic = atom.aromatic;
        let idx = self.mol.add_atom(atom);
        self.bracketed.push(bracketed);

        match (self.prev, self.pending_bond.take()) {
            (Some(prev), symbol) => {
                let order = match symbol {
                    Some((symbol, _)) => symbol.order(),
                    None => self.implicit_order(prev, aromatic),
                };
                self.mol.add_bond(prev, idx, order);
            }
            (None, Some((_, at))) => {
                return Err(self.error(at, "bond without preceding atom"));
            }
            (None, None) => {}
        }

        self.prev = Some(idx);
        Ok(())
    }

    fn implicit_order(&self, other: usize, aromatic: bool) -> BondOrder {
        let other_aromatic = self.mol.atom(other).map(|a| a.aromatic).unwrap_or(false);
        if aromatic && other_aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn ring_closure(&mut self, number: u16, start: usize) -> Result<(), Error> {
        let current = self
            .prev
            .ok_or_else(|| self.error(start, "ring bond without preceding atom"))?;
        let symbol = self.pending_bond.take().map(|(s, _)| s);

        match self.rings.remove(&number) {
            None => {
                self.rings.insert(number, (current, symbol, start));
            }
            Some((opening, opening_symbol, _)) => {
                if opening == current {
                    return Err(self.error(start, "ring bond closes on the same atom"));
                }
                let resolved = match (opening_symbol, symbol) {
                    (Some(a), Some(b)) if a.order() != b.order() => {
                        return Err(self.error(start, "conflicting ring bond symbols"));
                    }
                    (Some(a), _) | (None, Some(a)) => Some(a),
                    (None, None) => None,
                };
                if self.mol.bond_between(opening, current).is_some() {
                    return Err(self.error(start, "ring bond duplicates an existing bond"));
                }
                let aromatic = self.mol.atom(current).map(|a| a.aromatic).unwrap_or(false);
                let order = match resolved {
                    Some(symbol) => symbol.order(),
                    None => self.implicit_order(opening, aromatic),
                };
                self.mol.add_bond(opening, current, order);
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<Atom, Error> {
        let start = self.pos;
        let c = self.peek().unwrap_or(b' ');
        let next = self.peek_at(1);

        let (element, aromatic, width) = match (c, next) {
            (b'C', Some(b'l')) => (Element::Cl, false, 2),
            (b'B', Some(b'r')) => (Element::Br, false, 2),
            (b'B', _) => (Element::B, false, 1),
            (b'C', _) => (Element::C, false, 1),
            (b'N', _) => (Element::N, false, 1),
            (b'O', _) => (Element::O, false, 1),
            (b'P', _) => (Element::P, false, 1),
            (b'S', _) => (Element::S, false, 1),
            (b'F', _) => (Element::F, false, 1),
            (b'I', _) => (Element::I, false, 1),
            (b'b', _) => (Element::B, true, 1),
            (b'c', _) => (Element::C, true, 1),
            (b'n', _) => (Element::N, true, 1),
            (b'o', _) => (Element::O, true, 1),
            (b'p', _) => (Element::P, true, 1),
            (b's', _) => (Element::S, true, 1),
            (b'*', _) => (Element::Unknown, false, 1),
            _ => {
                return Err(self.error(
                    start,
                    format!("unexpected character '{}'", self.smiles[start..].chars().next().unwrap_or('?')),
                ));
            }
        };

        self.pos += width;
        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        Ok(atom)
    }

    fn bracket_atom(&mut self) -> Result<Atom, Error> {
        let open = self.pos;
        self.pos += 1;

        let isotope = self.read_bounded::<u16>("isotope")?;

        let (element, aromatic) = self.bracket_symbol()?;

        self.skip_chirality();

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            hydrogens = self.read_bounded::<u8>("hydrogen count")?.unwrap_or(1);
        }

        let mut charge = 0i8;
        if let Some(sign @ (b'+' | b'-')) = self.peek() {
            let sign_pos = self.pos;
            self.pos += 1;
            let unit: i8 = if sign == b'+' { 1 } else { -1 };
            let value = match self.read_bounded::<i8>("charge")? {
                Some(magnitude) => magnitude.checked_mul(unit),
                None => {
                    let mut total = Some(unit);
                    while self.peek() == Some(sign) {
                        self.pos += 1;
                        total = total.and_then(|c| c.checked_add(unit));
                    }
                    total
                }
            };
            charge = value.ok_or_else(|| self.error(sign_pos, "charge out of range"))?;
        }

        if self.peek() == Some(b':') {
            self.pos += 1;
            if self.read_number().is_none() {
                return Err(self.error(self.pos, "atom class must be numeric"));
            }
        }

        if self.peek() != Some(b']') {
            return Err(self.error(open, "unterminated bracket atom"));
        }
        self.pos += 1;

        let mut atom = Atom::new(element);
        atom.isotope = isotope;
        atom.aromatic = aromatic;
        atom.formal_charge = charge;
        atom.implicit_hydrogens = hydrogens;
        Ok(atom)
    }

    fn bracket_symbol(&mut self) -> Result<(Element, bool), Error> {
        let start = self.pos;
        let Some(first) = self.peek() else {
            return Err(self.error(start, "missing element symbol"));
        };

        if first == b'*' {
            self.pos += 1;
            return Ok((Element::Unknown, false));
        }

        if first.is_ascii_lowercase() {
            let two = self.smiles.get(start..start + 2);
            let (element, width) = match two {
                Some("se") => (Element::Se, 2),
                Some("as") => (Element::As, 2),
                _ => match first {
                    b'b' => (Element::B, 1),
                    b'c' => (Element::C, 1),
                    b'n' => (Element::N, 1),
                    b'o' => (Element::O, 1),
                    b'p' => (Element::P, 1),
                    b's' => (Element::S, 1),
                    _ => return Err(self.error(start, "invalid aromatic symbol")),
                },
            };
            self.pos += width;
            return Ok((element, true));
        }

        if !first.is_ascii_uppercase() {
            return Err(self.error(start, "missing element symbol"));
        }

        if let Some(second) = self.peek_at(1).filter(u8::is_ascii_lowercase) {
            let symbol = [first, second];
            if let Some(element) = std::str::from_utf8(&symbol)
                .ok()
                .and_then(|s| s.parse::<Element>().ok())
            {
                self.pos += 2;
                return Ok((element, false));
            }
        }

        let symbol = [first];
        let element = std::str::from_utf8(&symbol)
            .ok()
            .and_then(|s| s.parse::<Element>().ok())
            .ok_or_else(|| self.error(start, "unknown element symbol"))?;
        self.pos += 1;
        Ok((element, false))
    }

    fn skip_chirality(&mut self) {
        if self.peek() != Some(b'@') {
            return;
        }
        while self.peek() == Some(b'@') {
            self.pos += 1;
        }
        let tag = self.smiles.get(self.pos..self.pos + 2);
        if matches!(tag, Some("TH" | "AL" | "SP" | "TB" | "OH")) {
            self.pos += 2;
            let _ = self.read_number();
        }
    }

    /// Reads a digit run into `T`, failing when it does not fit.
    fn read_bounded<T: TryFrom<u32>>(&mut self, what: &str) -> Result<Option<T>, Error> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        self.smiles[start..self.pos]
            .parse::<u32>()
            .ok()
            .and_then(|n| T::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| self.error(start, format!("{what} out of range")))
    }

    fn read_number(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        self.smiles[start..self.pos].parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(mol: &Molecule) -> Vec<Element> {
        mol.atoms().iter().map(|a| a.element).collect()
    }

    fn hydrogens(mol: &Molecule) -> Vec<u8> {
        mol.atoms().iter().map(|a| a.implicit_hydrogens).collect()
    }

    #[test]
    fn parses_linear_chain_with_implicit_hydrogens() {
        let mol = parse_smiles("CCO").unwrap();

        assert_eq!(elements(&mol), vec![Element::C, Element::C, Element::O]);
        assert_eq!(hydrogens(&mol), vec![3, 2, 1]);
        assert_eq!(mol.bond_count(), 2);
    }

    #[test]
    fn parses_branches_and_double_bonds() {
        let mol = parse_smiles("CCC(=O)[O-]").unwrap();

        assert_eq!(mol.atom_count(), 5);
        assert_eq!(
            mol.bond_between(2, 3).map(|b| b.order),
            Some(BondOrder::Double)
        );
        assert_eq!(
            mol.bond_between(2, 4).map(|b| b.order),
            Some(BondOrder::Single)
        );
        assert_eq!(mol.atom(4).map(|a| a.formal_charge), Some(-1));
        assert_eq!(hydrogens(&mol), vec![3, 2, 0, 0, 0]);
    }

    #[test]
    fn parses_aromatic_ring_closures() {
        let mol = parse_smiles("CCc1ccccc1").unwrap();

        assert_eq!(mol.atom_count(), 8);
        assert_eq!(mol.bond_count(), 8);
        assert_eq!(
            mol.bond_between(2, 7).map(|b| b.order),
            Some(BondOrder::Aromatic)
        );
        assert_eq!(
            mol.bond_between(1, 2).map(|b| b.order),
            Some(BondOrder::Single)
        );
        assert_eq!(hydrogens(&mol), vec![3, 2, 0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn bracket_atoms_keep_written_hydrogen_count_and_charge() {
        let mol = parse_smiles("CCCCC[NH3+]").unwrap();
        let nz = mol.atom(5).unwrap();

        assert_eq!(nz.element, Element::N);
        assert_eq!(nz.implicit_hydrogens, 3);
        assert_eq!(nz.formal_charge, 1);

        let mol = parse_smiles("CCc1c[nH+]c[nH]1").unwrap();
        assert_eq!(hydrogens(&mol), vec![3, 2, 0, 1, 1, 1, 1]);
        assert!(mol.atom(4).unwrap().aromatic);
    }

    #[test]
    fn pyrrole_type_atoms_take_no_implicit_hydrogen() {
        let mol = parse_smiles("c1ccoc1").unwrap();
        assert_eq!(hydrogens(&mol), vec![1, 1, 1, 0, 1]);

        let mol = parse_smiles("Cn1cccc1").unwrap();
        assert_eq!(mol.atom(1).unwrap().implicit_hydrogens, 0);

        let mol = parse_smiles("c1ccncc1").unwrap();
        assert_eq!(mol.atom(3).unwrap().implicit_hydrogens, 0);
    }

    #[test]
    fn explicit_hydrogen_atoms_are_graph_atoms() {
        let mol = parse_smiles("[2H]OC").unwrap();

        assert_eq!(elements(&mol), vec![Element::H, Element::O, Element::C]);
        assert_eq!(mol.atom(0).unwrap().isotope, Some(2));
        assert_eq!(hydrogens(&mol), vec![0, 0, 3]);
    }

    #[test]
    fn parses_two_letter_and_multi_digit_ring_symbols() {
        let mol = parse_smiles("ClC%10CCBr.C%10").unwrap();

        assert_eq!(
            elements(&mol),
            vec![Element::Cl, Element::C, Element::C, Element::C, Element::Br, Element::C]
        );
        assert!(mol.bond_between(1, 5).is_some());
        assert!(mol.bond_between(4, 5).is_none());
    }

    #[test]
    fn ignores_stereo_marks_and_atom_classes() {
        let mol = parse_smiles("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(mol.atom(1).unwrap().implicit_hydrogens, 1);

        let mol = parse_smiles("F/C=C/F").unwrap();
        assert_eq!(mol.bond_count(), 3);

        let mol = parse_smiles("[CH3:1]C").unwrap();
        assert_eq!(mol.atom(0).unwrap().implicit_hydrogens, 3);
    }

    #[test]
    fn ring_bond_symbol_may_appear_on_either_end() {
        let mol = parse_smiles("C=1CCCC1").unwrap();
        assert_eq!(
            mol.bond_between(0, 4).map(|b| b.order),
            Some(BondOrder::Double)
        );
        assert_eq!(hydrogens(&mol), vec![1, 2, 2, 2, 1]);
    }

    #[test]
    fn parses_charges_written_as_repeated_signs() {
        let mol = parse_smiles("[O--]").unwrap();
        assert_eq!(mol.atom(0).unwrap().formal_charge, -2);

        let mol = parse_smiles("[Fe+3]").unwrap();
        assert_eq!(mol.atom(0).unwrap().formal_charge, 3);
    }

    #[test]
    fn rejects_charges_beyond_signed_byte() {
        let err = parse_smiles("[N-128]").unwrap_err();
        assert_eq!(err, Error::smiles("[N-128]", 3, "charge out of range"));

        let repeated = format!("[N{}]", "+".repeat(130));
        match parse_smiles(&repeated) {
            Err(Error::Smiles { position, details, .. }) => {
                assert_eq!(position, 2);
                assert_eq!(details, "charge out of range");
            }
            other => panic!("expected charge error, got {other:?}"),
        }

        let mol = parse_smiles("[N-127]").unwrap();
        assert_eq!(mol.atom(0).unwrap().formal_charge, -127);
    }

    #[test]
    fn rejects_hydrogen_counts_and_isotopes_that_do_not_fit() {
        let err = parse_smiles("[NH256]").unwrap_err();
        assert_eq!(err, Error::smiles("[NH256]", 3, "hydrogen count out of range"));

        let err = parse_smiles("[70000C]").unwrap_err();
        assert_eq!(err, Error::smiles("[70000C]", 1, "isotope out of range"));

        let err = parse_smiles("[C+99999999999]").unwrap_err();
        assert_eq!(err, Error::smiles("[C+99999999999]", 3, "charge out of range"));

        let mol = parse_smiles("[13CH4]").unwrap();
        assert_eq!(mol.atom(0).unwrap().isotope, Some(13));
        assert_eq!(mol.atom(0).unwrap().implicit_hydrogens, 4);
    }

    #[test]
    fn parses_metal_centers_from_the_lower_periodic_table() {
        let mol = parse_smiles("N[Pt+2](N)(Cl)Cl").unwrap();
        assert_eq!(
            elements(&mol),
            vec![Element::N, Element::Pt, Element::N, Element::Cl, Element::Cl]
        );
        assert_eq!(mol.atom(1).unwrap().formal_charge, 2);
        assert_eq!(mol.atom(1).unwrap().implicit_hydrogens, 0);

        let mol = parse_smiles("[Gd+3].[Hg]").unwrap();
        assert_eq!(elements(&mol), vec![Element::Gd, Element::Hg]);
    }

    #[test]
    fn empty_input_produces_empty_molecule() {
        let mol = parse_smiles("").unwrap();
        assert_eq!(mol.atom_count(), 0);
    }

    #[test]
    fn rejects_malformed_input_with_position() {
        let cases = [
            ("C(C", "unclosed branch"),
            ("CC)", "unmatched ')'"),
            ("C1CC", "unclosed ring bond 1"),
            ("=C", "bond without preceding atom"),
            ("C==C", "consecutive bond symbols"),
            ("C[Xx]", "unknown element symbol"),
            ("CQ", "unexpected character 'Q'"),
            ("C[C", "unterminated bracket atom"),
            ("C=1CC-1", "conflicting ring bond symbols"),
            ("C11", "ring bond closes on the same atom"),
            ("C%1", "'%' must be followed by two digits"),
        ];

        for (smiles, expected) in cases {
            match parse_smiles(smiles) {
                Err(Error::Smiles { details, .. }) => {
                    assert_eq!(details, expected, "input {smiles}");
                }
                other => panic!("expected error for {smiles}, got {other:?}"),
            }
        }
    }

    #[test]
    fn error_reports_byte_offset() {
        let err = parse_smiles("CCQ").unwrap_err();
        assert_eq!(
            err,
            Error::smiles("CCQ", 2, "unexpected character 'Q'")
        );
    }
}
