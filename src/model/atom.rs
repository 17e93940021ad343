//! Graph-level atom record carrying the chemical flags a structure descriptor encodes.
//!
//! Coordinates are deliberately absent: a molecule stores positions per conformer, so the
//! same atom can sit at a different place in every docked pose while its element, charge,
//! and hydrogen bookkeeping stay shared.

use super::types::Element;
use std::fmt;

/// Node of a molecular graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Chemical element.
    pub element: Element,
    /// Formal charge in elementary charges.
    pub formal_charge: i8,
    /// Mass number when the descriptor spells one out (e.g. `[2H]`).
    pub isotope: Option<u16>,
    /// Whether the atom was written in aromatic (lowercase) form.
    pub aromatic: bool,
    /// Hydrogens attached to this atom that are not yet graph atoms.
    pub implicit_hydrogens: u8,
}

impl Atom {
    /// Creates a neutral, non-aromatic atom with no implicit hydrogens.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            isotope: None,
            aromatic: false,
            implicit_hydrogens: 0,
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element.is_hydrogen()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ element: {}, charge: {}, implicit_h: {} }}",
            self.element, self.formal_charge, self.implicit_hydrogens
        )
    }
}
