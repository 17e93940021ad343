use crate::chem;
use crate::io::error::Error;
use crate::model::{
    conformer::Conformer,
    molecule::Molecule,
    types::{BondOrder, Point},
};
use std::io::Write;

const FORMAT: &str = "SDF";
const MAX_COUNT: usize = 999;
const MAX_PROPERTY_ENTRIES: usize = 8;

/// One `> <tag>` data item attached to an SD record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataItem {
    pub tag: String,
    pub value: String,
}

impl DataItem {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

/// Writes every conformer of `molecule` as an MDL V2000 SD record.
///
/// Records share the graph and differ in coordinates. Aromatic bonds are written in
/// Kekulé form; when no Kekulé structure exists they keep the aromatic bond type.
///
/// # Arguments
///
/// * `writer` - Destination stream.
/// * `molecule` - Graph and conformers to write.
/// * `data` - Data items per conformer, indexed like the conformers; conformers without
///   an entry get no data items.
///
/// # Errors
///
/// Returns [`Error::InconsistentData`] when the molecule has more atoms or bonds than
/// the V2000 counts line can hold, and [`Error::Io`] when writing fails.
pub fn write_sdf<W: Write>(
    writer: W,
    molecule: &Molecule,
    data: &[Vec<DataItem>],
) -> Result<(), Error> {
    if molecule.atom_count() > MAX_COUNT || molecule.bond_count() > MAX_COUNT {
        return Err(Error::inconsistent_data(
            FORMAT,
            format!(
                "V2000 holds at most {} atoms and bonds, got {} atoms and {} bonds",
                MAX_COUNT,
                molecule.atom_count(),
                molecule.bond_count()
            ),
        ));
    }

    let orders = match chem::kekulize(molecule) {
        Ok(orders) => orders,
        Err(e) => {
            log::warn!("writing aromatic bond types: {}", e);
            molecule.bonds().iter().map(|b| b.order).collect()
        }
    };

    let mut ctx = WriterContext {
        writer,
        molecule,
        orders: &orders,
    };
    for (i, conformer) in molecule.conformers().iter().enumerate() {
        let items = data.get(i).map(Vec::as_slice).unwrap_or_default();
        ctx.write_record(conformer, items, i + 1)?;
    }
    ctx.writer.flush().map_err(|e| Error::from_io(FORMAT, e))
}

struct WriterContext<'a, W> {
    writer: W,
    molecule: &'a Molecule,
    orders: &'a [BondOrder],
}

impl<W: Write> WriterContext<'_, W> {
    fn line(&mut self, text: &str) -> Result<(), Error> {
        writeln!(self.writer, "{}", text).map_err(|e| Error::from_io(FORMAT, e))
    }

    fn write_record(
        &mut self,
        conformer: &Conformer,
        items: &[DataItem],
        record_number: usize,
    ) -> Result<(), Error> {
        self.write_header()?;
        self.write_atoms(conformer)?;
        self.write_bonds()?;
        self.write_properties()?;
        self.line("M  END")?;

        for item in items {
            self.line(&format!(">  <{}>  ({})", item.tag, record_number))?;
            self.line(&item.value)?;
            self.line("")?;
        }
        self.line("$$$$")
    }

    fn write_header(&mut self) -> Result<(), Error> {
        self.line("")?;
        self.line(&format!("  {:<8}{:10}3D", "PoseFrg", ""))?;
        self.line("")?;
        self.line(&format!(
            "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
            self.molecule.atom_count(),
            self.molecule.bond_count()
        ))
    }

    fn write_atoms(&mut self, conformer: &Conformer) -> Result<(), Error> {
        let molecule = self.molecule;
        for (idx, atom) in molecule.atoms().iter().enumerate() {
            let pos = conformer.position(idx).unwrap_or_else(Point::origin);
            self.line(&format!(
                "{:>10.4}{:>10.4}{:>10.4} {:<3} 0{}",
                pos.x,
                pos.y,
                pos.z,
                atom.element.symbol(),
                "  0".repeat(11)
            ))?;
        }
        Ok(())
    }

    fn write_bonds(&mut self) -> Result<(), Error> {
        let molecule = self.molecule;
        for (bond, order) in molecule.bonds().iter().zip(self.orders) {
            self.line(&format!(
                "{:>3}{:>3}{:>3}  0",
                bond.a1_idx + 1,
                bond.a2_idx + 1,
                order.sdf_code()
            ))?;
        }
        Ok(())
    }

    fn write_properties(&mut self) -> Result<(), Error> {
        let molecule = self.molecule;
        let charges: Vec<(usize, i32)> = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.formal_charge != 0)
            .map(|(i, a)| (i + 1, i32::from(a.formal_charge)))
            .collect();
        let isotopes: Vec<(usize, i32)> = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.isotope.map(|m| (i + 1, i32::from(m))))
            .collect();

        self.write_property_block("CHG", &charges)?;
        self.write_property_block("ISO", &isotopes)
    }

    fn write_property_block(&mut self, kind: &str, entries: &[(usize, i32)]) -> Result<(), Error> {
        for chunk in entries.chunks(MAX_PROPERTY_ENTRIES) {
            let mut text = format!("M  {}{:>3}", kind, chunk.len());
            for (atom, value) in chunk {
                text.push_str(&format!(" {:>3} {:>3}", atom, value));
            }
            self.line(&text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{atom::Atom, types::Element};

    fn written(molecule: &Molecule, data: &[Vec<DataItem>]) -> String {
        let mut buffer = Vec::new();
        write_sdf(&mut buffer, molecule, data).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn ethanol() -> Molecule {
        let mut mol = chem::parse_smiles("CCO").unwrap();
        mol.add_conformer(vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.5, 0.0, 0.0),
            Point::new(2.0, 1.25, -0.5),
        ]);
        mol.add_conformer(vec![Point::new(1.0, 1.0, 1.0); 3]);
        mol
    }

    #[test]
    fn one_record_per_conformer_with_v2000_layout() {
        let text = written(&ethanol(), &[]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(text.matches("$$$$").count(), 2);
        assert_eq!(lines[0], "");
        assert_eq!(lines[3], "  3  2  0  0  0  0  0  0  0  0999 V2000");
        assert_eq!(
            lines[6],
            "    2.0000    1.2500   -0.5000 O   0  0  0  0  0  0  0  0  0  0  0  0"
        );
        assert_eq!(lines[7], "  1  2  1  0");
        assert_eq!(lines[9], "M  END");
        assert_eq!(lines[10], "$$$$");
        assert_eq!(
            lines[15],
            "    1.0000    1.0000    1.0000 C   0  0  0  0  0  0  0  0  0  0  0  0"
        );
    }

    #[test]
    fn data_items_follow_m_end_with_record_number() {
        let data = vec![
            vec![DataItem::new("docking", "{\"free_energy\":-7.5}")],
            vec![DataItem::new("docking", "{}")],
        ];
        let text = written(&ethanol(), &data);

        assert!(text.contains("M  END\n>  <docking>  (1)\n{\"free_energy\":-7.5}\n\n$$$$\n"));
        assert!(text.contains(">  <docking>  (2)\n{}\n\n$$$$\n"));
    }

    #[test]
    fn aromatic_rings_are_written_kekulized() {
        let mut mol = chem::parse_smiles("c1ccccc1").unwrap();
        mol.add_conformer(vec![Point::origin(); 6]);

        let text = written(&mol, &[]);
        let bond_codes: Vec<&str> = text
            .lines()
            .skip(10)
            .take(6)
            .map(|l| &l[6..9])
            .collect();

        assert_eq!(bond_codes.iter().filter(|c| **c == "  2").count(), 3);
        assert_eq!(bond_codes.iter().filter(|c| **c == "  1").count(), 3);
    }

    #[test]
    fn charges_and_isotopes_get_property_lines() {
        let mut mol = chem::parse_smiles("CC[NH3+]").unwrap();
        let mut deuterium = Atom::new(Element::H);
        deuterium.isotope = Some(2);
        let d = mol.add_atom(deuterium);
        mol.add_bond(0, d, BondOrder::Single);
        mol.add_conformer(vec![Point::origin(); 4]);

        let text = written(&mol, &[]);

        assert!(text.contains("\nM  CHG  1   3   1\n"));
        assert!(text.contains("\nM  ISO  1   4   2\n"));
    }

    #[test]
    fn charge_lines_hold_at_most_eight_entries() {
        let mut mol = Molecule::new();
        for _ in 0..9 {
            let mut ion = Atom::new(Element::Na);
            ion.formal_charge = 1;
            mol.add_atom(ion);
        }
        mol.add_conformer(vec![Point::origin(); 9]);

        let text = written(&mol, &[]);
        let chg: Vec<&str> = text.lines().filter(|l| l.starts_with("M  CHG")).collect();

        assert_eq!(chg.len(), 2);
        assert!(chg[0].starts_with("M  CHG  8"));
        assert_eq!(chg[1], "M  CHG  1   9   1");
    }

    #[test]
    fn oversized_molecules_are_rejected() {
        let mut mol = Molecule::new();
        for _ in 0..1000 {
            mol.add_atom(Atom::new(Element::C));
        }

        let mut buffer = Vec::new();
        let err = write_sdf(&mut buffer, &mol, &[]).unwrap_err();
        assert!(matches!(err, Error::InconsistentData { .. }));
    }

    #[test]
    fn molecule_without_conformers_writes_nothing() {
        let mol = chem::parse_smiles("CCO").unwrap();
        assert_eq!(written(&mol, &[]), "");
    }
}
