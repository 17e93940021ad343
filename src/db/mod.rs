//! Residue template catalog for flexible side chains.
//!
//! Docking engines do not record a structure descriptor for flexible receptor side chains,
//! so the descriptor is recovered from residue and atom names. Each [`ResidueTemplate`]
//! pairs a SMILES descriptor with its heavy-atom names in descriptor order and with the
//! parent of every hydrogen the engine keeps. [`AmbiguityGroup`]s list the variants worth
//! trying for labels that do not pin down a protonation state or naming convention.
//!
//! The shipped catalog is embedded at compile time and available through
//! [`Catalog::builtin`]; custom catalogs can be assembled with [`Catalog::new`].

mod loader;
mod schema;
mod store;

use crate::model::types::Element;
use crate::ops::Error;
use std::collections::{HashMap, HashSet};

/// One residue variant: descriptor, heavy atoms in descriptor order, and hydrogen parents.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueTemplate {
    name: String,
    smiles: String,
    heavy_atoms: Vec<(String, Element)>,
    hydrogens: Vec<(String, usize)>,
}

impl ResidueTemplate {
    /// Builds a template, resolving hydrogen parents by heavy-atom name.
    ///
    /// # Arguments
    ///
    /// * `name` - Variant name such as `"HIE"`.
    /// * `smiles` - Descriptor whose atom order matches `heavy_atoms`.
    /// * `heavy_atoms` - `(name, element)` pairs in descriptor order.
    /// * `hydrogens` - `(hydrogen name, parent heavy-atom name)` pairs; their order is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTemplateAtom`] when any name appears twice among heavy
    /// atoms and hydrogens, and [`Error::UnknownTemplateParent`] when a hydrogen names a
    /// parent that is not a heavy atom of the template.
    pub fn new(
        name: impl Into<String>,
        smiles: impl Into<String>,
        heavy_atoms: Vec<(String, Element)>,
        hydrogens: Vec<(String, String)>,
    ) -> Result<Self, Error> {
        let name = name.into();

        let mut seen = HashSet::new();
        let all_names = heavy_atoms
            .iter()
            .map(|(n, _)| n)
            .chain(hydrogens.iter().map(|(n, _)| n));
        for atom_name in all_names {
            if !seen.insert(atom_name.as_str()) {
                return Err(Error::duplicate_template_atom(&name, atom_name));
            }
        }

        let resolved = hydrogens
            .into_iter()
            .map(|(h_name, parent)| {
                match heavy_atoms.iter().position(|(n, _)| *n == parent) {
                    Some(idx) => Ok((h_name, idx)),
                    None => Err(Error::UnknownTemplateParent {
                        template: name.clone(),
                        hydrogen: h_name,
                        parent,
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            smiles: smiles.into(),
            heavy_atoms,
            hydrogens: resolved,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    /// Heavy-atom names in descriptor order.
    pub fn heavy_atom_names(&self) -> impl Iterator<Item = &str> {
        self.heavy_atoms.iter().map(|(n, _)| n.as_str())
    }

    pub fn heavy_atom_elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.heavy_atoms.iter().map(|(_, e)| *e)
    }

    /// Hydrogen names with the descriptor index of their parent, in declaration order.
    pub fn hydrogens(&self) -> impl Iterator<Item = (&str, usize)> {
        self.hydrogens.iter().map(|(n, p)| (n.as_str(), *p))
    }

    /// Every atom name the template expects: heavy atoms first, then hydrogens.
    pub fn expected_names(&self) -> impl Iterator<Item = &str> {
        self.heavy_atom_names()
            .chain(self.hydrogens.iter().map(|(n, _)| n.as_str()))
    }

    pub fn expected_count(&self) -> usize {
        self.heavy_atoms.len() + self.hydrogens.len()
    }
}

impl TryFrom<schema::ResidueTemplateFile> for ResidueTemplate {
    type Error = Error;

    fn try_from(file: schema::ResidueTemplateFile) -> Result<Self, Self::Error> {
        Self::new(
            file.info.name,
            file.info.smiles,
            file.atoms.into_iter().map(|a| (a.name, a.element)).collect(),
            file.hydrogens
                .into_iter()
                .map(|h| (h.name, h.parent))
                .collect(),
        )
    }
}

/// Ordered list of variants to try for an ambiguous residue label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguityGroup {
    name: String,
    candidates: Vec<String>,
}

impl AmbiguityGroup {
    pub fn new(name: impl Into<String>, candidates: Vec<String>) -> Self {
        Self {
            name: name.into(),
            candidates,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

/// Immutable collection of residue templates and ambiguity groups.
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<ResidueTemplate>,
    by_name: HashMap<String, usize>,
    groups: HashMap<String, AmbiguityGroup>,
}

impl Catalog {
    /// Validates and indexes a set of templates and ambiguity groups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTemplate`] when two templates share a name and
    /// [`Error::UnknownCandidate`] when a group lists a variant absent from `templates`.
    pub fn new(templates: Vec<ResidueTemplate>, groups: Vec<AmbiguityGroup>) -> Result<Self, Error> {
        let mut by_name = HashMap::with_capacity(templates.len());
        for (idx, template) in templates.iter().enumerate() {
            if by_name.insert(template.name.clone(), idx).is_some() {
                return Err(Error::DuplicateTemplate {
                    template: template.name.clone(),
                });
            }
        }

        let mut indexed = HashMap::with_capacity(groups.len());
        for group in groups {
            if let Some(missing) = group.candidates.iter().find(|c| !by_name.contains_key(*c)) {
                return Err(Error::UnknownCandidate {
                    group: group.name.clone(),
                    candidate: missing.clone(),
                });
            }
            indexed.insert(group.name.clone(), group);
        }

        Ok(Self {
            templates,
            by_name,
            groups: indexed,
        })
    }

    /// The catalog shipped with the crate, parsed once on first use.
    ///
    /// # Panics
    ///
    /// Panics if the embedded template files are malformed or inconsistent.
    pub fn builtin() -> &'static Catalog {
        store::get_catalog()
    }

    pub fn template(&self, name: &str) -> Option<&ResidueTemplate> {
        self.by_name.get(name).map(|&idx| &self.templates[idx])
    }

    /// Templates in declaration order.
    pub fn templates(&self) -> &[ResidueTemplate] {
        &self.templates
    }

    pub fn group(&self, name: &str) -> Option<&AmbiguityGroup> {
        self.groups.get(name)
    }

    /// Variant names to try for `res_name`, in order.
    ///
    /// A label without an ambiguity group expands to itself.
    pub fn candidates<'a>(&'a self, res_name: &'a str) -> Vec<&'a str> {
        match self.groups.get(res_name) {
            Some(group) => group.candidates.iter().map(String::as_str).collect(),
            None => vec![res_name],
        }
    }
}
