use super::loader;
use super::{AmbiguityGroup, Catalog, ResidueTemplate};
use std::sync::OnceLock;

static CATALOG: OnceLock<Catalog> = OnceLock::new();

pub fn get_catalog() -> &'static Catalog {
    CATALOG.get_or_init(build_builtin)
}

fn build_builtin() -> Catalog {
    let templates = loader::load_template_files()
        .into_iter()
        .map(ResidueTemplate::try_from)
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| panic!("Invalid built-in residue template: {}", e));

    let groups = loader::load_ambiguity_file()
        .groups
        .into_iter()
        .map(|g| AmbiguityGroup::new(g.name, g.candidates))
        .collect();

    Catalog::new(templates, groups)
        .unwrap_or_else(|e| panic!("Invalid built-in residue catalog: {}", e))
}
