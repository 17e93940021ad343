use crate::model::types::Element;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ResidueTemplateFile {
    pub info: TemplateInfo,
    pub atoms: Vec<TemplateHeavyAtom>,
    #[serde(default)]
    pub hydrogens: Vec<TemplateHydrogen>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateInfo {
    pub name: String,
    pub smiles: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateHeavyAtom {
    pub name: String,
    pub element: Element,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateHydrogen {
    pub name: String,
    pub parent: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct AmbiguityFile {
    #[serde(default)]
    pub groups: Vec<AmbiguityEntry>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct AmbiguityEntry {
    pub name: String,
    pub candidates: Vec<String>,
}
