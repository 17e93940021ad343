use super::schema::{AmbiguityFile, ResidueTemplateFile};

pub fn load_template_files() -> Vec<ResidueTemplateFile> {
    let mut files = Vec::new();

    macro_rules! load_template {
        ($path:literal) => {
            let content = include_str!(concat!("../../templates/", $path));
            let schema: ResidueTemplateFile = toml::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse template file '{}': {}", $path, e));
            files.push(schema);
        };
    }

    load_template!("flexres/CYS.toml");
    load_template!("flexres/CYM.toml");
    load_template!("flexres/ASP.toml");
    load_template!("flexres/ASH.toml");
    load_template!("flexres/GLU.toml");
    load_template!("flexres/GLH.toml");
    load_template!("flexres/PHE.toml");
    load_template!("flexres/HIE.toml");
    load_template!("flexres/HID.toml");
    load_template!("flexres/HIP.toml");
    load_template!("flexres/ILE.toml");
    load_template!("flexres/LYS.toml");
    load_template!("flexres/LYN.toml");
    load_template!("flexres/LEU.toml");
    load_template!("flexres/MET.toml");
    load_template!("flexres/ASN.toml");
    load_template!("flexres/ASN_mgltools.toml");
    load_template!("flexres/GLN.toml");
    load_template!("flexres/GLN_mgltools.toml");
    load_template!("flexres/ARG.toml");
    load_template!("flexres/ARG_mgltools.toml");
    load_template!("flexres/SER.toml");
    load_template!("flexres/THR.toml");
    load_template!("flexres/VAL.toml");
    load_template!("flexres/TRP.toml");
    load_template!("flexres/TYR.toml");

    files
}

pub fn load_ambiguity_file() -> AmbiguityFile {
    let content = include_str!("../../templates/flexres/ambiguous.toml");
    toml::from_str(content)
        .unwrap_or_else(|e| panic!("Failed to parse ambiguity file 'flexres/ambiguous.toml': {}", e))
}
