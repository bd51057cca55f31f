use oshiv_install_core::{FormulaGenerator, ReleaseManifest};

pub fn execute(manifest: &ReleaseManifest) -> String {
    FormulaGenerator::generate(manifest)
}
