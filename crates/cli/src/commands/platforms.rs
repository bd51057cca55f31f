use miette::{IntoDiagnostic, Result};
use oshiv_install_core::{ReleaseArtifact, ReleaseManifest};
use std::fmt::Write;

use crate::cli::OutputFormat;

pub fn execute(manifest: &ReleaseManifest, output: OutputFormat) -> Result<String> {
    let artifacts: Vec<&ReleaseArtifact> = manifest.artifacts().collect();

    match output {
        OutputFormat::Json => serde_json::to_string_pretty(&artifacts).into_diagnostic(),
        OutputFormat::Text => {
            let mut out = String::new();
            for artifact in artifacts {
                let _ = writeln!(
                    out,
                    "{:<12} {}  {}",
                    artifact.target.id(),
                    artifact.sha256,
                    artifact.url
                );
            }
            Ok(out)
        }
    }
}
