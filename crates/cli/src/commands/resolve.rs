use miette::{IntoDiagnostic, Result};
use oshiv_install_core::{Platform, ReleaseArtifact, ReleaseManifest};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cli::OutputFormat;

#[derive(Serialize)]
struct Resolution<'a> {
    platform: String,
    #[serde(flatten)]
    artifact: &'a ReleaseArtifact,
}

/// Resolve the artifact for `platform` without touching the network.
#[instrument(skip_all, fields(platform = %platform))]
pub fn execute(
    manifest: &ReleaseManifest,
    platform: Platform,
    output: OutputFormat,
) -> Result<String> {
    let artifact = manifest.resolve(&platform)?;
    debug!(target_id = %artifact.target, "Resolved release artifact");

    match output {
        OutputFormat::Json => serde_json::to_string_pretty(&Resolution {
            platform: platform.to_string(),
            artifact,
        })
        .into_diagnostic(),
        OutputFormat::Text => Ok(format!(
            "platform: {platform}\n\
             target:   {}\n\
             url:      {}\n\
             sha256:   {}\n\
             binary:   {}",
            artifact.target, artifact.url, artifact.sha256, artifact.binary_name
        )),
    }
}
