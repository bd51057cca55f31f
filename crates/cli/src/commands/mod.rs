pub mod formula;
pub mod install;
pub mod platforms;
pub mod resolve;
pub mod version;

use miette::Result;
use oshiv_install_core::{ReleaseManifest, default_bin_dir, detect_platform};
use std::path::Path;

use crate::cli::{Cli, Commands};

/// Load the manifest named on the command line, or the built-in one.
pub fn load_manifest(path: Option<&Path>) -> Result<ReleaseManifest> {
    let manifest = match path {
        Some(path) => ReleaseManifest::load(path)?,
        None => ReleaseManifest::builtin()?,
    };
    Ok(manifest)
}

/// Run the parsed command and return what should be written to stdout.
pub async fn execute(cli: Cli) -> Result<String> {
    let manifest = load_manifest(cli.manifest.as_deref())?;

    match cli.command {
        Commands::Install { bin_dir, platform } => {
            let platform = platform.unwrap_or_else(detect_platform);
            let bin_dir = bin_dir.unwrap_or_else(default_bin_dir);
            install::execute(manifest, platform, bin_dir).await
        }
        Commands::Resolve { platform, output } => {
            let platform = platform.unwrap_or_else(detect_platform);
            resolve::execute(&manifest, platform, output)
        }
        Commands::Platforms { output } => platforms::execute(&manifest, output),
        Commands::Formula => Ok(formula::execute(&manifest)),
        Commands::Version => Ok(version::get_version_info(&manifest, detect_platform())),
    }
}
