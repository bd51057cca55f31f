use miette::Result;
use oshiv_install_core::{InstallOptions, InstalledBinary, Installer, Platform, ReleaseManifest};
use oshiv_install_fetch::HttpFetcher;
use std::path::PathBuf;
use tracing::instrument;

#[instrument(skip_all, fields(platform = %platform, bin_dir = %bin_dir.display()))]
pub async fn execute(
    manifest: ReleaseManifest,
    platform: Platform,
    bin_dir: PathBuf,
) -> Result<String> {
    let version = manifest.version.clone();
    let installer = Installer::new(HttpFetcher::new(), manifest, InstallOptions::new(bin_dir));
    let binary = installer.install(&platform).await?;
    Ok(render(&binary, &version))
}

fn render(binary: &InstalledBinary, version: &str) -> String {
    format!(
        "Installed {} {} ({}) to {}",
        binary.name,
        version,
        binary.target,
        binary.path.display()
    )
}
