use oshiv_install_core::{Platform, ReleaseManifest, Target};
use tracing::instrument;

#[instrument(skip(manifest))]
pub fn get_version_info(manifest: &ReleaseManifest, host: Platform) -> String {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let description = env!("CARGO_PKG_DESCRIPTION");

    let host_target = Target::for_platform(&host)
        .map_or_else(|| "unsupported".to_string(), |t| t.to_string());

    tracing::debug!(%host, %host_target, "Gathered host information");

    format!(
        "{name} {version} - {description}\n\
         Release: {} {} ({})\n\
         Host: {host} -> {host_target}\n\
         Correlation ID: {}",
        manifest.name,
        manifest.version,
        manifest.license,
        crate::tracing::correlation_id()
    )
}
