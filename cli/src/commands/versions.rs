//! `please versions` command.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use please_core::{PleaseConfig, PleaseError};
use please_runtime::{ManifestArchive, RegistryVersionClient};

use crate::resolve::{archive_path, parse_identifier};

#[derive(Args)]
pub struct VersionsArgs {
    /// Package identifier ([namespace:]package[:version])
    pub package: String,

    /// Read this catalog archive instead of the namespace's archive
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Give up on registry discovery after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

pub async fn execute(args: VersionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = PleaseConfig::load()?;
    let id = parse_identifier(&args.package, &config.default_namespace)?;
    let archive = ManifestArchive::open(archive_path(&config, &id, args.archive))?;
    let manifest = archive.exact_match(&id.name)?;

    let client = RegistryVersionClient::new(config.registry.clone())?;
    let versions = if manifest.uses_version_discovery() {
        let deadline = Duration::from_secs(args.timeout.unwrap_or(config.registry.timeout_secs));
        client.list_versions_within(&manifest, deadline).await?
    } else {
        client.resolve_versions(&manifest).await?
    };

    if let Some(requested) = &id.version {
        if !versions.iter().any(|v| v == requested) {
            return Err(PleaseError::NotFound {
                name: format!("{}:{}", manifest.name, requested),
            }
            .into());
        }
        println!("{requested}");
        return Ok(());
    }

    if versions.is_empty() {
        println!("No versions available for {}", manifest.name);
        return Ok(());
    }

    for version in &versions {
        if *version == manifest.default_version {
            println!("{version} (default)");
        } else {
            println!("{version}");
        }
    }
    Ok(())
}
