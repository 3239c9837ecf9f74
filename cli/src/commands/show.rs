//! `please show` command.

use std::path::PathBuf;

use clap::Args;
use please_core::PleaseConfig;
use please_runtime::ManifestArchive;

use crate::output;
use crate::resolve::{archive_path, local_platform, parse_identifier};

#[derive(Args)]
pub struct ShowArgs {
    /// Package identifier ([namespace:]package[:version])
    pub package: String,

    /// Read this catalog archive instead of the namespace's archive
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Print the raw manifest as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = PleaseConfig::load()?;
    let id = parse_identifier(&args.package, &config.default_namespace)?;
    let archive = ManifestArchive::open(archive_path(&config, &id, args.archive))?;
    let manifest = archive.exact_match(&id.name)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    let mut rows = output::manifest_rows(&manifest);
    if let Some(platform) = manifest.select_platform(&local_platform()) {
        rows.push(("Run platform", platform.to_string()));
    }

    println!("Package information: {}:{}", archive.namespace(), manifest.name);
    println!("{}", output::key_value_table(&rows));
    Ok(())
}
