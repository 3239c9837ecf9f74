//! `please hooks` command.

use std::path::PathBuf;

use clap::Args;
use please_core::PleaseConfig;
use please_runtime::ManifestArchive;

use crate::resolve::{archive_path, parse_identifier};

#[derive(Args)]
pub struct HooksArgs {
    /// Package identifier ([namespace:]package[:version])
    pub package: String,

    /// Read this catalog archive instead of the namespace's archive
    #[arg(long)]
    pub archive: Option<PathBuf>,
}

pub async fn execute(args: HooksArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = PleaseConfig::load()?;
    let id = parse_identifier(&args.package, &config.default_namespace)?;
    let archive = ManifestArchive::open(archive_path(&config, &id, args.archive))?;
    let hooks = archive.load_script_hooks(&id.name)?;

    if hooks.is_empty() {
        println!("No hooks defined for {}", id.name);
        return Ok(());
    }

    if !hooks.pre_hook.is_empty() {
        println!("# pre-hook");
        println!("{}", hooks.pre_hook.trim_end());
    }
    if !hooks.post_hook.is_empty() {
        println!("# post-hook");
        println!("{}", hooks.post_hook.trim_end());
    }
    Ok(())
}
