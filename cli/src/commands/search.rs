//! `please search` command.

use clap::Args;
use please_core::PleaseConfig;
use please_runtime::{CatalogSearch, SearchMode};

use crate::output;

#[derive(Args)]
pub struct SearchArgs {
    /// Package name or approximate name
    pub query: String,

    /// Only report packages whose name matches exactly
    #[arg(long)]
    pub exact: bool,

    /// Maximum fuzzy matches per namespace (defaults to the configured limit)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

pub async fn execute(args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = PleaseConfig::load()?;
    let paths = config.manifest_paths()?;

    let mode = if args.exact {
        SearchMode::Exact
    } else {
        SearchMode::Fuzzy {
            max_results: args.limit.unwrap_or(config.fuzzy_max_results),
        }
    };

    let results = CatalogSearch::new(paths).search(&args.query, mode).await;

    for failure in &results.failures {
        eprintln!(
            "Warning: failed to search {}: {}",
            failure.path.display(),
            failure.error
        );
    }

    if results.is_empty() {
        println!("No packages found matching '{}'", args.query);
        return Ok(());
    }

    let mut table = output::new_table(&["NAMESPACE", "NAME", "DESCRIPTION"]);
    for namespace in results.ordered_namespaces(&config.default_namespace) {
        for manifest in &results.by_namespace[namespace] {
            table.add_row(vec![
                namespace.to_string(),
                manifest.name.clone(),
                output::truncate(&manifest.description, output::DESCRIPTION_WIDTH),
            ]);
        }
    }

    println!("{table}");
    Ok(())
}
