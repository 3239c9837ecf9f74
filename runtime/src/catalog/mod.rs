//! Package catalog support.
//!
//! Catalogs are compressed archives of package manifests that are searched
//! in place, one streaming pass per operation.
//!
//! # Archive format
//!
//! ```text
//! manifest-core.tar.gz
//! ├── manifest.json            (manifest array, bare or namespace-wrapped)
//! └── hooks/
//!     ├── <pkg>_prehook.sh     (optional)
//!     └── <pkg>_posthook.sh    (optional)
//! ```

mod archive;
mod decoder;
mod fuzzy;
mod search;
mod stream;

pub use archive::{FuzzyMatch, ManifestArchive, ScriptHooks};
pub use decoder::{CatalogFile, ManifestDecoder};
pub use search::{CatalogSearch, SearchFailure, SearchMode, SearchResults};
