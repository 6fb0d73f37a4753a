//! `stockcheck-recon`: stocktake-versus-catalog reconciliation engine.
//!
//! Pure engine crate: receives scan rows and a catalog row source, returns
//! classified per-article results. No file or network I/O.

pub mod aggregate;
pub mod article;
pub mod category;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod model;
pub mod shift;
pub mod size;
pub mod source;
pub mod summary;
pub mod tokenize;

pub use config::{CatalogConfig, CategoryDefinition};
pub use engine::{run, ReconciliationEngine};
pub use error::ReconError;
pub use lookup::{lookup_article, ArticleLookup};
pub use model::{CatalogRow, Discrepancy, LedgerSet, ReconResult, ScanRow, SizeLedger};
pub use size::{SizeNormalizer, SizeTables};
pub use source::{CatalogSource, MemorySource};
