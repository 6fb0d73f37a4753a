use std::collections::HashMap;

use crate::config::CategoryDefinition;
use crate::error::ReconError;
use crate::model::CatalogRow;

/// Where catalog rows come from. Implementations do the I/O; the engine
/// asks for each category at most once per run.
pub trait CatalogSource {
    fn fetch_rows(&self, category: &CategoryDefinition) -> Result<Vec<CatalogRow>, ReconError>;
}

impl<S: CatalogSource + ?Sized> CatalogSource for &S {
    fn fetch_rows(&self, category: &CategoryDefinition) -> Result<Vec<CatalogRow>, ReconError> {
        (**self).fetch_rows(category)
    }
}

/// Pre-loaded rows per category name. Categories without rows read as empty.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: HashMap<String, Vec<CatalogRow>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, category: impl Into<String>, rows: Vec<CatalogRow>) -> Self {
        self.insert(category, rows);
        self
    }

    pub fn insert(&mut self, category: impl Into<String>, rows: Vec<CatalogRow>) {
        self.rows.entry(category.into()).or_default().extend(rows);
    }
}

impl CatalogSource for MemorySource {
    fn fetch_rows(&self, category: &CategoryDefinition) -> Result<Vec<CatalogRow>, ReconError> {
        Ok(self.rows.get(&category.name).cloned().unwrap_or_default())
    }
}
