// File-backed catalog source: each category reads its local exports

use std::path::{Path, PathBuf};

use stockcheck_recon::config::{CatalogColumns, CategoryDefinition, SourceLocation};
use stockcheck_recon::{CatalogRow, CatalogSource, ReconError};

use crate::error::IoError;

/// Reads category exports from disk, relative to `base_dir`.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    base_dir: PathBuf,
}

impl FileCatalogSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// All rows of every source of `category`, in declaration order.
    pub fn read_category(&self, category: &CategoryDefinition) -> Result<Vec<CatalogRow>, IoError> {
        if category.sources.is_empty() {
            log::warn!("category '{}' has no sources", category.name);
        }

        let mut rows = Vec::new();
        for source in &category.sources {
            let records = self.read_source(source)?;
            rows.extend(records.iter().map(|r| catalog_row(r, &category.columns)));
        }
        log::info!("category '{}': {} row(s) read", category.name, rows.len());
        Ok(rows)
    }

    fn read_source(&self, source: &SourceLocation) -> Result<Vec<Vec<String>>, IoError> {
        let path = self.base_dir.join(&source.file);
        read_table(&path, source.sheet.unwrap_or(0))
    }
}

impl CatalogSource for FileCatalogSource {
    fn fetch_rows(&self, category: &CategoryDefinition) -> Result<Vec<CatalogRow>, ReconError> {
        self.read_category(category)
            .map_err(|e| e.for_category(&category.name))
    }
}

/// Read a tabular file, dispatching on extension. `sheet` only applies to
/// workbooks.
pub fn read_table(path: &Path, sheet: usize) -> Result<Vec<Vec<String>>, IoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" | "txt" => crate::csv::read_records(path),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => crate::xlsx::read_sheet_rows(path, sheet),
        _ => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Cut a record down to the category's 1-based columns. Missing cells are
/// empty.
pub fn catalog_row(record: &[String], columns: &CatalogColumns) -> CatalogRow {
    let cell = |column: usize| {
        column
            .checked_sub(1)
            .and_then(|i| record.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };
    CatalogRow {
        article: cell(columns.article),
        size_cell: cell(columns.size),
        amount: cell(columns.amount),
        filter: columns.filter.map(cell).unwrap_or_default(),
    }
}
