use std::sync::OnceLock;

use regex::Regex;

use crate::article::{base_article, normalized_key};
use crate::category::CategoryResolver;
use crate::config::{CatalogConfig, CategoryDefinition};
use crate::model::{ArticleLedger, CatalogRow, LedgerSet, ScanRow};
use crate::shift::ShiftDirective;
use crate::size::{SizeNormalizer, SizeTables};
use crate::tokenize::SizeCellTokenizer;

/// Group stocktake rows into per-article ledgers.
pub fn aggregate_scan(config: &CatalogConfig, tables: &SizeTables, rows: &[ScanRow]) -> LedgerSet {
    let mut builder = ScanLedgerBuilder::new(config, tables);
    for row in rows {
        builder.push(row);
    }
    builder.finish()
}

/// Group one category's catalog rows into per-article ledgers.
pub fn aggregate_catalog(
    config: &CatalogConfig,
    category: &CategoryDefinition,
    tables: &SizeTables,
    rows: &[CatalogRow],
) -> LedgerSet {
    let mut builder = CatalogLedgerBuilder::new(config, category, tables);
    for row in rows {
        builder.push(row);
    }
    builder.finish()
}

// ---------------------------------------------------------------------------
// Scan side
// ---------------------------------------------------------------------------

pub struct ScanLedgerBuilder<'a> {
    config: &'a CatalogConfig,
    resolver: CategoryResolver<'a>,
    normalizer: SizeNormalizer<'a>,
    ledgers: LedgerSet,
}

impl<'a> ScanLedgerBuilder<'a> {
    pub fn new(config: &'a CatalogConfig, tables: &'a SizeTables) -> Self {
        Self {
            config,
            resolver: CategoryResolver::from_config(config),
            normalizer: SizeNormalizer::new(tables),
            ledgers: LedgerSet::new(),
        }
    }

    pub fn push(&mut self, row: &ScanRow) {
        let article = row.article.trim();
        if article.is_empty() || self.config.is_header(article) {
            return;
        }
        let base = base_article(article);
        let key = normalized_key(&base);
        if key.is_empty() {
            return;
        }

        let qty = parse_quantity(&row.quantity);
        let sized = self.is_sized(&base, &row.size);
        let ledger = self
            .ledgers
            .entry(key)
            .or_insert_with(|| ArticleLedger::new(base.clone()));
        ledger.amount = ledger.amount.saturating_add(qty);

        if !sized {
            return;
        }
        let size = self.normalizer.normalize(&row.size);
        if size.is_empty() {
            log::debug!("scan row for sized article {base} has no size label; counted in amount only");
            return;
        }
        ledger
            .original_size_labels
            .entry(size.clone())
            .or_insert_with(|| row.size.trim().to_string());
        let slot = ledger.sizes.entry(size).or_insert(0);
        *slot = slot.saturating_add(qty);
    }

    pub fn finish(self) -> LedgerSet {
        log::info!("scan: {} article(s)", self.ledgers.len());
        self.ledgers
    }

    /// Sizedness of the primary candidate category; unresolvable articles
    /// are sized when the row carries a size label.
    fn is_sized(&self, article: &str, size_text: &str) -> bool {
        self.resolver
            .resolve(article)
            .and_then(|names| names.first())
            .and_then(|name| self.config.category(name))
            .map(|c| c.sized)
            .unwrap_or_else(|| !size_text.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Catalog side
// ---------------------------------------------------------------------------

pub struct CatalogLedgerBuilder<'a> {
    config: &'a CatalogConfig,
    category: &'a CategoryDefinition,
    tokenizer: SizeCellTokenizer<'a>,
    ledgers: LedgerSet,
}

impl<'a> CatalogLedgerBuilder<'a> {
    pub fn new(config: &'a CatalogConfig, category: &'a CategoryDefinition, tables: &'a SizeTables) -> Self {
        Self {
            config,
            category,
            tokenizer: SizeCellTokenizer::new(SizeNormalizer::new(tables)),
            ledgers: LedgerSet::new(),
        }
    }

    pub fn push(&mut self, row: &CatalogRow) {
        let article = row.article.trim();
        if article.is_empty() || self.config.is_header(article) {
            return;
        }
        let base = base_article(article);
        let key = normalized_key(&base);
        if key.is_empty() {
            return;
        }
        let ledger = self
            .ledgers
            .entry(key)
            .or_insert_with(|| ArticleLedger::new(base.clone()));

        if !self.category.sized {
            ledger.amount = ledger.amount.saturating_add(sum_integers(&row.amount));
            return;
        }

        let cell = row.size_cell.trim();
        if cell.is_empty() || cell == "-" {
            return;
        }
        let directive = ShiftDirective::from_filter_cell(&row.filter);
        let parsed = self.tokenizer.parse_cell(cell, directive);
        for (size, qty) in parsed.sizes {
            ledger.amount = ledger.amount.saturating_add(qty);
            let slot = ledger.sizes.entry(size).or_insert(0);
            *slot = slot.saturating_add(qty);
        }
        for (size, label) in parsed.labels {
            ledger.original_size_labels.entry(size).or_insert(label);
        }
    }

    pub fn finish(self) -> LedgerSet {
        log::info!(
            "catalog '{}': {} article(s)",
            self.category.name,
            self.ledgers.len()
        );
        self.ledgers
    }
}

// ---------------------------------------------------------------------------
// Numeric cells
// ---------------------------------------------------------------------------

/// Scanned quantity; anything unreadable counts as one unit.
pub fn parse_quantity(text: &str) -> u32 {
    let text = text.trim();
    if text.is_empty() {
        return 1;
    }
    if let Ok(n) = text.parse::<u32>() {
        return n;
    }
    // Spreadsheet exports write integral numbers as "3.0"
    match text.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => f as u32,
        _ => {
            log::debug!("unreadable quantity {text:?}, counting 1");
            1
        }
    }
}

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("static pattern"))
}

/// Sum of every integer written anywhere in the cell: `"2, (,1,-stock)"` is 3.
pub fn sum_integers(text: &str) -> u32 {
    digit_runs()
        .find_iter(text)
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
        .fold(0u32, |acc, n| acc.saturating_add(n))
}
