use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One stocktake export row: article code, size label, scanned quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRow {
    pub article: String,
    pub size: String,
    pub quantity: String,
}

impl ScanRow {
    pub fn new(article: impl Into<String>, size: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            article: article.into(),
            size: size.into(),
            quantity: quantity.into(),
        }
    }
}

/// One catalog worksheet row, already cut down to the category's columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow {
    pub article: String,
    pub size_cell: String,
    pub amount: String,
    pub filter: String,
}

// ---------------------------------------------------------------------------
// Ledgers
// ---------------------------------------------------------------------------

/// Canonical size → quantity. The empty key stands for "no size".
pub type SizeLedger = BTreeMap<String, u32>;

/// Everything one source says about one article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleLedger {
    /// Per-size quantities; stays empty for sizeless articles.
    pub sizes: SizeLedger,
    /// Total units.
    pub amount: u32,
    /// Base article as first written by the source.
    pub original_art: String,
    /// First raw label seen per canonical size.
    pub original_size_labels: BTreeMap<String, String>,
}

impl ArticleLedger {
    pub fn new(original_art: impl Into<String>) -> Self {
        Self {
            original_art: original_art.into(),
            ..Self::default()
        }
    }

    /// Size ledger as reported: sized articles as-is, sizeless articles as a
    /// single empty-keyed entry holding their amount.
    pub fn reported_sizes(&self, sized: bool) -> SizeLedger {
        if sized {
            self.sizes.clone()
        } else if self.amount > 0 {
            SizeLedger::from([(String::new(), self.amount)])
        } else {
            SizeLedger::new()
        }
    }

    /// Units this ledger accounts for.
    pub fn units(&self, sized: bool) -> u32 {
        if sized {
            self.sizes.values().sum()
        } else {
            self.amount
        }
    }
}

/// Normalized article key → ledger, for one source.
pub type LedgerSet = BTreeMap<String, ArticleLedger>;

// ---------------------------------------------------------------------------
// Discrepancies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    Shortage,
    Surplus,
}

/// A per-size (or, for sizeless goods, per-article) unit difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    /// Canonical size; `None` for sizeless articles.
    pub size: Option<String>,
    pub units: u32,
}

impl Discrepancy {
    pub fn shortage(size: Option<String>, units: u32) -> Self {
        Self {
            kind: DiscrepancyKind::Shortage,
            size,
            units,
        }
    }

    pub fn surplus(size: Option<String>, units: u32) -> Self {
        Self {
            kind: DiscrepancyKind::Surplus,
            size,
            units,
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.size, self.kind) {
            (None, DiscrepancyKind::Shortage) => write!(f, "Shortage {} units", self.units),
            (None, DiscrepancyKind::Surplus) => write!(f, "Surplus {} units", self.units),
            (Some(size), _) if self.units == 1 => write!(f, "{size}"),
            (Some(size), DiscrepancyKind::Shortage) => {
                write!(f, "{size} (need {} more)", self.units)
            }
            (Some(size), DiscrepancyKind::Surplus) => write!(f, "{size} ({} more)", self.units),
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// How one scanned article came out of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    Matched,
    Discrepant {
        missing: Vec<Discrepancy>,
        extra: Vec<Discrepancy>,
    },
    NotFound,
}

/// A category touched by the scan, with how many scanned articles named it
/// as a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryHit {
    pub name: String,
    pub display_name: String,
    pub articles: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub scanned_articles: usize,
    pub matched_articles: usize,
    pub missing_articles: usize,
    pub extra_articles: usize,
    pub not_found_articles: usize,
    pub not_scanned_articles: usize,
    pub total_units: u64,
    pub matched_units: u64,
    pub missing_units: u64,
    pub surplus_units: u64,
    pub not_scanned_units: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Classified outcome of one reconciliation run, keyed by base article.
/// `missing` and `extra` may both hold the same article when some sizes are
/// short and others over.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub categories: Vec<CategoryHit>,
    pub matched: BTreeSet<String>,
    pub missing: BTreeMap<String, Vec<Discrepancy>>,
    pub extra: BTreeMap<String, Vec<Discrepancy>>,
    pub not_found: BTreeSet<String>,
    /// Catalog articles nobody scanned, keyed by catalog article text.
    pub not_scanned: BTreeMap<String, SizeLedger>,
}

impl ReconResult {
    /// True when every scanned article matched and the catalog holds nothing
    /// unscanned.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.extra.is_empty()
            && self.not_found.is_empty()
            && self.not_scanned.is_empty()
    }

    /// Human-readable descriptors, in the order they were recorded.
    pub fn describe(list: &[Discrepancy]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }
}
