use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::aggregate::{aggregate_catalog, aggregate_scan};
use crate::category::CategoryResolver;
use crate::classify::classify_article;
use crate::config::{CatalogConfig, CategoryDefinition};
use crate::error::ReconError;
use crate::model::{
    ArticleOutcome, CategoryHit, LedgerSet, ReconMeta, ReconResult, ReconSummary, ScanRow, SizeLedger,
};
use crate::size::{SizeNormalizer, SizeTables};
use crate::source::CatalogSource;
use crate::summary::compute_summary;

/// Run reconciliation of raw scan rows against a catalog source, with the
/// standard size vocabulary.
pub fn run(
    config: &CatalogConfig,
    scan_rows: &[ScanRow],
    source: &dyn CatalogSource,
) -> Result<ReconResult, ReconError> {
    config.validate()?;
    let tables = SizeTables::standard();
    let engine = ReconciliationEngine::new(config, &tables);
    let scan = aggregate_scan(config, &tables, scan_rows);
    Ok(engine.reconcile_source(&scan, source))
}

/// Fetch and aggregate one category. A failing source is logged and reads
/// as an empty catalog, so its articles come out not found.
pub fn load_category(
    config: &CatalogConfig,
    tables: &SizeTables,
    category: &CategoryDefinition,
    source: &dyn CatalogSource,
) -> LedgerSet {
    match source.fetch_rows(category) {
        Ok(rows) => aggregate_catalog(config, category, tables, &rows),
        Err(e) => {
            log::warn!("{e}; treating category '{}' as empty", category.name);
            LedgerSet::new()
        }
    }
}

pub struct ReconciliationEngine<'a> {
    config: &'a CatalogConfig,
    tables: &'a SizeTables,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(config: &'a CatalogConfig, tables: &'a SizeTables) -> Self {
        Self { config, tables }
    }

    /// [`reconcile`](Self::reconcile) with ledgers loaded from `source`.
    pub fn reconcile_source(&self, scan: &LedgerSet, source: &dyn CatalogSource) -> ReconResult {
        self.reconcile(scan, |category| {
            load_category(self.config, self.tables, category, source)
        })
    }

    /// Classify every scanned article and collect catalog articles nobody
    /// scanned. `lookup` is called once per category the scan references.
    pub fn reconcile<F>(&self, scan: &LedgerSet, mut lookup: F) -> ReconResult
    where
        F: FnMut(&CategoryDefinition) -> LedgerSet,
    {
        let resolver = CategoryResolver::from_config(self.config);
        let normalizer = SizeNormalizer::new(self.tables);

        // Candidate lists per scanned key, and every referenced category in
        // first-reference order with its hit count.
        let mut candidates: HashMap<&str, &[String]> = HashMap::new();
        let mut referenced: Vec<(&str, usize)> = Vec::new();
        for (key, ledger) in scan {
            let Some(names) = resolver.resolve(&ledger.original_art) else {
                continue;
            };
            candidates.insert(key.as_str(), names);
            for name in names {
                match referenced.iter_mut().find(|(n, _)| *n == name.as_str()) {
                    Some((_, count)) => *count += 1,
                    None => referenced.push((name.as_str(), 1)),
                }
            }
        }

        // One lookup per referenced category.
        let mut catalogs: HashMap<&str, LedgerSet> = HashMap::new();
        for (name, _) in &referenced {
            let ledgers = match self.config.category(name) {
                Some(category) => lookup(category),
                None => {
                    log::warn!("prefix table names undefined category '{name}'");
                    LedgerSet::new()
                }
            };
            catalogs.insert(*name, ledgers);
        }

        let mut matched = BTreeSet::new();
        let mut missing = BTreeMap::new();
        let mut extra = BTreeMap::new();
        let mut not_found = BTreeSet::new();

        for (key, scanned) in scan {
            let article = scanned.original_art.clone();
            let hit = candidates.get(key.as_str()).and_then(|names| {
                names.iter().find_map(|name| {
                    catalogs
                        .get(name.as_str())
                        .and_then(|ledgers| ledgers.get(key))
                        .map(|catalog| (name.as_str(), catalog))
                })
            });
            let Some((name, catalog)) = hit else {
                log::debug!("{article}: no catalog entry in any candidate category");
                not_found.insert(article);
                continue;
            };

            match classify_article(normalizer, self.is_sized(name), scanned, catalog) {
                ArticleOutcome::Matched => {
                    matched.insert(article);
                }
                ArticleOutcome::Discrepant {
                    missing: short,
                    extra: over,
                } => {
                    if !short.is_empty() {
                        missing.insert(article.clone(), short);
                    }
                    if !over.is_empty() {
                        extra.insert(article, over);
                    }
                }
                ArticleOutcome::NotFound => {
                    not_found.insert(article);
                }
            }
        }

        let mut not_scanned: BTreeMap<String, SizeLedger> = BTreeMap::new();
        for (name, _) in &referenced {
            let sized = self.is_sized(name);
            let Some(ledgers) = catalogs.get(name) else {
                continue;
            };
            for (key, ledger) in ledgers {
                if scan.contains_key(key) {
                    continue;
                }
                let reported = ledger.reported_sizes(sized);
                if reported.values().all(|qty| *qty == 0) {
                    continue;
                }
                not_scanned
                    .entry(ledger.original_art.clone())
                    .or_insert(reported);
            }
        }

        // Stable sort keeps first-reference order among equal counts.
        referenced.sort_by(|a, b| b.1.cmp(&a.1));
        let categories = referenced
            .iter()
            .map(|(name, articles)| CategoryHit {
                name: name.to_string(),
                display_name: self
                    .config
                    .category(name)
                    .map_or_else(|| name.to_string(), |c| c.label().to_string()),
                articles: *articles,
            })
            .collect();

        let mut result = ReconResult {
            meta: ReconMeta {
                config_name: self.config.name.clone(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            summary: ReconSummary::default(),
            categories,
            matched,
            missing,
            extra,
            not_found,
            not_scanned,
        };
        result.summary = compute_summary(scan, &result);

        log::info!(
            "reconciled {} article(s): {} matched, {} short, {} over, {} not found, {} not scanned",
            scan.len(),
            result.matched.len(),
            result.missing.len(),
            result.extra.len(),
            result.not_found.len(),
            result.not_scanned.len()
        );
        result
    }

    fn is_sized(&self, category: &str) -> bool {
        self.config.category(category).map_or(true, |c| c.sized)
    }
}
