//! Single-article size lookup.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::article::{base_article, normalized_key};
use crate::category::CategoryResolver;
use crate::config::CatalogConfig;
use crate::shift::ShiftDirective;
use crate::size::{SizeNormalizer, SizeTables};
use crate::source::CatalogSource;
use crate::tokenize::SizeCellTokenizer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleLookup {
    /// Queried article with any variant suffix removed.
    pub article: String,
    /// Candidate categories, primary first. Empty when no prefix matches.
    pub categories: Vec<String>,
    /// First candidate category holding a row for the article.
    pub found_in: Option<String>,
    /// Valid sizes offered across every matching row, in scale order.
    pub sizes: Vec<String>,
}

impl ArticleLookup {
    pub fn found(&self) -> bool {
        self.found_in.is_some()
    }
}

/// Collect the sizes the catalog offers for one article across all of its
/// candidate categories. Quantities are ignored; cells are split loosely.
pub fn lookup_article(
    config: &CatalogConfig,
    tables: &SizeTables,
    article: &str,
    source: &dyn CatalogSource,
) -> ArticleLookup {
    let base = base_article(article);
    let key = normalized_key(&base);
    let categories: Vec<String> = CategoryResolver::from_config(config)
        .resolve(&base)
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    let tokenizer = SizeCellTokenizer::new(SizeNormalizer::new(tables));
    let mut found_in = None;
    let mut sizes = BTreeSet::new();

    for name in &categories {
        let Some(category) = config.category(name) else {
            continue;
        };
        let rows = match source.fetch_rows(category) {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("{e}; skipping category '{name}'");
                continue;
            }
        };
        for row in rows
            .iter()
            .filter(|r| !key.is_empty() && normalized_key(&base_article(&r.article)) == key)
        {
            found_in.get_or_insert_with(|| name.clone());
            if category.sized {
                let directive = ShiftDirective::from_filter_cell(&row.filter);
                sizes.extend(tokenizer.offered_sizes(&row.size_cell, directive));
            }
        }
    }

    let mut sizes: Vec<String> = sizes.into_iter().collect();
    sizes.sort_by(|a, b| tables.compare(a, b));

    ArticleLookup {
        article: base,
        categories,
        found_in,
        sizes,
    }
}
