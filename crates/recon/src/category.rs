//! Article prefix → candidate categories.

use crate::config::{CatalogConfig, PrefixRule};

/// First-match prefix lookup over the configured table.
#[derive(Debug, Clone)]
pub struct CategoryResolver<'a> {
    rules: Vec<(String, &'a [String])>,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(rules: &'a [PrefixRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|r| (r.prefix.to_uppercase(), r.categories.as_slice()))
                .collect(),
        }
    }

    pub fn from_config(config: &'a CatalogConfig) -> Self {
        Self::new(&config.prefixes)
    }

    /// Candidate categories for `article`, primary first. `None` when no
    /// prefix matches.
    pub fn resolve(&self, article: &str) -> Option<&'a [String]> {
        let upper = article.trim().to_uppercase();
        self.rules
            .iter()
            .find(|(prefix, _)| upper.starts_with(prefix.as_str()))
            .map(|(_, categories)| *categories)
    }
}

/// Pairs `(earlier, later)` where `later` can never match because `earlier`
/// is declared before it and is a prefix of it.
pub fn shadowed_prefixes(rules: &[PrefixRule]) -> Vec<(String, String)> {
    let mut shadowed = Vec::new();
    for (i, later) in rules.iter().enumerate() {
        let later_upper = later.prefix.to_uppercase();
        if let Some(earlier) = rules[..i]
            .iter()
            .find(|e| later_upper.starts_with(&e.prefix.to_uppercase()))
        {
            shadowed.push((earlier.prefix.clone(), later.prefix.clone()));
        }
    }
    shadowed
}
