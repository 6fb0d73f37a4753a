use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ReconError;

/// Retailer configuration compiled into the crate.
const BUILTIN_TOML: &str = include_str!("builtin.stockcheck.toml");

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub name: String,
    /// Article-column texts that mark a header row (compared case-insensitively).
    #[serde(default)]
    pub header_labels: Vec<String>,
    #[serde(default)]
    pub scan: ScanLayout,
    pub categories: Vec<CategoryDefinition>,
    /// Ordered prefix table; first match wins.
    #[serde(default)]
    pub prefixes: Vec<PrefixRule>,
}

// ---------------------------------------------------------------------------
// Scan layout
// ---------------------------------------------------------------------------

/// 1-based columns of the stocktake export.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanLayout {
    pub article: usize,
    pub size: usize,
    pub quantity: usize,
}

impl Default for ScanLayout {
    fn default() -> Self {
        Self {
            article: 2,
            size: 4,
            quantity: 6,
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Sizeless categories are counted by total units per article.
    #[serde(default = "default_sized")]
    pub sized: bool,
    pub columns: CatalogColumns,
    /// Where the catalog rows live. Only file-backed sources read this.
    #[serde(default)]
    pub sources: Vec<SourceLocation>,
}

fn default_sized() -> bool {
    true
}

impl CategoryDefinition {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// 1-based catalog columns.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogColumns {
    pub article: usize,
    pub size: usize,
    pub amount: usize,
    #[serde(default)]
    pub filter: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    #[serde(default)]
    pub sheet: Option<usize>,
}

// ---------------------------------------------------------------------------
// Prefix table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub categories: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CatalogConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CatalogConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The retailer's own categories and prefix table.
    pub fn builtin() -> Result<Self, ReconError> {
        Self::from_toml(BUILTIN_TOML)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn is_header(&self, article: &str) -> bool {
        let article = article.trim().to_lowercase();
        self.header_labels.iter().any(|l| l.trim().to_lowercase() == article)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.categories.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one category is required".into(),
            ));
        }

        if self.scan.article == 0 || self.scan.size == 0 || self.scan.quantity == 0 {
            return Err(ReconError::ConfigValidation(
                "scan columns are 1-based and must be at least 1".into(),
            ));
        }

        let mut names = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "category name must not be empty".into(),
                ));
            }
            if !names.insert(category.name.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
            let cols = &category.columns;
            if cols.article == 0 || cols.size == 0 || cols.amount == 0 || cols.filter == Some(0) {
                return Err(ReconError::ConfigValidation(format!(
                    "category '{}': columns are 1-based and must be at least 1",
                    category.name
                )));
            }
        }

        for rule in &self.prefixes {
            if rule.prefix.trim().is_empty() {
                return Err(ReconError::ConfigValidation("empty prefix".into()));
            }
            if rule.categories.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "prefix '{}' maps to no category",
                    rule.prefix
                )));
            }
            for name in &rule.categories {
                if !names.contains(name.as_str()) {
                    return Err(ReconError::UnknownCategory(format!(
                        "prefix '{}': category '{name}' not defined",
                        rule.prefix
                    )));
                }
            }
            // Scan rows take sizedness from the primary candidate, so a
            // fallback must agree with it.
            let sized: HashSet<bool> = rule
                .categories
                .iter()
                .filter_map(|name| self.category(name))
                .map(|c| c.sized)
                .collect();
            if sized.len() > 1 {
                return Err(ReconError::ConfigValidation(format!(
                    "prefix '{}' mixes sized and sizeless categories",
                    rule.prefix
                )));
            }
        }

        if let Some((earlier, later)) = crate::category::shadowed_prefixes(&self.prefixes).first() {
            return Err(ReconError::ConfigValidation(format!(
                "prefix '{later}' can never match: '{earlier}' is declared before it"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
