//! Size vocabulary and free-text size normalization.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Immutable lookup tables behind [`SizeNormalizer`] and the size shifter.
///
/// Built once (usually via [`SizeTables::standard`]) and shared by reference.
#[derive(Debug, Clone)]
pub struct SizeTables {
    /// Ascending numeric scale (waist and shoe sizes share it).
    pub numeric_scale: Vec<String>,
    /// Ascending letter scale.
    pub letter_scale: Vec<String>,
    /// Clothing numbers that are labels for a letter size ("48" → "M").
    pub numeric_aliases: BTreeMap<String, String>,
    /// Whole-token letter aliases: Cyrillic spellings and scanner misreads.
    pub letter_aliases: BTreeMap<String, String>,
    /// Per-character Cyrillic → Latin fallback.
    pub transliteration: BTreeMap<char, char>,
    valid: HashSet<String>,
}

impl SizeTables {
    pub fn new(
        numeric_scale: Vec<String>,
        letter_scale: Vec<String>,
        numeric_aliases: BTreeMap<String, String>,
        letter_aliases: BTreeMap<String, String>,
        transliteration: BTreeMap<char, char>,
    ) -> Self {
        let valid = numeric_scale.iter().chain(letter_scale.iter()).cloned().collect();
        Self {
            numeric_scale,
            letter_scale,
            numeric_aliases,
            letter_aliases,
            transliteration,
            valid,
        }
    }

    /// The retailer's vocabulary: XS..8XL, waist 28..46 without 37
    /// (shoe sizes 39..46 fall inside it).
    pub fn standard() -> Self {
        let numeric_scale = (28..=46)
            .filter(|n| *n != 37)
            .map(|n| n.to_string())
            .collect();

        let letter_scale = ["XS", "S", "M", "L", "XL", "2XL", "3XL", "4XL", "5XL", "6XL", "7XL", "8XL"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let numeric_aliases = [
            ("46", "S"),
            ("48", "M"),
            ("50", "L"),
            ("52", "XL"),
            ("54", "2XL"),
            ("56", "3XL"),
            ("58", "4XL"),
            ("60", "5XL"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut letter_aliases: BTreeMap<String, String> = [
            ("С", "S"),
            ("М", "M"),
            ("Л", "L"),
            ("ХС", "XS"),
            ("ХЛ", "XL"),
            // Latin lookalikes the scanner produces for С and ХС
            ("C", "S"),
            ("XC", "XS"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for n in 2..=8 {
            letter_aliases.insert(format!("{n}ХЛ"), format!("{n}XL"));
        }

        let transliteration = [
            ('А', 'A'),
            ('В', 'B'),
            ('Е', 'E'),
            ('К', 'K'),
            ('Л', 'L'),
            ('М', 'M'),
            ('Н', 'H'),
            ('О', 'O'),
            ('Р', 'P'),
            ('С', 'S'),
            ('Т', 'T'),
            ('Х', 'X'),
        ]
        .into_iter()
        .collect();

        Self::new(numeric_scale, letter_scale, numeric_aliases, letter_aliases, transliteration)
    }

    /// Whether `size` belongs to the canonical vocabulary.
    pub fn is_valid(&self, size: &str) -> bool {
        self.valid.contains(size)
    }

    /// Scale that contains `size` and its position on it.
    pub fn position(&self, size: &str) -> Option<(&[String], usize)> {
        if let Some(i) = self.letter_scale.iter().position(|s| s == size) {
            return Some((self.letter_scale.as_slice(), i));
        }
        self.numeric_scale
            .iter()
            .position(|s| s == size)
            .map(|i| (self.numeric_scale.as_slice(), i))
    }

    /// Presentation order: letter sizes first along their scale, then
    /// numeric sizes, then anything unrecognized alphabetically.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rank(a).cmp(&self.rank(b)).then_with(|| a.cmp(b))
    }

    fn rank(&self, size: &str) -> (u8, usize) {
        if let Some(i) = self.letter_scale.iter().position(|s| s == size) {
            (0, i)
        } else if let Some(i) = self.numeric_scale.iter().position(|s| s == size) {
            (1, i)
        } else {
            (2, 0)
        }
    }
}

impl Default for SizeTables {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Maps a free-text size token onto the canonical vocabulary.
///
/// Total: unrecognized tokens come back uppercased and transliterated, and
/// callers check [`SizeTables::is_valid`] rather than expecting an error.
/// `normalize(normalize(x)) == normalize(x)` for every input.
#[derive(Debug, Clone, Copy)]
pub struct SizeNormalizer<'a> {
    tables: &'a SizeTables,
}

impl<'a> SizeNormalizer<'a> {
    pub fn new(tables: &'a SizeTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a SizeTables {
        self.tables
    }

    pub fn normalize(&self, token: &str) -> String {
        let token = token.trim();
        if token.is_empty() {
            return String::new();
        }

        // "5(2XL)": the bracketed size wins over the outer label
        if let Some(inner) = bracketed(token) {
            return self.normalize(inner);
        }

        let upper = token.to_uppercase();
        if let Some(size) = self.lookup(&upper) {
            return size;
        }

        let transliterated: String = upper
            .chars()
            .map(|c| self.tables.transliteration.get(&c).copied().unwrap_or(c))
            .collect();
        self.lookup(&transliterated).unwrap_or(transliterated)
    }

    pub fn is_valid(&self, size: &str) -> bool {
        self.tables.is_valid(size)
    }

    fn lookup(&self, upper: &str) -> Option<String> {
        if let Some(size) = self.tables.numeric_aliases.get(upper) {
            return Some(size.clone());
        }
        if let Some(size) = self.tables.letter_aliases.get(upper) {
            return Some(size.clone());
        }
        if self.tables.is_valid(upper) {
            return Some(upper.to_string());
        }
        None
    }
}

/// Non-empty content of the first `( … )` group, if any.
fn bracketed(token: &str) -> Option<&str> {
    let open = token.find('(')?;
    let close = token[open + 1..].find(')')? + open + 1;
    let inner = token[open + 1..close].trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}
