//! Catalog size-cell mini-language.
//!
//! A cell lists sizes, each optionally followed by a `-n` quantity token and
//! interleaved with `/n` filter markers: `"M,-2, L,"` is two M and one L.
//! Quantity tokens only make sense with comma boundaries intact, so the
//! ledger parse splits on commas alone; the loose split (commas, whitespace
//! and hyphens) is used when only the set of offered sizes matters.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::model::SizeLedger;
use crate::shift::{shift, ShiftDirective};
use crate::size::SizeNormalizer;

fn loose_separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[,\s\-]+").expect("static pattern"))
}

/// Sizes and per-size raw labels read from one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedCell {
    pub sizes: SizeLedger,
    /// First raw token seen for each canonical size.
    pub labels: BTreeMap<String, String>,
}

/// What a token means to the cell state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'t> {
    Quantity(u32),
    FilterMarker,
    Size(&'t str),
}

fn classify(token: &str) -> Option<Token<'_>> {
    if token.is_empty() {
        return None;
    }
    if let Some(digits) = numeric_after(token, '-') {
        // Digit runs too long for u32 still count as a quantity marker.
        return Some(Token::Quantity(digits.parse().unwrap_or(u32::MAX)));
    }
    if numeric_after(token, '/').is_some() {
        return Some(Token::FilterMarker);
    }
    Some(Token::Size(token))
}

fn numeric_after(token: &str, marker: char) -> Option<&str> {
    let digits = token.strip_prefix(marker)?;
    (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())).then_some(digits)
}

/// Two-state machine over a cell's tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    NoPendingSize,
    PendingSize(String),
}

/// Parses catalog size cells against a normalizer and an optional row shift.
#[derive(Debug, Clone, Copy)]
pub struct SizeCellTokenizer<'a> {
    normalizer: SizeNormalizer<'a>,
}

impl<'a> SizeCellTokenizer<'a> {
    pub fn new(normalizer: SizeNormalizer<'a>) -> Self {
        Self { normalizer }
    }

    /// Comma-exact parse into a size → quantity ledger.
    ///
    /// | state            | token      | effect                                   | next state       |
    /// |------------------|------------|------------------------------------------|------------------|
    /// | `NoPendingSize`  | `-n`       | discarded                                | `NoPendingSize`  |
    /// | `PendingSize(s)` | `-n`       | `s += n`                                 | `NoPendingSize`  |
    /// | any              | `/n`       | skipped                                  | unchanged        |
    /// | `PendingSize(s)` | size `t`   | `s += 1`, then evaluate `t`              | per `t`          |
    /// | `NoPendingSize`  | size `t`   | evaluate `t`                             | per `t`          |
    ///
    /// Evaluating `t` applies the row shift and normalizes it (numeric tokens
    /// shift first, letter and Cyrillic labels normalize first), and yields
    /// `PendingSize` when the result is a valid size, else `NoPendingSize`.
    /// A size still pending at the end of the cell counts once.
    pub fn parse_cell(&self, cell: &str, directive: Option<ShiftDirective>) -> TokenizedCell {
        let mut out = TokenizedCell::default();
        let mut state = Pending::NoPendingSize;

        for raw in cell.split(',') {
            let Some(token) = classify(raw.trim()) else {
                continue;
            };
            state = match (state, token) {
                (Pending::NoPendingSize, Token::Quantity(n)) => {
                    log::debug!("quantity token -{n} with no pending size in {cell:?}, discarded");
                    Pending::NoPendingSize
                }
                (Pending::PendingSize(size), Token::Quantity(n)) => {
                    add(&mut out.sizes, size, n);
                    Pending::NoPendingSize
                }
                (state, Token::FilterMarker) => state,
                (state, Token::Size(text)) => {
                    if let Pending::PendingSize(size) = state {
                        add(&mut out.sizes, size, 1);
                    }
                    match self.evaluate(text, directive) {
                        Some(size) => {
                            out.labels.entry(size.clone()).or_insert_with(|| text.to_string());
                            Pending::PendingSize(size)
                        }
                        None => Pending::NoPendingSize,
                    }
                }
            };
        }

        if let Pending::PendingSize(size) = state {
            add(&mut out.sizes, size, 1);
        }
        out
    }

    /// Loose parse: the set of valid sizes a cell offers, quantities ignored.
    pub fn offered_sizes(&self, cell: &str, directive: Option<ShiftDirective>) -> BTreeSet<String> {
        loose_separators()
            .split(cell)
            .filter(|t| !t.trim().is_empty())
            .filter_map(|t| self.evaluate(t, directive))
            .collect()
    }

    fn evaluate(&self, token: &str, directive: Option<ShiftDirective>) -> Option<String> {
        let tables = self.normalizer.tables();
        let trimmed = token.trim();
        let size = match directive {
            // Waist and shoe sizes move along their own scale; "46" only
            // reads as S when nothing shifts it.
            Some(d) if d.amount != 0 && tables.numeric_scale.iter().any(|s| s == trimmed) => {
                shift(tables, trimmed, d)
            }
            Some(d) => shift(tables, &self.normalizer.normalize(token), d),
            None => self.normalizer.normalize(token),
        };
        if self.normalizer.is_valid(&size) {
            Some(size)
        } else {
            log::debug!("size token {token:?} is not a known size, dropped");
            None
        }
    }
}

fn add(ledger: &mut SizeLedger, size: String, qty: u32) {
    if qty == 0 {
        return;
    }
    let slot = ledger.entry(size).or_insert(0);
    *slot = slot.saturating_add(qty);
}
