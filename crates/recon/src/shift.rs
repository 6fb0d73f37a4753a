//! Ordinal size shifts ("filter" directives on catalog rows).

use crate::size::SizeTables;

/// A signed step along a size scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftDirective {
    pub amount: i64,
}

impl ShiftDirective {
    /// Parse directive text: `/n` and bare `n` mean `+n`, otherwise the text
    /// must be `+n` or `-n`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, digits) = if let Some(rest) = text.strip_prefix('/') {
            (false, rest)
        } else if let Some(rest) = text.strip_prefix('+') {
            (false, rest)
        } else if let Some(rest) = text.strip_prefix('-') {
            (true, rest)
        } else {
            (false, text)
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let magnitude: i64 = digits.parse().ok()?;
        Some(Self {
            amount: if negative { -magnitude } else { magnitude },
        })
    }

    /// Directive carried by a catalog row's filter cell. Only `-…` and `/…`
    /// cells are shift directives; other contents are notes.
    pub fn from_filter_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.starts_with('-') || cell.starts_with('/') {
            Self::parse(cell)
        } else {
            None
        }
    }
}

/// Move `size` along whichever scale contains it, saturating at both ends.
/// Sizes on neither scale are returned unchanged.
pub fn shift(tables: &SizeTables, size: &str, directive: ShiftDirective) -> String {
    let Some((scale, current)) = tables.position(size) else {
        return size.to_string();
    };
    let last = scale.len() as i64 - 1;
    let target = (current as i64).saturating_add(directive.amount).clamp(0, last);
    scale[target as usize].clone()
}

/// [`shift`] with unparsed directive text; invalid text is a no-op.
pub fn shift_text(tables: &SizeTables, size: &str, directive: &str) -> String {
    match ShiftDirective::parse(directive) {
        Some(d) => shift(tables, size, d),
        None => size.to_string(),
    }
}
