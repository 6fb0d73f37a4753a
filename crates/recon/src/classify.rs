use std::collections::BTreeSet;

use crate::model::{ArticleLedger, ArticleOutcome, Discrepancy, SizeLedger};
use crate::size::SizeNormalizer;

/// Compare one scanned article against its catalog ledger.
pub fn classify_article(
    normalizer: SizeNormalizer<'_>,
    sized: bool,
    scanned: &ArticleLedger,
    catalog: &ArticleLedger,
) -> ArticleOutcome {
    if sized {
        classify_sized(normalizer, &scanned.sizes, &catalog.sizes)
    } else {
        classify_sizeless(scanned.amount, catalog.amount)
    }
}

/// Sizeless goods compare total units.
pub fn classify_sizeless(scanned: u32, catalog: u32) -> ArticleOutcome {
    if scanned < catalog {
        ArticleOutcome::Discrepant {
            missing: vec![Discrepancy::shortage(None, catalog - scanned)],
            extra: Vec::new(),
        }
    } else if scanned > catalog {
        ArticleOutcome::Discrepant {
            missing: Vec::new(),
            extra: vec![Discrepancy::surplus(None, scanned - catalog)],
        }
    } else {
        ArticleOutcome::Matched
    }
}

/// Per-size delta over the union of both ledgers, in presentation order.
/// The same article can come out short on some sizes and over on others.
pub fn classify_sized(
    normalizer: SizeNormalizer<'_>,
    scanned: &SizeLedger,
    catalog: &SizeLedger,
) -> ArticleOutcome {
    let scanned = renormalize(normalizer, scanned);
    let catalog = renormalize(normalizer, catalog);

    let tables = normalizer.tables();
    let mut sizes: Vec<&String> = scanned
        .keys()
        .chain(catalog.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    sizes.sort_by(|a, b| tables.compare(a, b));

    let mut missing = Vec::new();
    let mut extra = Vec::new();
    for size in sizes {
        let have = i64::from(scanned.get(size).copied().unwrap_or(0));
        let want = i64::from(catalog.get(size).copied().unwrap_or(0));
        let delta = have - want;
        if delta < 0 {
            missing.push(Discrepancy::shortage(Some(size.clone()), (-delta) as u32));
        } else if delta > 0 {
            extra.push(Discrepancy::surplus(Some(size.clone()), delta as u32));
        }
    }

    if missing.is_empty() && extra.is_empty() {
        ArticleOutcome::Matched
    } else {
        ArticleOutcome::Discrepant { missing, extra }
    }
}

/// Re-key a ledger through the normalizer, summing keys that collapse.
fn renormalize(normalizer: SizeNormalizer<'_>, ledger: &SizeLedger) -> SizeLedger {
    let mut out = SizeLedger::new();
    for (size, qty) in ledger {
        let slot = out.entry(normalizer.normalize(size)).or_insert(0);
        *slot = slot.saturating_add(*qty);
    }
    out
}
