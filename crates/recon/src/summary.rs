use crate::model::{LedgerSet, ReconResult, ReconSummary};

/// Unit and article counts for a finished run.
///
/// Scanned units of an article are its size quantities when it has any,
/// otherwise its amount.
pub fn compute_summary(scan: &LedgerSet, result: &ReconResult) -> ReconSummary {
    let mut total_units = 0u64;
    let mut matched_units = 0u64;
    for ledger in scan.values() {
        let units = u64::from(ledger.units(!ledger.sizes.is_empty()));
        total_units += units;
        if result.matched.contains(&ledger.original_art) {
            matched_units += units;
        }
    }

    let missing_units = result
        .missing
        .values()
        .flatten()
        .map(|d| u64::from(d.units))
        .sum();
    let surplus_units = result
        .extra
        .values()
        .flatten()
        .map(|d| u64::from(d.units))
        .sum();
    let not_scanned_units = result
        .not_scanned
        .values()
        .flat_map(|sizes| sizes.values())
        .map(|qty| u64::from(*qty))
        .sum();

    ReconSummary {
        scanned_articles: scan.len(),
        matched_articles: result.matched.len(),
        missing_articles: result.missing.len(),
        extra_articles: result.extra.len(),
        not_found_articles: result.not_found.len(),
        not_scanned_articles: result.not_scanned.len(),
        total_units,
        matched_units,
        missing_units,
        surplus_units,
        not_scanned_units,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::model::{ArticleLedger, Discrepancy, ReconMeta, SizeLedger};

    fn ledger(art: &str, sizes: &[(&str, u32)], amount: u32) -> ArticleLedger {
        let mut l = ArticleLedger::new(art);
        l.sizes = sizes.iter().map(|(s, q)| (s.to_string(), *q)).collect();
        l.amount = amount;
        l
    }

    #[test]
    fn summary_counts() {
        let mut scan = LedgerSet::new();
        scan.insert("ДЖ1".into(), ledger("Дж-1", &[("30", 2), ("32", 1)], 3));
        scan.insert("ДЖ2".into(), ledger("Дж-2", &[("30", 1)], 1));
        scan.insert("КЕ1".into(), ledger("Ке-1", &[], 4));
        scan.insert("ZZ1".into(), ledger("ZZ-1", &[("M", 1)], 1));

        let result = ReconResult {
            meta: ReconMeta {
                config_name: "t".into(),
                engine_version: "0".into(),
                run_at: String::new(),
            },
            summary: ReconSummary::default(),
            categories: Vec::new(),
            matched: BTreeSet::from(["Дж-1".to_string(), "Ке-1".to_string()]),
            missing: BTreeMap::from([(
                "Дж-2".to_string(),
                vec![Discrepancy::shortage(Some("31".into()), 2)],
            )]),
            extra: BTreeMap::from([(
                "Дж-2".to_string(),
                vec![Discrepancy::surplus(Some("30".into()), 1)],
            )]),
            not_found: BTreeSet::from(["ZZ-1".to_string()]),
            not_scanned: BTreeMap::from([
                ("Дж-9".to_string(), SizeLedger::from([("30".to_string(), 2)])),
                ("Ке-9".to_string(), SizeLedger::from([(String::new(), 5)])),
            ]),
        };

        let summary = compute_summary(&scan, &result);
        assert_eq!(summary.scanned_articles, 4);
        assert_eq!(summary.matched_articles, 2);
        assert_eq!(summary.missing_articles, 1);
        assert_eq!(summary.extra_articles, 1);
        assert_eq!(summary.not_found_articles, 1);
        assert_eq!(summary.not_scanned_articles, 2);
        assert_eq!(summary.total_units, 9);
        assert_eq!(summary.matched_units, 7);
        assert_eq!(summary.missing_units, 2);
        assert_eq!(summary.surplus_units, 1);
        assert_eq!(summary.not_scanned_units, 7);
    }
}
