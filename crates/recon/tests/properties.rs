// Property-based tests for normalization, shifting and cell parsing.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use stockcheck_recon::article::{base_article, normalized_key};
use stockcheck_recon::classify::classify_sized;
use stockcheck_recon::model::{ArticleOutcome, SizeLedger};
use stockcheck_recon::shift::{shift, ShiftDirective};
use stockcheck_recon::tokenize::SizeCellTokenizer;
use stockcheck_recon::{SizeNormalizer, SizeTables};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Size-ish tokens: canonical sizes, aliases, Cyrillic spellings, brackets
/// and noise.
fn arb_size_token() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(vec![
            "XS", "S", "M", "L", "XL", "2XL", "5XL", "8XL", "28", "36", "38", "46",
        ])
        .prop_map(str::to_string),
        2 => prop::sample::select(vec![
            "с", "м", "л", "хс", "хл", "3хл", "c", "xc", "48", "52", "60", "5(2XL)", "1(ХЛ)", "M()",
        ])
        .prop_map(str::to_string),
        2 => r"[А-Яа-яA-Za-z0-9() ]{0,8}",
    ]
}

fn arb_article() -> impl Strategy<Value = String> {
    r"[А-Яа-яA-Za-z]{1,3}[ \-]{0,2}[0-9]{1,4}(\.[0-9]{1,3})?"
}

fn arb_ledger() -> impl Strategy<Value = SizeLedger> {
    proptest::collection::btree_map(
        prop::sample::select(vec!["S", "M", "L", "XL", "30", "32", "40"]).prop_map(str::to_string),
        0u32..6,
        0..5,
    )
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn size_normalization_is_idempotent(token in arb_size_token()) {
        let tables = SizeTables::standard();
        let norm = SizeNormalizer::new(&tables);
        let once = norm.normalize(&token);
        prop_assert_eq!(norm.normalize(&once), once);
    }

    #[test]
    fn article_key_is_idempotent(code in arb_article()) {
        let key = normalized_key(&code);
        prop_assert_eq!(normalized_key(&key), key.clone());
        prop_assert!(!key.contains(' ') && !key.contains('-'));
    }

    #[test]
    fn base_article_has_no_variant_suffix(code in arb_article()) {
        let base = base_article(&code);
        prop_assert!(code.starts_with(&base));
        prop_assert_eq!(base_article(&base), base.clone());
    }

    #[test]
    fn shift_stays_on_scale(
        index in 0usize..11,
        amount in -20i64..20,
    ) {
        let tables = SizeTables::standard();
        let size = tables.letter_scale[index].clone();
        let shifted = shift(&tables, &size, ShiftDirective { amount });
        let expected = (index as i64 + amount).clamp(0, tables.letter_scale.len() as i64 - 1);
        prop_assert_eq!(shifted, tables.letter_scale[expected as usize].clone());
    }

    #[test]
    fn cell_total_counts_every_valid_size(
        entries in proptest::collection::vec(
            (prop::sample::select(vec!["S", "M", "L", "XL", "2XL"]), proptest::option::of(1u32..9)),
            0..8,
        )
    ) {
        let cell = entries
            .iter()
            .map(|(size, qty)| match qty {
                Some(q) => format!("{size},-{q}"),
                None => size.to_string(),
            })
            .collect::<Vec<_>>()
            .join(",");
        let expected: u32 = entries.iter().map(|(_, qty)| qty.unwrap_or(1)).sum();

        let tables = SizeTables::standard();
        let tokenizer = SizeCellTokenizer::new(SizeNormalizer::new(&tables));
        let parsed = tokenizer.parse_cell(&cell, None);
        prop_assert_eq!(parsed.sizes.values().sum::<u32>(), expected);
    }

    #[test]
    fn ledger_compared_with_itself_matches(ledger in arb_ledger()) {
        let tables = SizeTables::standard();
        let outcome = classify_sized(SizeNormalizer::new(&tables), &ledger, &ledger);
        prop_assert_eq!(outcome, ArticleOutcome::Matched);
    }

    #[test]
    fn shortages_and_surpluses_balance(scanned in arb_ledger(), catalog in arb_ledger()) {
        let tables = SizeTables::standard();
        let outcome = classify_sized(SizeNormalizer::new(&tables), &scanned, &catalog);
        let scanned_total: i64 = scanned.values().map(|q| i64::from(*q)).sum();
        let catalog_total: i64 = catalog.values().map(|q| i64::from(*q)).sum();
        let (short, over) = match outcome {
            ArticleOutcome::Matched => (0, 0),
            ArticleOutcome::Discrepant { missing, extra } => (
                missing.iter().map(|d| i64::from(d.units)).sum::<i64>(),
                extra.iter().map(|d| i64::from(d.units)).sum::<i64>(),
            ),
            ArticleOutcome::NotFound => unreachable!(),
        };
        prop_assert_eq!(scanned_total - catalog_total, over - short);
    }
}
