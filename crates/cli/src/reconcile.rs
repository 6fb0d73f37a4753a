//! `stockcheck reconcile` and `stockcheck lookup`.

use std::path::PathBuf;

use stockcheck_io::csv::read_scan_rows;
use stockcheck_io::{FileCatalogSource, IoError};
use stockcheck_recon::{lookup_article, ReconResult, SizeLedger, SizeTables};

use crate::catalog::{catalog_dir, load_config};
use crate::exit_codes::{EXIT_DISCREPANCIES, EXIT_IO};
use crate::CliError;

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

pub fn cmd_reconcile(
    scan_path: PathBuf,
    config_path: Option<PathBuf>,
    catalog_dir_arg: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let base_dir = catalog_dir(catalog_dir_arg, config_path.as_deref());

    let scan_rows = read_scan_rows(&scan_path, &config.scan).map_err(|e| match e {
        IoError::Read { .. } => recon_err(EXIT_IO, e.to_string())
            .with_hint("the scan is the CSV exported from the handheld scanner"),
        other => recon_err(EXIT_IO, other.to_string()),
    })?;

    let source = FileCatalogSource::new(&base_dir);
    log::info!(
        "reconciling {} scan row(s) against catalogs in {}",
        scan_rows.len(),
        base_dir.display()
    );

    let result = stockcheck_recon::run(&config, &scan_rows, &source)
        .map_err(|e| CliError::config(e.to_string()))?;

    // Output
    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| recon_err(EXIT_IO, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| recon_err(EXIT_IO, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    } else {
        print!("{}", render_report(&result));
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "stocktake: {} articles, {} matched, {} short, {} over, {} not found, {} not scanned",
        s.scanned_articles,
        s.matched_articles,
        s.missing_articles,
        s.extra_articles,
        s.not_found_articles,
        s.not_scanned_articles,
    );
    eprintln!(
        "units: {} counted, {} matched, {} missing, {} surplus, {} never scanned",
        s.total_units, s.matched_units, s.missing_units, s.surplus_units, s.not_scanned_units,
    );

    if result.is_clean() {
        Ok(())
    } else {
        Err(recon_err(EXIT_DISCREPANCIES, "discrepancies found"))
    }
}

/// Per-article listing, one section per non-empty outcome.
pub fn render_report(result: &ReconResult) -> String {
    let tables = SizeTables::standard();
    let mut out = String::new();

    if !result.categories.is_empty() {
        out.push_str("Categories:\n");
        for hit in &result.categories {
            out.push_str(&format!("  {} ({} articles)\n", hit.display_name, hit.articles));
        }
    }

    let sections = [("Missing", &result.missing), ("Extra", &result.extra)];
    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("{title} ({}):\n", entries.len()));
        for (article, list) in entries {
            let descriptors = ReconResult::describe(list).join(", ");
            out.push_str(&format!("  {article}: {descriptors}\n"));
        }
    }

    if !result.not_found.is_empty() {
        out.push_str(&format!("Not found ({}):\n", result.not_found.len()));
        for article in &result.not_found {
            out.push_str(&format!("  {article}\n"));
        }
    }

    if !result.not_scanned.is_empty() {
        out.push_str(&format!("Not scanned ({}):\n", result.not_scanned.len()));
        for (article, sizes) in &result.not_scanned {
            out.push_str(&format!("  {article}: {}\n", ledger_text(&tables, sizes)));
        }
    }

    if result.is_clean() {
        out.push_str("All scanned articles match the catalog.\n");
    }
    out
}

/// `M x2, L` for sized ledgers, `x3` for a sizeless one.
fn ledger_text(tables: &SizeTables, sizes: &SizeLedger) -> String {
    let mut entries: Vec<(&String, &u32)> = sizes.iter().collect();
    entries.sort_by(|a, b| tables.compare(a.0, b.0));
    entries
        .into_iter()
        .map(|(size, count)| match (size.is_empty(), *count) {
            (true, n) => format!("x{n}"),
            (false, 1) => size.clone(),
            (false, n) => format!("{size} x{n}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn cmd_lookup(
    article: String,
    config_path: Option<PathBuf>,
    catalog_dir_arg: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    if article.trim().is_empty() {
        return Err(CliError::args("article must not be empty"));
    }

    let config = load_config(config_path.as_deref())?;
    let source = FileCatalogSource::new(catalog_dir(catalog_dir_arg, config_path.as_deref()));
    let tables = SizeTables::standard();

    let lookup = lookup_article(&config, &tables, &article, &source);

    if json_output {
        let json_str = serde_json::to_string_pretty(&lookup)
            .map_err(|e| recon_err(EXIT_IO, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else if let Some(ref category) = lookup.found_in {
        if lookup.sizes.is_empty() {
            println!("{} ({category}): no sizes", lookup.article);
        } else {
            println!("{} ({category}): {}", lookup.article, lookup.sizes.join(", "));
        }
    }

    if lookup.categories.is_empty() {
        return Err(recon_err(
            EXIT_DISCREPANCIES,
            format!("no category for article '{}'", lookup.article),
        )
        .with_hint("run `stockcheck categories` to see the known prefixes"));
    }
    if !lookup.found() {
        return Err(recon_err(
            EXIT_DISCREPANCIES,
            format!(
                "article '{}' not in catalog ({})",
                lookup.article,
                lookup.categories.join(", ")
            ),
        ));
    }
    Ok(())
}
