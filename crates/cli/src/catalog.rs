//! `stockcheck validate` / `stockcheck categories` and shared config loading.

use std::path::{Path, PathBuf};

use stockcheck_recon::{CatalogConfig, ReconError};

use crate::CliError;

/// Load `path` or, when absent, the built-in retailer config. Validation
/// failures map to the config exit code, unreadable files to the I/O one.
pub fn load_config(path: Option<&Path>) -> Result<CatalogConfig, CliError> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
            CatalogConfig::from_toml(&text).map_err(config_err)?
        }
        None => CatalogConfig::builtin().map_err(config_err)?,
    };
    config.validate().map_err(config_err)?;
    Ok(config)
}

/// Catalog exports are resolved against `--catalog-dir`, else the config's
/// directory, else the working directory.
pub fn catalog_dir(explicit: Option<PathBuf>, config_path: Option<&Path>) -> PathBuf {
    explicit
        .or_else(|| {
            config_path
                .and_then(Path::parent)
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

fn config_err(e: ReconError) -> CliError {
    let err = CliError::config(e.to_string());
    match e {
        ReconError::UnknownCategory(_) => {
            err.with_hint("every prefix must name categories declared under [[categories]]")
        }
        ReconError::ConfigParse(_) => err.with_hint("check the file is valid TOML"),
        _ => err,
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;

    let sized = config.categories.iter().filter(|c| c.sized).count();
    let sources: usize = config.categories.iter().map(|c| c.sources.len()).sum();
    eprintln!(
        "config valid: \"{}\", {} categories ({} sized), {} sources, {} prefixes",
        config.name,
        config.categories.len(),
        sized,
        sources,
        config.prefixes.len(),
    );
    Ok(())
}

pub fn cmd_categories(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;

    println!("{}", config.name);
    for category in &config.categories {
        let prefixes: Vec<&str> = config
            .prefixes
            .iter()
            .filter(|rule| rule.categories.iter().any(|n| n == &category.name))
            .map(|rule| rule.prefix.as_str())
            .collect();
        let files: Vec<&str> = category.sources.iter().map(|s| s.file.as_str()).collect();

        println!(
            "  {:<14} {:<20} {:<8} prefixes: {:<16} sources: {}",
            category.name,
            category.label(),
            if category.sized { "sized" } else { "sizeless" },
            prefixes.join(", "),
            files.join(", "),
        );
    }
    Ok(())
}
