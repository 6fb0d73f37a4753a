// CSV/TSV readers for stocktake exports and CSV catalog sources

use std::io::Read;
use std::path::Path;

use stockcheck_recon::config::ScanLayout;
use stockcheck_recon::ScanRow;

use crate::error::IoError;

/// Read every record of a delimited file as strings, delimiter sniffed.
pub fn read_records(path: &Path) -> Result<Vec<Vec<String>>, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    parse_records(&content, delimiter)
}

/// Read a stocktake export: header row skipped, columns picked by `layout`.
pub fn read_scan_rows(path: &Path, layout: &ScanLayout) -> Result<Vec<ScanRow>, IoError> {
    let content = read_file_as_utf8(path)?;
    scan_rows_from_str(&content, layout)
}

pub fn scan_rows_from_str(content: &str, layout: &ScanLayout) -> Result<Vec<ScanRow>, IoError> {
    let delimiter = sniff_delimiter(content);
    let records = parse_records(content, delimiter)?;

    let mut rows = Vec::new();
    for (line, record) in records.iter().enumerate().skip(1) {
        let Some(article) = field(record, layout.article) else {
            log::debug!("scan line {}: fewer than {} fields, skipped", line + 1, layout.article);
            continue;
        };
        let size = field(record, layout.size).unwrap_or_default();
        let quantity = field(record, layout.quantity).unwrap_or_else(|| "1".to_string());
        rows.push(ScanRow::new(article, size, quantity));
    }

    log::info!("scan: {} row(s) read", rows.len());
    Ok(rows)
}

/// 1-based field, trimmed.
fn field(record: &[String], column: usize) -> Option<String> {
    record
        .get(column.checked_sub(1)?)
        .map(|value| value.trim().to_string())
}

pub fn parse_records(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>, IoError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IoError::Csv(e.to_string()))?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                ::csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Lines agreeing with the first line's width, weighted by that width
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read a file as UTF-8, falling back to Windows-1251 (Cyrillic Excel exports).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |e: std::io::Error| IoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            log::debug!("{} is not UTF-8, decoding as Windows-1251", path.display());
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1251.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
