use std::fmt;

use stockcheck_recon::ReconError;

#[derive(Debug)]
pub enum IoError {
    Read { path: String, message: String },
    Csv(String),
    Workbook(String),
    UnsupportedFormat(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Workbook(msg) => write!(f, "workbook error: {msg}"),
            Self::UnsupportedFormat(path) => write!(
                f,
                "unsupported file format: {path} (expected .csv, .xlsx, .xlsm, .xls, .xlsb or .ods)"
            ),
        }
    }
}

impl std::error::Error for IoError {}

impl IoError {
    /// Attribute a read failure to the category being loaded.
    pub fn for_category(self, category: &str) -> ReconError {
        ReconError::Source {
            category: category.to_string(),
            message: self.to_string(),
        }
    }
}
