use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (duplicate category, bad column, shadowed prefix, etc.).
    ConfigValidation(String),
    /// A prefix rule or lookup names a category that is not defined.
    UnknownCategory(String),
    /// A catalog source could not produce rows for a category.
    Source { category: String, message: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownCategory(name) => write!(f, "unknown category: {name}"),
            Self::Source { category, message } => {
                write!(f, "category '{category}': cannot read catalog: {message}")
            }
        }
    }
}

impl std::error::Error for ReconError {}
