// Stocktake and catalog file readers

pub mod catalog;
pub mod csv;
pub mod error;
pub mod xlsx;

pub use catalog::FileCatalogSource;
pub use error::IoError;
