//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success; for `reconcile`, the stocktake matches the catalog |
//! | 1    | Discrepancies found (`reconcile`), article absent (`lookup`) |
//! | 2    | Usage error (bad arguments; clap's own code)              |
//! | 3    | I/O error reading the scan, config or writing output      |
//! | 4    | Invalid configuration (parse or validation failure)       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

/// Success - command completed, nothing to report.
pub const EXIT_SUCCESS: u8 = 0;

/// Reconciliation finished with shortages, surpluses, unknown or unscanned
/// articles. Like `diff(1)`, exit 1 means "the sides differ."
pub const EXIT_DISCREPANCIES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input or output file could not be read or written.
pub const EXIT_IO: u8 = 3;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;
