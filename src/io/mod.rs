//! I/O module
//!
//! Handles the ledger file and the credential table.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (column layout, normalization, serialization)
//! - `ledger_file` - `LedgerStore` implementations (file-backed and in-memory)
//! - `credentials` - Credential table reader

pub mod credentials;
pub mod csv_format;
pub mod ledger_file;

pub use credentials::load_credentials;
pub use csv_format::{read_ledger_csv, snapshot, write_ledger_csv};
pub use ledger_file::{CsvLedgerStore, MemoryLedgerStore};
