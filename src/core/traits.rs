//! Core traits for ledger persistence
//!
//! This module defines the load/save seam that lets the file-backed store and
//! the in-memory store be used interchangeably by [`FeeOffice`](crate::core::office::FeeOffice).

use crate::core::ledger::Ledger;
use crate::types::LedgerError;

/// Trait for loading and saving the whole ledger
///
/// The ledger is always read and written as a unit; there are no partial
/// updates and no transaction boundary.
pub trait LedgerStore {
    /// Load the full ledger
    ///
    /// A store with nothing saved yet yields an empty ledger, not an error.
    fn load(&self) -> Result<Ledger, LedgerError>;

    /// Replace the stored ledger with `ledger`
    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError>;
}
