//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - the load/save seam for ledger persistence
//! - `fees` - fee arithmetic (totals, payments, per-year status)
//! - `ledger` - the in-memory student table and its operations
//! - `office` - one load → mutate → save cycle per interaction
//! - `auth` - operator credentials

pub mod auth;
pub mod fees;
pub mod ledger;
pub mod office;
pub mod traits;

pub use auth::{CredentialStore, Operator};
pub use ledger::Ledger;
pub use office::{CompletedPayment, FeeOffice};
pub use traits::LedgerStore;
