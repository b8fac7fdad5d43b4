//! Student Fee Ledger Library
//! # Overview
//!
//! This library keeps a college fee office's student table: a flat ledger of
//! student records with per-year fee breakdowns, stored as a single CSV file
//! that is reloaded and rewritten on every interaction.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (StudentRecord, YearFees, LedgerError, etc.)
//! - [`core`] - Business logic components:
//!   - [`core::fees`] - Fee arithmetic (totals, payments, per-year status)
//!   - [`core::ledger`] - The in-memory table and its queries and mutations
//!   - [`core::office`] - Load → mutate → save orchestration
//!   - [`core::auth`] - Operator credentials
//! - [`io`] - Ledger file format, ledger stores and the credential reader
//! - [`documents`] - Receipts, certificates, student sheet and UPI links
//! - [`config`] - Layered configuration
//! - [`logging`] - Tracing subscriber setup
//! - [`cli`] - CLI arguments and command handlers
//!
//! # Fee Rules
//!
//! - At creation a year's total is the sum of its nine components and
//!   remaining is total minus the initial paid amount
//! - A payment adds to paid and lowers remaining, never below zero
//! - Totals are never recomputed after creation
//!
//! Money is kept as `rust_decimal::Decimal` throughout.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod documents;
pub mod io;
pub mod logging;
pub mod types;

pub use config::Config;
pub use core::{CompletedPayment, FeeOffice, Ledger, LedgerStore};
pub use io::{CsvLedgerStore, MemoryLedgerStore};
pub use logging::init_logging;
pub use types::{
    AcademicYear, FeeComponent, LedgerError, NewStudent, PaymentPurpose, PaymentRequest,
    StudentProfile, StudentRecord, StudentSelector, YearFeeInput, YearFees,
};
