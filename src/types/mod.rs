//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `student`: student records, academic years and fee components
//! - `payment`: payment requests, selectors and outcomes
//! - `error`: Error types for the fee ledger

pub mod error;
pub mod payment;
pub mod student;

pub use error::LedgerError;
pub use payment::{PaymentOutcome, PaymentPurpose, PaymentRequest, StudentSelector};
pub use student::{
    AcademicYear, FeeComponent, NewStudent, ProfileField, StudentProfile, StudentRecord,
    YearFeeInput, YearFees, COMPONENT_COUNT, YEAR_COUNT,
};
