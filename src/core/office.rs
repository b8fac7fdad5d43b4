//! Fee office orchestration
//!
//! This module provides the `FeeOffice` that runs one interaction against a
//! [`LedgerStore`]: reload the whole ledger, apply a single operation, and
//! (for mutations) write the whole ledger back before returning.
//!
//! There is no locking. Two offices working on the same file race and the
//! last save wins.

use crate::core::ledger::Ledger;
use crate::core::traits::LedgerStore;
use crate::types::{
    LedgerError, NewStudent, PaymentOutcome, PaymentPurpose, PaymentRequest, StudentRecord,
};
use tracing::info;

/// A persisted payment and the data needed to print its receipt
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPayment {
    /// Snapshot of the student after the payment
    pub student: StudentRecord,
    pub outcome: PaymentOutcome,
    pub purpose: PaymentPurpose,
}

/// Runs ledger operations as load → mutate → save cycles
#[derive(Debug)]
pub struct FeeOffice<S> {
    store: S,
}

impl<S: LedgerStore> FeeOffice<S> {
    pub fn new(store: S) -> Self {
        FeeOffice { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fresh copy of the ledger for read-only operations
    pub fn ledger(&self) -> Result<Ledger, LedgerError> {
        self.store.load()
    }

    /// Add a student and persist the ledger
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid (nothing is saved), or if
    /// loading or saving fails.
    pub fn add_student(&self, new_student: NewStudent) -> Result<StudentRecord, LedgerError> {
        let mut ledger = self.store.load()?;
        let record = ledger.add_student(new_student)?.clone();
        self.store.save(&ledger)?;

        info!(
            name = %record.profile.name,
            register_number = %record.profile.register_number,
            students = ledger.len(),
            "student added"
        );
        Ok(record)
    }

    /// Record a payment and persist the ledger
    ///
    /// The payment is saved before this returns; printing the receipt is left
    /// to the caller and cannot undo it.
    ///
    /// # Errors
    ///
    /// Returns an error if the student cannot be resolved or the amount is
    /// invalid (nothing is saved), or if loading or saving fails.
    pub fn pay(&self, request: &PaymentRequest) -> Result<CompletedPayment, LedgerError> {
        let mut ledger = self.store.load()?;
        let (outcome, record) = ledger.pay(request)?;
        let student = record.clone();
        self.store.save(&ledger)?;

        info!(
            register_number = %student.profile.register_number,
            year = %outcome.year,
            amount = %outcome.amount,
            remaining = %outcome.remaining,
            "payment recorded"
        );
        Ok(CompletedPayment {
            student,
            outcome,
            purpose: request.purpose,
        })
    }
}
