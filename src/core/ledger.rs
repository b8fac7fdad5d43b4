//! In-memory student ledger
//!
//! This module provides the `Ledger` struct, the full table of student records
//! as loaded from the backing file. All queries are direct scans in table
//! order; the only mutations are adding a student and recording a payment.
//!
//! The Ledger does no I/O. Loading and saving go through a
//! [`LedgerStore`](crate::core::traits::LedgerStore).

use crate::core::fees;
use crate::io::csv_format::default_cell;
use crate::types::{
    AcademicYear, LedgerError, NewStudent, PaymentOutcome, PaymentRequest, ProfileField,
    StudentRecord, StudentSelector,
};
use tracing::{debug, warn};

/// Label used for students whose batch is blank
pub const UNKNOWN_BATCH: &str = "Unknown";

/// The full student-record table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    /// Records in table order
    records: Vec<StudentRecord>,
    /// Headers of columns the ledger does not model, in file order
    extra_columns: Vec<String>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Create a ledger from already-normalized records
    pub fn from_parts(records: Vec<StudentRecord>, extra_columns: Vec<String>) -> Self {
        Ledger {
            records,
            extra_columns,
        }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when at least one record has a non-blank name
    pub fn has_named_students(&self) -> bool {
        self.records
            .iter()
            .any(|record| !record.profile.name.trim().is_empty())
    }

    /// Distinct batches in first-seen order
    ///
    /// Blank batches are reported as [`UNKNOWN_BATCH`].
    pub fn batches(&self) -> Vec<String> {
        let mut batches: Vec<String> = Vec::new();
        for record in &self.records {
            let batch = batch_label(record);
            if !batches.iter().any(|seen| seen == batch) {
                batches.push(batch.to_string());
            }
        }
        batches
    }

    /// Records of one batch; [`UNKNOWN_BATCH`] selects blank batches
    pub fn filter_by_batch(&self, batch: &str) -> Vec<&StudentRecord> {
        self.records
            .iter()
            .filter(|record| batch_label(record) == batch)
            .collect()
    }

    /// Records whose field equals `value`
    ///
    /// Matching is exact and case-sensitive, except for the department which
    /// is compared case-insensitively.
    pub fn filter_by_field(&self, field: ProfileField, value: &str) -> Vec<&StudentRecord> {
        self.records
            .iter()
            .filter(|record| {
                let stored = record.profile.get(field);
                if field == ProfileField::Department {
                    stored.to_lowercase() == value.to_lowercase()
                } else {
                    stored == value
                }
            })
            .collect()
    }

    /// Records with an outstanding balance for `year`
    pub fn students_with_dues(&self, year: AcademicYear) -> Vec<&StudentRecord> {
        self.records
            .iter()
            .filter(|record| record.year(year).remaining > rust_decimal::Decimal::ZERO)
            .collect()
    }

    /// Dues report for all four years
    pub fn students_with_dues_all_years(&self) -> Vec<(AcademicYear, Vec<&StudentRecord>)> {
        AcademicYear::ALL
            .into_iter()
            .map(|year| (year, self.students_with_dues(year)))
            .collect()
    }

    /// First record matching the selector, in table order
    ///
    /// Duplicates are logged but not treated as an error here.
    pub fn find(&self, selector: &StudentSelector) -> Option<&StudentRecord> {
        let matches = self.matching_indices(selector);
        if matches.len() > 1 {
            warn!(
                %selector,
                count = matches.len(),
                "lookup matches several students; using the first in table order"
            );
        }
        matches.first().map(|&index| &self.records[index])
    }

    /// Append a new student with computed totals
    ///
    /// Extra columns get their default cell, as a reload would give them.
    ///
    /// # Errors
    ///
    /// Returns an error if any fee input is negative or a total overflows.
    /// The ledger is unchanged on error.
    pub fn add_student(&mut self, new_student: NewStudent) -> Result<&StudentRecord, LedgerError> {
        let NewStudent { profile, fees } = new_student;
        let key = student_key(&profile.register_number, &profile.name).to_string();

        let mut record = StudentRecord {
            profile,
            extra: self
                .extra_columns
                .iter()
                .map(|header| (header.clone(), default_cell(header)))
                .collect(),
            ..Default::default()
        };
        for year in AcademicYear::ALL {
            *record.year_mut(year) = fees::year_fees_from_input(&fees[year.index()], &key)?;
        }

        debug!(student = %key, "appending student record");
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Record a payment against one student's year
    ///
    /// A register number selects the first matching record. A name must match
    /// exactly one record; several matches are rejected as ambiguous.
    ///
    /// # Errors
    ///
    /// Returns an error if no student matches, a name is ambiguous, the amount
    /// is negative, or the arithmetic overflows. The ledger is unchanged on
    /// error.
    pub fn pay(
        &mut self,
        request: &PaymentRequest,
    ) -> Result<(PaymentOutcome, &StudentRecord), LedgerError> {
        let index = self.resolve_for_update(&request.student)?;
        let record = &mut self.records[index];
        let key = student_key(&record.profile.register_number, &record.profile.name).to_string();

        let outcome = fees::apply_payment(
            record.year_mut(request.year),
            request.year,
            request.amount,
            &key,
        )?;

        Ok((outcome, &self.records[index]))
    }

    fn matching_indices(&self, selector: &StudentSelector) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| match selector {
                StudentSelector::Name(name) => record.profile.name == *name,
                StudentSelector::RegisterNumber(reg) => record.profile.register_number == *reg,
            })
            .map(|(index, _)| index)
            .collect()
    }

    fn resolve_for_update(&self, selector: &StudentSelector) -> Result<usize, LedgerError> {
        let matches = self.matching_indices(selector);
        match (selector, matches.as_slice()) {
            (_, []) => Err(LedgerError::student_not_found(selector)),
            (_, [index]) => Ok(*index),
            (StudentSelector::Name(name), several) => Err(LedgerError::ambiguous_student(
                name,
                several
                    .iter()
                    .map(|&index| self.records[index].profile.register_number.clone())
                    .collect(),
            )),
            (StudentSelector::RegisterNumber(_), [first, ..]) => {
                warn!(
                    %selector,
                    count = matches.len(),
                    "register number is not unique; updating the first record"
                );
                Ok(*first)
            }
        }
    }
}

fn batch_label(record: &StudentRecord) -> &str {
    let batch = record.profile.batch.trim();
    if batch.is_empty() {
        UNKNOWN_BATCH
    } else {
        &record.profile.batch
    }
}

/// Identifier used in logs and errors: register number, or name if blank
fn student_key<'a>(register_number: &'a str, name: &'a str) -> &'a str {
    if register_number.trim().is_empty() {
        name
    } else {
        register_number
    }
}
