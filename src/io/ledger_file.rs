//! Ledger persistence
//!
//! Provides the two [`LedgerStore`] implementations:
//!
//! - `CsvLedgerStore` - the ledger file on disk, read and rewritten whole
//! - `MemoryLedgerStore` - an in-process ledger used by tests and benches
//!
//! CSV format concerns (columns, coercion, serialization) live in
//! [`csv_format`](crate::io::csv_format).
//!
//! # Error Handling
//!
//! - A missing or zero-length file is an empty ledger, not an error
//! - Unreadable or malformed files map to `Io` / `Parse`
//! - Save creates the parent directory if needed and replaces the file

use crate::core::{Ledger, LedgerStore};
use crate::io::csv_format::{read_ledger_csv, write_ledger_csv};
use crate::types::LedgerError;
use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File-backed ledger store
///
/// # Examples
///
/// ```no_run
/// use student_fee_ledger::core::LedgerStore;
/// use student_fee_ledger::io::CsvLedgerStore;
///
/// let store = CsvLedgerStore::new("students.csv");
/// let ledger = store.load().unwrap();
/// println!("{} students", ledger.len());
/// ```
#[derive(Debug, Clone)]
pub struct CsvLedgerStore {
    path: PathBuf,
}

impl CsvLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvLedgerStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for CsvLedgerStore {
    fn load(&self) -> Result<Ledger, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "ledger file not found; starting empty");
                return Ok(Ledger::new());
            }
            Err(e) => return Err(e.into()),
        };

        if file.metadata()?.len() == 0 {
            info!(path = %self.path.display(), "ledger file is empty");
            return Ok(Ledger::new());
        }

        let ledger = read_ledger_csv(file)?;
        debug!(path = %self.path.display(), students = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut output = BufWriter::new(File::create(&self.path)?);
        write_ledger_csv(ledger, &mut output)?;
        output.flush()?;

        debug!(path = %self.path.display(), students = ledger.len(), "ledger saved");
        Ok(())
    }
}

/// In-memory ledger store
///
/// Counts saves so callers can check that failed operations persist nothing.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    ledger: RefCell<Ledger>,
    saves: Cell<usize>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        MemoryLedgerStore {
            ledger: RefCell::new(ledger),
            saves: Cell::new(0),
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self) -> Result<Ledger, LedgerError> {
        Ok(self.ledger.borrow().clone())
    }

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        *self.ledger.borrow_mut() = ledger.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AcademicYear, FeeComponent, NewStudent, PaymentPurpose, PaymentRequest, StudentProfile,
        StudentSelector, YearFeeInput,
    };
    use rust_decimal::Decimal;
    use std::io::Write as _;
    use tempfile::{tempdir, NamedTempFile};

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn student(name: &str, register_number: &str, tuition: i64) -> NewStudent {
        NewStudent::new(StudentProfile {
            name: name.to_string(),
            register_number: register_number.to_string(),
            batch: "2021-2025".to_string(),
            department: "CSE".to_string(),
            ..Default::default()
        })
        .with_year(
            AcademicYear::First,
            YearFeeInput::default().with(FeeComponent::Tuition, dec(tuition)),
        )
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = CsvLedgerStore::new(dir.path().join("students.csv"));

        let ledger = store.load().unwrap();

        assert!(ledger.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_zero_length_file_loads_empty() {
        let file = NamedTempFile::new().unwrap();
        let store = CsvLedgerStore::new(file.path());

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = CsvLedgerStore::new(dir.path().join("nested").join("students.csv"));

        store.save(&Ledger::new()).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let store = CsvLedgerStore::new(dir.path().join("students.csv"));

        let mut ledger = Ledger::new();
        ledger.add_student(student("Alice", "R1", 1000)).unwrap();
        ledger.add_student(student("Bala", "R2", 2000)).unwrap();
        ledger
            .pay(&PaymentRequest {
                student: StudentSelector::RegisterNumber("R2".to_string()),
                year: AcademicYear::First,
                amount: Decimal::new(50025, 2),
                purpose: PaymentPurpose::General,
            })
            .unwrap();
        store.save(&ledger).unwrap();

        let reloaded = store.load().unwrap();

        assert_eq!(reloaded, ledger);
        let bala = &reloaded.records()[1];
        assert_eq!(bala.year(AcademicYear::First).paid, Decimal::new(50025, 2));
        assert_eq!(bala.year(AcademicYear::First).remaining, Decimal::new(149975, 2));
    }

    #[test]
    fn test_load_normalizes_legacy_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Name,Register Number,Tution Fees 1st year,Paid Fees 1st year,Scholarship").unwrap();
        writeln!(file, "Alice,R1,1000,four hundred,merit").unwrap();
        let store = CsvLedgerStore::new(file.path());

        let ledger = store.load().unwrap();
        let alice = &ledger.records()[0];

        assert_eq!(alice.year(AcademicYear::First).component(FeeComponent::Tuition), dec(1000));
        assert_eq!(alice.year(AcademicYear::First).paid, Decimal::ZERO);
        assert_eq!(alice.year(AcademicYear::Second).total, Decimal::ZERO);
        assert_eq!(alice.extra["Scholarship"], "merit");
        assert_eq!(ledger.extra_columns(), &["Scholarship".to_string()]);
    }

    #[test]
    fn test_unknown_columns_survive_a_save() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Name,Register Number,Scholarship").unwrap();
        writeln!(file, "Alice,R1,merit").unwrap();
        let store = CsvLedgerStore::new(file.path());

        let mut ledger = store.load().unwrap();
        ledger.add_student(student("Bala", "R2", 500)).unwrap();
        store.save(&ledger).unwrap();

        let contents = fs::read_to_string(file.path()).unwrap();
        let header = contents.lines().next().unwrap();
        assert!(header.ends_with(",Scholarship"));

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, ledger);
        assert_eq!(reloaded.records()[0].extra["Scholarship"], "merit");
        assert_eq!(reloaded.records()[1].extra["Scholarship"], "");
    }

    #[test]
    fn test_sub_paisa_payment_rejected_and_round_trip_holds() {
        let dir = tempdir().unwrap();
        let store = CsvLedgerStore::new(dir.path().join("students.csv"));
        let mut ledger = Ledger::new();
        ledger.add_student(student("Alice", "R1", 1000)).unwrap();

        let mut request = PaymentRequest {
            student: StudentSelector::RegisterNumber("R1".to_string()),
            year: AcademicYear::First,
            amount: Decimal::new(5, 3),
            purpose: PaymentPurpose::General,
        };
        let err = ledger.pay(&request).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));

        request.amount = Decimal::new(5, 2);
        ledger.pay(&request).unwrap();
        store.save(&ledger).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, ledger);
        let fees = reloaded.records()[0].year(AcademicYear::First);
        assert_eq!(fees.paid, Decimal::new(5, 2));
        assert_eq!(fees.remaining, Decimal::new(99995, 2));
    }

    #[test]
    fn test_memory_store_starts_from_given_ledger() {
        let mut ledger = Ledger::new();
        ledger.add_student(student("Alice", "R1", 1000)).unwrap();

        let store = MemoryLedgerStore::with_ledger(ledger.clone());

        assert_eq!(store.load().unwrap(), ledger);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let store = MemoryLedgerStore::new();
        assert_eq!(store.save_count(), 0);

        let mut ledger = store.load().unwrap();
        ledger.add_student(student("Alice", "R1", 1000)).unwrap();
        store.save(&ledger).unwrap();

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
