//! Error types for the fee ledger
//!
//! This module defines all error types that can occur while loading, querying
//! and mutating the ledger. Errors are designed to be descriptive and
//! user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: unreadable ledger or credential files
//! - **CSV Parsing Errors**: structurally broken CSV
//! - **Lookup Errors**: student not found, ambiguous name, unknown field
//! - **Input Errors**: negative amounts, unknown academic year
//! - **Authentication Errors**: unreadable credential store, bad login
//!
//! Unparseable fee values are *not* errors: they are coerced to zero on load.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the fee ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
    ///
    /// A missing ledger file is not an error (it loads as an empty ledger);
    /// this is raised for files that must exist, such as the credential store.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV structure could not be read
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// The credential store exists but could not be used
    ///
    /// This is fatal for the login flow; there is no fallback.
    #[error("Credentials file '{path}' could not be read: {message}")]
    CredentialsUnavailable {
        /// Path of the credential file
        path: String,
        /// What went wrong
        message: String,
    },

    /// Username unknown or password mismatch
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No record matches the lookup
    #[error("No student found with {query}")]
    StudentNotFound {
        /// Human-readable description of the lookup
        query: String,
    },

    /// A name matches more than one record
    #[error("Name '{name}' matches {} students (register numbers: {}); select by register number instead", register_numbers.len(), register_numbers.join(", "))]
    AmbiguousStudent {
        /// The ambiguous name
        name: String,
        /// Register numbers of all matching records, in table order
        register_numbers: Vec<String>,
    },

    /// Amount is negative or otherwise unusable
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
        /// Why it was rejected
        reason: String,
    },

    /// Academic year could not be recognised
    #[error("Invalid academic year '{value}' (expected 1-4, 1st-4th or I-IV)")]
    InvalidYear {
        /// The rejected input
        value: String,
    },

    /// Field name does not name a student column
    #[error("Unknown field '{name}'")]
    UnknownField {
        /// The rejected field name
        name: String,
    },

    /// Arithmetic overflow would occur
    ///
    /// The ledger is left unchanged.
    #[error("Arithmetic overflow in {operation} for student '{student}'")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Register number (or name) of the student
        student: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// A rendered document could not be written out
    ///
    /// Ledger state is unaffected; any triggering payment is already saved.
    #[error("Failed to write document to '{path}': {message}")]
    DocumentWrite {
        /// Destination path
        path: String,
        /// Description of the I/O error
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl From<figment::Error> for LedgerError {
    fn from(error: figment::Error) -> Self {
        LedgerError::Config {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a StudentNotFound error
    pub fn student_not_found(query: impl ToString) -> Self {
        LedgerError::StudentNotFound {
            query: query.to_string(),
        }
    }

    /// Create an AmbiguousStudent error
    pub fn ambiguous_student(name: &str, register_numbers: Vec<String>) -> Self {
        LedgerError::AmbiguousStudent {
            name: name.to_string(),
            register_numbers,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal, reason: &str) -> Self {
        LedgerError::InvalidAmount {
            amount,
            reason: reason.to_string(),
        }
    }

    /// Create an InvalidYear error
    pub fn invalid_year(value: &str) -> Self {
        LedgerError::InvalidYear {
            value: value.to_string(),
        }
    }

    /// Create an UnknownField error
    pub fn unknown_field(name: &str) -> Self {
        LedgerError::UnknownField {
            name: name.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, student: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            student: student.to_string(),
        }
    }

    /// Create a CredentialsUnavailable error
    pub fn credentials_unavailable(path: &str, message: impl ToString) -> Self {
        LedgerError::CredentialsUnavailable {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl ToString) -> Self {
        LedgerError::Config {
            message: message.to_string(),
        }
    }

    /// Create a DocumentWrite error
    pub fn document_write(path: &str, message: impl ToString) -> Self {
        LedgerError::DocumentWrite {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::file_not_found(
        LedgerError::FileNotFound { path: "credentials.csv".to_string() },
        "File not found: credentials.csv"
    )]
    #[case::io_error(
        LedgerError::Io { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::parse_error_with_line(
        LedgerError::Parse { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        LedgerError::Parse { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::invalid_credentials(
        LedgerError::InvalidCredentials,
        "Invalid username or password"
    )]
    #[case::student_not_found(
        LedgerError::StudentNotFound { query: "name 'Bob'".to_string() },
        "No student found with name 'Bob'"
    )]
    #[case::ambiguous_student(
        LedgerError::AmbiguousStudent {
            name: "Alice".to_string(),
            register_numbers: vec!["R1".to_string(), "R2".to_string()],
        },
        "Name 'Alice' matches 2 students (register numbers: R1, R2); select by register number instead"
    )]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: Decimal::new(-5, 0), reason: "must not be negative".to_string() },
        "Invalid amount -5: must not be negative"
    )]
    #[case::invalid_year(
        LedgerError::InvalidYear { value: "5th".to_string() },
        "Invalid academic year '5th' (expected 1-4, 1st-4th or I-IV)"
    )]
    #[case::arithmetic_overflow(
        LedgerError::ArithmeticOverflow { operation: "payment".to_string(), student: "R1".to_string() },
        "Arithmetic overflow in payment for student 'R1'"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::student_not_found(
        LedgerError::student_not_found("name 'Bob'"),
        LedgerError::StudentNotFound { query: "name 'Bob'".to_string() }
    )]
    #[case::invalid_year(
        LedgerError::invalid_year("9"),
        LedgerError::InvalidYear { value: "9".to_string() }
    )]
    #[case::unknown_field(
        LedgerError::unknown_field("height"),
        LedgerError::UnknownField { name: "height".to_string() }
    )]
    #[case::credentials_unavailable(
        LedgerError::credentials_unavailable("c.csv", "missing column 'username'"),
        LedgerError::CredentialsUnavailable { path: "c.csv".to_string(), message: "missing column 'username'".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
