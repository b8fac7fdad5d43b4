//! Printable documents
//!
//! Every document is a pure function of a record snapshot plus caller
//! metadata (dates, numbers, institution details). Nothing here reads or
//! writes the ledger.
//!
//! # Components
//!
//! - `receipt` - payment receipt
//! - `transfer` - transfer certificate
//! - `conduct` - conduct certificate
//! - `sheet` - student detail sheet with per-year fee status
//! - `upi` - UPI payment link

pub mod conduct;
pub mod receipt;
pub mod sheet;
pub mod transfer;
pub mod upi;

pub use conduct::{ConductCertificate, ConductDetails, Honorific};
pub use receipt::PaymentReceipt;
pub use sheet::StudentSheet;
pub use transfer::{TransferCertificate, TransferDetails};
pub use upi::UpiPayment;

use crate::types::LedgerError;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Date format used on every document
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Timestamp format used in document numbers
pub const NUMBER_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

const RULE_WIDTH: usize = 64;

/// Letterhead details printed on documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Institution {
    pub name: String,
    pub affiliation: String,
    pub address: String,
}

impl Default for Institution {
    fn default() -> Self {
        Institution {
            name: "DR.G.U.Pope College Of Engineering".to_string(),
            affiliation: "(Approved by AICTE, Affiliated to Anna University)".to_string(),
            address: "Pope Nagar, Sawyerpuram Thoothukudi District-628251".to_string(),
        }
    }
}

/// A renderable document
pub trait Document {
    /// Document number, e.g. `RCPT-20240101093000`
    fn number(&self) -> &str;

    /// Plain-text rendering
    fn render(&self, institution: &Institution) -> String;
}

/// Render `document` to `out`, or to `stdout` when no path is given
///
/// # Errors
///
/// Returns `DocumentWrite` if the output cannot be written.
pub fn write_document(
    document: &dyn Document,
    institution: &Institution,
    out: Option<&Path>,
    stdout: &mut dyn Write,
) -> Result<(), LedgerError> {
    let text = document.render(institution);

    match out {
        Some(path) => {
            let shown = path.display().to_string();
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .map_err(|e| LedgerError::document_write(&shown, e))?;
                }
            }
            fs::write(path, text).map_err(|e| LedgerError::document_write(&shown, e))?;
            info!(number = document.number(), path = %shown, "document written");
        }
        None => {
            stdout
                .write_all(text.as_bytes())
                .map_err(|e| LedgerError::document_write("<stdout>", e))?;
        }
    }

    Ok(())
}

/// `"<prefix>-<YYYYmmddHHMMSS>"`
pub(crate) fn document_number(prefix: &str, at: NaiveDateTime) -> String {
    format!("{}-{}", prefix, at.format(NUMBER_STAMP_FORMAT))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn rupees(amount: Decimal) -> String {
    format!("₹{:.2}", amount)
}

pub(crate) fn rule(ch: char) -> String {
    std::iter::repeat(ch).take(RULE_WIDTH).collect()
}

/// Centered letterhead followed by the document title
pub(crate) fn letterhead(institution: &Institution, title: &str, with_affiliation: bool) -> String {
    let mut lines = vec![institution.name.as_str()];
    if with_affiliation {
        lines.push(&institution.affiliation);
    }
    lines.push(&institution.address);

    let mut out = String::new();
    for line in lines.into_iter().filter(|line| !line.is_empty()) {
        let _ = writeln!(out, "{:^width$}", line, width = RULE_WIDTH);
    }
    out.push('\n');
    let _ = writeln!(out, "{:^width$}", title, width = RULE_WIDTH);
    out.push_str(&rule('='));
    out.push('\n');
    out
}

/// Two values on one line, left and right aligned
pub(crate) fn split_line(left: &str, right: &str) -> String {
    let gap = RULE_WIDTH
        .saturating_sub(left.chars().count() + right.chars().count())
        .max(2);
    format!("{}{}{}\n", left, " ".repeat(gap), right)
}
