//! CSV format handling for the ledger file
//!
//! This module centralizes all ledger file format concerns, providing:
//! - the canonical column layout (legacy spreadsheet headers)
//! - row → record conversion with column/type normalization
//! - record → row serialization
//!
//! Normalization rules applied on every load:
//! - every expected column exists afterwards (text → "", numeric → 0)
//! - every column whose header contains a fee keyword is numeric; values
//!   that do not parse become 0
//! - columns the ledger does not model are kept, in file order
//!
//! Apart from the reader/writer entry points all functions are pure.

use crate::core::fees::AMOUNT_SCALE;
use crate::core::Ledger;
use crate::types::{
    AcademicYear, FeeComponent, LedgerError, ProfileField, StudentRecord, YearFees,
};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing::debug;

/// Substrings that mark a column as numeric
pub const FEE_KEYWORDS: [&str; 6] = ["Fees", "Paid", "Remaining", "Total", "Due", "Fine"];

const PAID_PREFIX: &str = "Paid Fees";
const REMAINING_PREFIX: &str = "Remaining Fees";
const TOTAL_PREFIX: &str = "Total Fees";

/// What a known column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Profile(ProfileField),
    Component(AcademicYear, FeeComponent),
    Paid(AcademicYear),
    Remaining(AcademicYear),
    Total(AcademicYear),
}

impl Column {
    /// Header text of the column
    pub fn header(self) -> String {
        match self {
            Column::Profile(field) => field.column().to_string(),
            Column::Component(year, component) => year_column(component.label(), year),
            Column::Paid(year) => year_column(PAID_PREFIX, year),
            Column::Remaining(year) => year_column(REMAINING_PREFIX, year),
            Column::Total(year) => year_column(TOTAL_PREFIX, year),
        }
    }
}

/// `"<prefix> <ordinal> year"`, e.g. `"Bus Fees 2nd year"`
pub fn year_column(prefix: &str, year: AcademicYear) -> String {
    format!("{} {} year", prefix, year.ordinal())
}

/// All known columns in canonical order
///
/// Profile columns first, then for each year the nine components followed
/// by paid, remaining and total.
pub fn known_columns() -> Vec<Column> {
    let mut columns: Vec<Column> = ProfileField::ALL.into_iter().map(Column::Profile).collect();
    for year in AcademicYear::ALL {
        columns.extend(
            FeeComponent::ALL
                .into_iter()
                .map(|component| Column::Component(year, component)),
        );
        columns.push(Column::Paid(year));
        columns.push(Column::Remaining(year));
        columns.push(Column::Total(year));
    }
    columns
}

/// True when the header names a numeric (fee-related) column
pub fn is_fee_column(header: &str) -> bool {
    FEE_KEYWORDS.iter().any(|keyword| header.contains(keyword))
}

/// Parse a fee cell, coercing anything unparseable to zero
///
/// Accepts plain decimals and scientific notation as spreadsheet exports
/// produce. Blank cells are zero. Values are rounded to paise, so a loaded
/// ledger holds exactly what the next save writes.
pub fn parse_amount(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(round_to_paise)
        .unwrap_or_else(|_| {
            debug!(value = trimmed, "non-numeric fee value coerced to 0");
            Decimal::ZERO
        })
}

/// Round half away from zero to two decimal places
pub fn round_to_paise(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for the ledger file (two decimal places)
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_to_paise(amount))
}

/// Default cell value for a column that is missing from a row
pub fn default_cell(header: &str) -> String {
    if is_fee_column(header) {
        format_amount(Decimal::ZERO)
    } else {
        String::new()
    }
}

/// Maps the headers of one file to known columns and extra columns
#[derive(Debug, Clone)]
pub struct ColumnMap {
    /// For each file position: the known column it holds, or None if extra
    positions: Vec<Option<Column>>,
    headers: Vec<String>,
    extra_columns: Vec<String>,
}

impl ColumnMap {
    /// Classify the header row of a ledger file
    ///
    /// A header that appears twice is only read from its first position.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let lookup: HashMap<String, Column> = known_columns()
            .into_iter()
            .map(|column| (column.header(), column))
            .collect();

        let mut seen: Vec<String> = Vec::new();
        let mut positions = Vec::with_capacity(headers.len());
        let mut names = Vec::with_capacity(headers.len());
        let mut extra_columns = Vec::new();

        for raw in headers.iter() {
            let header = raw.trim_start_matches('\u{feff}').trim().to_string();
            if header.is_empty() || seen.contains(&header) {
                positions.push(None);
                names.push(String::new());
                continue;
            }
            seen.push(header.clone());

            match lookup.get(&header) {
                Some(column) => positions.push(Some(*column)),
                None => {
                    positions.push(None);
                    extra_columns.push(header.clone());
                }
            }
            names.push(header);
        }

        ColumnMap {
            positions,
            headers: names,
            extra_columns,
        }
    }

    /// Columns of the file that the ledger does not model, in file order
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Convert one data row into a normalized record
    pub fn record_from_row(&self, row: &StringRecord) -> StudentRecord {
        let mut record = StudentRecord::default();

        for (position, value) in row.iter().enumerate() {
            let header = match self.headers.get(position) {
                Some(header) if !header.is_empty() => header,
                _ => continue,
            };

            match self.positions[position] {
                Some(column) => apply_cell(&mut record, column, value),
                None => {
                    if record.extra.contains_key(header) {
                        continue;
                    }
                    let cell = if is_fee_column(header) {
                        format_amount(parse_amount(value))
                    } else {
                        value.to_string()
                    };
                    record.extra.insert(header.clone(), cell);
                }
            }
        }

        // Short rows: synthesize the missing extra cells
        for header in &self.extra_columns {
            record
                .extra
                .entry(header.clone())
                .or_insert_with(|| default_cell(header));
        }

        record
    }
}

fn apply_cell(record: &mut StudentRecord, column: Column, value: &str) {
    match column {
        Column::Profile(field) => record.profile.set(field, value.to_string()),
        Column::Component(year, component) => record
            .year_mut(year)
            .set_component(component, parse_amount(value)),
        Column::Paid(year) => record.year_mut(year).paid = parse_amount(value),
        Column::Remaining(year) => record.year_mut(year).remaining = parse_amount(value),
        Column::Total(year) => record.year_mut(year).total = parse_amount(value),
    }
}

fn cell_value(record: &StudentRecord, column: Column) -> String {
    let fees = |year: AcademicYear| -> &YearFees { record.year(year) };
    match column {
        Column::Profile(field) => record.profile.get(field).to_string(),
        Column::Component(year, component) => format_amount(fees(year).component(component)),
        Column::Paid(year) => format_amount(fees(year).paid),
        Column::Remaining(year) => format_amount(fees(year).remaining),
        Column::Total(year) => format_amount(fees(year).total),
    }
}

/// Header row for a ledger with the given extra columns
pub fn header_row(extra_columns: &[String]) -> Vec<String> {
    known_columns()
        .into_iter()
        .map(Column::header)
        .chain(extra_columns.iter().cloned())
        .collect()
}

/// Serialize one record in header order
pub fn record_to_row(record: &StudentRecord, extra_columns: &[String]) -> Vec<String> {
    known_columns()
        .into_iter()
        .map(|column| cell_value(record, column))
        .chain(extra_columns.iter().map(|header| {
            record
                .extra
                .get(header)
                .cloned()
                .unwrap_or_else(|| default_cell(header))
        }))
        .collect()
}

/// Field name → value view of a record, in column order
///
/// This is the snapshot handed to presentation code.
pub fn snapshot(record: &StudentRecord, extra_columns: &[String]) -> Vec<(String, String)> {
    header_row(extra_columns)
        .into_iter()
        .zip(record_to_row(record, extra_columns))
        .collect()
}

/// Read a whole ledger from CSV
///
/// Empty input yields an empty ledger.
pub fn read_ledger_csv(input: impl Read) -> Result<Ledger, LedgerError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers);

    let mut records = Vec::new();
    for row in reader.records() {
        records.push(columns.record_from_row(&row?));
    }

    debug!(
        students = records.len(),
        extra_columns = columns.extra_columns().len(),
        "ledger parsed"
    );
    Ok(Ledger::from_parts(records, columns.extra_columns().to_vec()))
}

/// Write a whole ledger as CSV
pub fn write_ledger_csv(ledger: &Ledger, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(header_row(ledger.extra_columns()))?;
    for record in ledger.records() {
        writer.write_record(record_to_row(record, ledger.extra_columns()))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_known_columns_layout() {
        let columns = known_columns();
        // 15 profile columns + 4 years × 12 fee columns
        assert_eq!(columns.len(), 15 + 4 * 12);
        assert_eq!(columns[0].header(), "UMIS Number");
        assert_eq!(columns[15].header(), "Bus Fees 1st year");
        assert_eq!(columns[19].header(), "Tution Fees 1st year");
        assert_eq!(columns[26].header(), "Total Fees 1st year");
        assert_eq!(columns[62].header(), "Total Fees 4th year");
    }

    #[rstest]
    #[case::fees("Hostel Fees 2nd year", true)]
    #[case::fine("Fine 1st year", true)]
    #[case::due("Due Fees 3rd year", true)]
    #[case::custom_total("Grand Total", true)]
    #[case::miscellaneous("Miscellaneous 1st year", false)]
    #[case::name("Name", false)]
    #[case::mobile("Mobile Number", false)]
    fn test_is_fee_column(#[case] header: &str, #[case] expected: bool) {
        assert_eq!(is_fee_column(header), expected);
    }

    #[rstest]
    #[case::integer("1000", dec(1000))]
    #[case::decimal("  1000.50 ", Decimal::new(100050, 2))]
    #[case::scientific("1e3", dec(1000))]
    #[case::blank("", Decimal::ZERO)]
    #[case::text("N/A", Decimal::ZERO)]
    #[case::currency_symbol("₹500", Decimal::ZERO)]
    #[case::rounded_to_paise("12.345", Decimal::new(1235, 2))]
    #[case::scientific_fraction("1.2345e1", Decimal::new(1235, 2))]
    fn test_parse_amount(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw), expected);
    }

    #[test]
    fn test_format_amount_two_places() {
        assert_eq!(format_amount(dec(1000)), "1000.00");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
        assert_eq!(format_amount(Decimal::new(12355, 3)), "12.36");
        assert_eq!(format_amount(Decimal::new(-12345, 3)), "-12.35");
    }

    #[test]
    fn test_read_missing_columns_are_defaulted() {
        let csv = "Name,Register Number,Tution Fees 1st year\nAlice,R1,1000\n";

        let ledger = read_ledger_csv(csv.as_bytes()).unwrap();
        let record = &ledger.records()[0];

        assert_eq!(record.name(), "Alice");
        assert_eq!(record.profile.batch, "");
        assert_eq!(
            record.year(AcademicYear::First).component(FeeComponent::Tuition),
            dec(1000)
        );
        assert_eq!(record.year(AcademicYear::Fourth).total, Decimal::ZERO);
        assert!(ledger.extra_columns().is_empty());
    }

    #[test]
    fn test_read_coerces_non_numeric_fees() {
        let csv = "Name,Bus Fees 1st year,Paid Fees 1st year,Remaining Fees 1st year\n\
                   Alice,abc,,300\n";

        let ledger = read_ledger_csv(csv.as_bytes()).unwrap();
        let fees = ledger.records()[0].year(AcademicYear::First);

        assert_eq!(fees.component(FeeComponent::Bus), Decimal::ZERO);
        assert_eq!(fees.paid, Decimal::ZERO);
        assert_eq!(fees.remaining, dec(300));
    }

    #[test]
    fn test_read_keeps_and_coerces_extra_columns() {
        let csv = "Name,Blood Group,Library Fees\nAlice,O+,oops\nBala\n";

        let ledger = read_ledger_csv(csv.as_bytes()).unwrap();

        assert_eq!(
            ledger.extra_columns(),
            &["Blood Group".to_string(), "Library Fees".to_string()]
        );
        let alice = &ledger.records()[0];
        assert_eq!(alice.extra["Blood Group"], "O+");
        assert_eq!(alice.extra["Library Fees"], "0.00");

        let bala = &ledger.records()[1];
        assert_eq!(bala.extra["Blood Group"], "");
        assert_eq!(bala.extra["Library Fees"], "0.00");
    }

    #[test]
    fn test_read_empty_input() {
        let ledger = read_ledger_csv("".as_bytes()).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_read_strips_byte_order_mark() {
        let csv = "\u{feff}Name,Batch\nAlice,2021\n";
        let ledger = read_ledger_csv(csv.as_bytes()).unwrap();
        assert_eq!(ledger.records()[0].name(), "Alice");
        assert!(ledger.extra_columns().is_empty());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let csv = "Name,Register Number,Tution Fees 2nd year,Paid Fees 2nd year,Remaining Fees 2nd year,Total Fees 2nd year,Hobby\n\
                   Alice,R1,1500.25,500,1000.25,1500.25,chess\n";
        let ledger = read_ledger_csv(csv.as_bytes()).unwrap();

        let mut output = Vec::new();
        write_ledger_csv(&ledger, &mut output).unwrap();
        let reloaded = read_ledger_csv(output.as_slice()).unwrap();

        assert_eq!(reloaded, ledger);
        let header = String::from_utf8(output).unwrap();
        assert!(header.starts_with("UMIS Number,EMIS Number,Register Number,"));
        assert!(header.lines().next().unwrap().ends_with(",Hobby"));
    }

    #[test]
    fn test_read_keeps_whitespace_inside_text_cells() {
        let csv = " Name , Address ,Tution Fees 1st year,Hobby\n\
                   Alice,  12 Main St , 1000 , chess \n";

        let ledger = read_ledger_csv(csv.as_bytes()).unwrap();
        let record = &ledger.records()[0];

        assert_eq!(record.profile.address, "  12 Main St ");
        assert_eq!(record.extra["Hobby"], " chess ");
        assert_eq!(
            record.year(AcademicYear::First).component(FeeComponent::Tuition),
            dec(1000)
        );

        let mut output = Vec::new();
        write_ledger_csv(&ledger, &mut output).unwrap();
        assert_eq!(read_ledger_csv(output.as_slice()).unwrap(), ledger);
    }

    #[test]
    fn test_sub_paisa_cells_load_as_saved() {
        let csv = "Name,Paid Fees 1st year,Remaining Fees 1st year\nAlice,0.005,999.995\n";
        let ledger = read_ledger_csv(csv.as_bytes()).unwrap();

        let mut output = Vec::new();
        write_ledger_csv(&ledger, &mut output).unwrap();
        let reloaded = read_ledger_csv(output.as_slice()).unwrap();

        assert_eq!(reloaded, ledger);
        assert_eq!(ledger.records()[0].year(AcademicYear::First).paid, Decimal::new(1, 2));
    }

    #[test]
    fn test_snapshot_pairs_headers_with_values() {
        let csv = "Name,Department\nAlice,CSE\n";
        let ledger = read_ledger_csv(csv.as_bytes()).unwrap();

        let snapshot = snapshot(&ledger.records()[0], ledger.extra_columns());

        assert!(snapshot.contains(&("Name".to_string(), "Alice".to_string())));
        assert!(snapshot.contains(&("Department".to_string(), "CSE".to_string())));
        assert!(snapshot.contains(&("Total Fees 3rd year".to_string(), "0.00".to_string())));
    }
}
