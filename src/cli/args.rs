use crate::documents::Honorific;
use crate::types::{
    AcademicYear, FeeComponent, LedgerError, NewStudent, PaymentPurpose, ProfileField,
    StudentProfile, StudentSelector, YearFeeInput, YEAR_COUNT,
};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// Identifies one student by name or register number
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SelectorArgs {
    /// Student name (exact match)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Register number (exact match)
    #[arg(long = "register", value_name = "REGISTER_NUMBER")]
    pub register_number: Option<String>,
}

impl SelectorArgs {
    pub fn selector(&self) -> StudentSelector {
        match &self.register_number {
            Some(register_number) => StudentSelector::RegisterNumber(register_number.clone()),
            None => StudentSelector::Name(self.name.clone().unwrap_or_default()),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only students of this batch ("Unknown" for students without one)
    #[arg(long, value_name = "BATCH")]
    pub batch: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub student: SelectorArgs,

    /// Year whose fee breakdown is shown
    #[arg(long, value_name = "YEAR", default_value = "1")]
    pub year: AcademicYear,

    /// Write the sheet to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Field to match, e.g. register-number, batch, "Father's Name"
    #[arg(value_name = "FIELD")]
    pub field: ProfileField,

    /// Exact value to match
    #[arg(value_name = "VALUE")]
    pub value: String,
}

#[derive(Args, Debug, Clone)]
pub struct DepartmentArgs {
    /// Department name (case-insensitive)
    #[arg(value_name = "DEPARTMENT")]
    pub department: String,
}

#[derive(Args, Debug, Clone)]
pub struct DuesArgs {
    /// Only this year; all four years when omitted
    #[arg(long, value_name = "YEAR")]
    pub year: Option<AcademicYear>,
}

/// One fee component amount: `<year>:<component>=<amount>`
#[derive(Debug, Clone, PartialEq)]
pub struct FeeEntry {
    pub year: AcademicYear,
    pub component: FeeComponent,
    pub amount: Decimal,
}

impl FromStr for FeeEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, amount) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <year>:<component>=<amount>, got '{}'", s))?;
        let (year, component) = target
            .split_once(':')
            .ok_or_else(|| format!("expected <year>:<component>=<amount>, got '{}'", s))?;

        Ok(FeeEntry {
            year: year.parse::<AcademicYear>().map_err(|e| e.to_string())?,
            component: component.parse()?,
            amount: parse_decimal(amount)?,
        })
    }
}

/// Amount already paid for one year: `<year>=<amount>`
#[derive(Debug, Clone, PartialEq)]
pub struct PaidEntry {
    pub year: AcademicYear,
    pub amount: Decimal,
}

impl FromStr for PaidEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, amount) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <year>=<amount>, got '{}'", s))?;

        Ok(PaidEntry {
            year: year.parse::<AcademicYear>().map_err(|e| e.to_string())?,
            amount: parse_decimal(amount)?,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "register", value_name = "REGISTER_NUMBER")]
    pub register_number: String,
    #[arg(long, default_value = "")]
    pub umis: String,
    #[arg(long, default_value = "")]
    pub emis: String,
    #[arg(long, default_value = "")]
    pub batch: String,
    #[arg(long, default_value = "")]
    pub sex: String,
    #[arg(long, default_value = "")]
    pub department: String,
    /// DD-MM-YYYY or YYYY-MM-DD
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub dob: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub community: String,
    #[arg(long = "nationality-religion", default_value = "")]
    pub nationality_religion: String,
    #[arg(long = "father-name", default_value = "")]
    pub father_name: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub mobile: String,
    #[arg(long, default_value = "")]
    pub aadhar: String,
    #[arg(long = "first-graduate")]
    pub first_graduate: bool,

    /// Fee component, repeatable: `--fee 1:tuition=45000`
    #[arg(long = "fee", value_name = "YEAR:COMPONENT=AMOUNT")]
    pub fees: Vec<FeeEntry>,

    /// Amount already paid, repeatable: `--paid 1=10000`
    #[arg(long = "paid", value_name = "YEAR=AMOUNT")]
    pub paid: Vec<PaidEntry>,
}

impl AddArgs {
    /// Build the ledger input; repeated entries for the same slot add up
    pub fn to_new_student(&self) -> Result<NewStudent, LedgerError> {
        let profile = StudentProfile {
            umis_number: self.umis.clone(),
            emis_number: self.emis.clone(),
            register_number: self.register_number.clone(),
            batch: self.batch.clone(),
            name: self.name.clone(),
            sex: self.sex.clone(),
            department: self.department.clone(),
            date_of_birth: self
                .dob
                .map(|date| date.format(crate::documents::DATE_FORMAT).to_string())
                .unwrap_or_default(),
            community: self.community.clone(),
            nationality_religion: self.nationality_religion.clone(),
            father_name: self.father_name.clone(),
            address: self.address.clone(),
            mobile_number: self.mobile.clone(),
            aadhar_number: self.aadhar.clone(),
            first_graduate: if self.first_graduate { "Yes" } else { "No" }.to_string(),
        };

        let mut fees: [YearFeeInput; YEAR_COUNT] = Default::default();
        for entry in &self.fees {
            let slot = &mut fees[entry.year.index()].components[entry.component.index()];
            *slot = slot.checked_add(entry.amount).ok_or_else(|| {
                LedgerError::arithmetic_overflow("fee entry", &self.register_number)
            })?;
        }
        for entry in &self.paid {
            let slot = &mut fees[entry.year.index()].paid;
            *slot = slot.checked_add(entry.amount).ok_or_else(|| {
                LedgerError::arithmetic_overflow("paid entry", &self.register_number)
            })?;
        }

        Ok(NewStudent { profile, fees })
    }
}

#[derive(Args, Debug, Clone)]
pub struct PayArgs {
    #[command(flatten)]
    pub student: SelectorArgs,

    #[arg(long, value_name = "YEAR")]
    pub year: AcademicYear,

    #[arg(long, value_name = "AMOUNT", value_parser = parse_decimal)]
    pub amount: Decimal,

    /// Fee component printed on the receipt, or "general"
    #[arg(long, value_name = "PURPOSE", default_value = "general")]
    pub purpose: PaymentPurpose,

    /// Write the receipt to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TransferArgs {
    #[command(flatten)]
    pub student: SelectorArgs,

    #[arg(long = "admission-number", value_name = "NUMBER", default_value = "")]
    pub admission_number: String,

    #[arg(long = "admitted", value_name = "DATE", value_parser = parse_date)]
    pub date_of_admission: NaiveDate,

    #[arg(long = "left", value_name = "DATE", value_parser = parse_date)]
    pub date_of_leaving: NaiveDate,

    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ConductArgs {
    #[command(flatten)]
    pub student: SelectorArgs,

    /// Selvan or Selvi
    #[arg(long, value_name = "TITLE")]
    pub title: Honorific,

    #[arg(long = "from", value_name = "DATE", value_parser = parse_date)]
    pub period_from: NaiveDate,

    #[arg(long = "to", value_name = "DATE", value_parser = parse_date)]
    pub period_to: NaiveDate,

    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct UpiArgs {
    /// Amount in rupees, at least 1
    #[arg(long, value_name = "AMOUNT", value_parser = parse_decimal)]
    pub amount: Decimal,
}

/// Parse `DD-MM-YYYY` (document format) or ISO `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, crate::documents::DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date '{}' (expected DD-MM-YYYY)", value))
}

fn parse_decimal(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value.trim()).map_err(|e| format!("invalid amount '{}': {}", value, e))
}
