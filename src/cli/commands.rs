//! Command handlers.
//!
//! Handlers write to the given output instead of stdout directly so whole
//! interactions can be driven from tests.

use std::io::{BufRead, Write};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::{
    AddArgs, Cli, Command, ConductArgs, DuesArgs, ListArgs, PayArgs, SearchArgs, ShowArgs,
    TransferArgs, UpiArgs,
};
use crate::config::Config;
use crate::core::auth::hash_password as hash_secret;
use crate::core::{FeeOffice, Ledger, Operator};
use crate::documents::{
    write_document, ConductCertificate, ConductDetails, Document, PaymentReceipt, StudentSheet,
    TransferCertificate, TransferDetails, UpiPayment,
};
use crate::io::{load_credentials, CsvLedgerStore};
use crate::types::{
    AcademicYear, LedgerError, PaymentRequest, ProfileField, StudentRecord, StudentSelector,
};

/// Environment variable consulted for the operator password before stdin.
pub const PASSWORD_ENV: &str = "FEE_LEDGER_PASSWORD";

type Office = FeeOffice<CsvLedgerStore>;

/// Run one interaction.
///
/// `now` stamps document numbers and dates.
///
/// # Errors
///
/// Returns the first error of login, loading, the command itself, saving,
/// or writing its output.
pub fn run(
    cli: &Cli,
    config: &Config,
    stdin: &mut dyn BufRead,
    stdout: &mut dyn Write,
    now: NaiveDateTime,
) -> Result<(), LedgerError> {
    if cli.command.requires_login() {
        let operator = login(cli, config, stdin)?;
        debug!(operator = %operator.username, "logged in");
    }
    let office: Office = FeeOffice::new(CsvLedgerStore::new(config.data_file()));

    match &cli.command {
        Command::HashPassword => hash_password(cli, stdin, stdout),
        Command::Batches => batches(&office, stdout),
        Command::List(args) => list(&office, args, stdout),
        Command::Show(args) => show(&office, config, args, stdout),
        Command::Search(args) => search(&office, args, stdout),
        Command::Department(args) => {
            let ledger = office.ledger()?;
            let records = ledger.filter_by_field(ProfileField::Department, &args.department);
            write_students(stdout, &records)
        }
        Command::Dues(args) => dues(&office, args, stdout),
        Command::Add(args) => add(&office, args, stdout),
        Command::Pay(args) => pay(&office, config, args, stdout, now),
        Command::TransferCertificate(args) => {
            transfer_certificate(&office, config, args, stdout, now)
        }
        Command::ConductCertificate(args) => {
            conduct_certificate(&office, config, args, stdout, now)
        }
        Command::UpiLink(args) => upi_link(config, args, stdout),
    }
}

fn login(cli: &Cli, config: &Config, stdin: &mut dyn BufRead) -> Result<Operator, LedgerError> {
    let username = cli
        .user
        .as_deref()
        .ok_or_else(|| LedgerError::config("--user is required for this command"))?;
    let credentials = load_credentials(&config.credentials_file())?;
    let password = read_password(stdin)?;

    credentials.authenticate(username, &password, config.auth.allow_plaintext)
}

fn read_password(stdin: &mut dyn BufRead) -> Result<String, LedgerError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }

    let mut line = String::new();
    stdin.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn hash_password(
    cli: &Cli,
    stdin: &mut dyn BufRead,
    stdout: &mut dyn Write,
) -> Result<(), LedgerError> {
    let username = cli
        .user
        .as_deref()
        .ok_or_else(|| LedgerError::config("--user is required for hash-password"))?;
    let password = read_password(stdin)?;
    if password.is_empty() {
        return Err(LedgerError::config("refusing to hash an empty password"));
    }

    writeln!(stdout, "username,password_hash")?;
    writeln!(stdout, "{},{}", username, hash_secret(&password).encode())?;
    Ok(())
}

fn batches(office: &Office, stdout: &mut dyn Write) -> Result<(), LedgerError> {
    let ledger = office.ledger()?;
    if !ledger.has_named_students() {
        writeln!(stdout, "No students available.")?;
        return Ok(());
    }

    for batch in ledger.batches() {
        let count = ledger.filter_by_batch(&batch).len();
        writeln!(stdout, "{}\t{}", batch, count)?;
    }
    Ok(())
}

fn list(office: &Office, args: &ListArgs, stdout: &mut dyn Write) -> Result<(), LedgerError> {
    let ledger = office.ledger()?;
    if !ledger.has_named_students() {
        writeln!(stdout, "No students available.")?;
        return Ok(());
    }

    let records: Vec<&StudentRecord> = match &args.batch {
        Some(batch) => ledger.filter_by_batch(batch),
        None => ledger.records().iter().collect(),
    };
    write_students(stdout, &records)
}

fn show(
    office: &Office,
    config: &Config,
    args: &ShowArgs,
    stdout: &mut dyn Write,
) -> Result<(), LedgerError> {
    let ledger = office.ledger()?;
    let selector = args.student.selector();
    let record = find(&ledger, &selector)?;

    let sheet = StudentSheet::new(record, ledger.extra_columns(), args.year);
    write_document(&sheet, &config.institution, args.out.as_deref(), stdout)
}

fn search(office: &Office, args: &SearchArgs, stdout: &mut dyn Write) -> Result<(), LedgerError> {
    let ledger = office.ledger()?;
    let records = ledger.filter_by_field(args.field, &args.value);
    write_students(stdout, &records)
}

fn dues(office: &Office, args: &DuesArgs, stdout: &mut dyn Write) -> Result<(), LedgerError> {
    let ledger = office.ledger()?;

    match args.year {
        Some(year) => write_dues(stdout, year, &ledger.students_with_dues(year)),
        None => {
            for (year, records) in ledger.students_with_dues_all_years() {
                write_dues(stdout, year, &records)?;
            }
            Ok(())
        }
    }
}

fn add(office: &Office, args: &AddArgs, stdout: &mut dyn Write) -> Result<(), LedgerError> {
    let record = office.add_student(args.to_new_student()?)?;

    writeln!(
        stdout,
        "Added {} ({})",
        record.name(),
        record.register_number()
    )?;
    for year in AcademicYear::ALL {
        let fees = record.year(year);
        if !fees.is_blank() {
            writeln!(
                stdout,
                "  {}: total {:.2}, paid {:.2}, remaining {:.2}",
                year.roman_label(),
                fees.total,
                fees.paid,
                fees.remaining
            )?;
        }
    }
    Ok(())
}

fn pay(
    office: &Office,
    config: &Config,
    args: &PayArgs,
    stdout: &mut dyn Write,
    now: NaiveDateTime,
) -> Result<(), LedgerError> {
    let request = PaymentRequest {
        student: args.student.selector(),
        year: args.year,
        amount: args.amount,
        purpose: args.purpose,
    };
    let payment = office.pay(&request)?;

    // The payment is saved at this point; a failed receipt does not undo it
    let receipt = PaymentReceipt::new(&payment, now);
    info!(receipt = receipt.number(), "receipt issued");
    write_document(&receipt, &config.institution, args.out.as_deref(), stdout)
}

fn transfer_certificate(
    office: &Office,
    config: &Config,
    args: &TransferArgs,
    stdout: &mut dyn Write,
    now: NaiveDateTime,
) -> Result<(), LedgerError> {
    let ledger = office.ledger()?;
    let record = find(&ledger, &args.student.selector())?;

    let details = TransferDetails {
        admission_number: args.admission_number.clone(),
        date_of_admission: args.date_of_admission,
        date_of_leaving: args.date_of_leaving,
    };
    let certificate = TransferCertificate::new(&record.profile, details, now);
    write_document(&certificate, &config.institution, args.out.as_deref(), stdout)
}

fn conduct_certificate(
    office: &Office,
    config: &Config,
    args: &ConductArgs,
    stdout: &mut dyn Write,
    now: NaiveDateTime,
) -> Result<(), LedgerError> {
    let ledger = office.ledger()?;
    let record = find(&ledger, &args.student.selector())?;

    let details = ConductDetails {
        honorific: args.title,
        period_from: args.period_from,
        period_to: args.period_to,
    };
    let certificate = ConductCertificate::new(&record.profile, details, now);
    write_document(&certificate, &config.institution, args.out.as_deref(), stdout)
}

fn upi_link(config: &Config, args: &UpiArgs, stdout: &mut dyn Write) -> Result<(), LedgerError> {
    let payment = UpiPayment::new(&config.payment.upi_id, &config.payment.payee_name, args.amount)?;
    writeln!(stdout, "{}", payment)?;
    Ok(())
}

fn find<'a>(
    ledger: &'a Ledger,
    selector: &StudentSelector,
) -> Result<&'a StudentRecord, LedgerError> {
    ledger
        .find(selector)
        .ok_or_else(|| LedgerError::student_not_found(selector))
}

fn write_students(stdout: &mut dyn Write, records: &[&StudentRecord]) -> Result<(), LedgerError> {
    if records.is_empty() {
        writeln!(stdout, "No students found.")?;
        return Ok(());
    }

    writeln!(
        stdout,
        "{:<16} {:<28} {:<12} {}",
        "Register Number", "Name", "Batch", "Department"
    )?;
    for record in records {
        let profile = &record.profile;
        writeln!(
            stdout,
            "{:<16} {:<28} {:<12} {}",
            profile.register_number, profile.name, profile.batch, profile.department
        )?;
    }
    Ok(())
}

fn write_dues(
    stdout: &mut dyn Write,
    year: AcademicYear,
    records: &[&StudentRecord],
) -> Result<(), LedgerError> {
    if records.is_empty() {
        writeln!(stdout, "No students with pending fees for {}.", year)?;
        return Ok(());
    }

    writeln!(stdout, "Pending fees for {}:", year)?;
    for record in records {
        writeln!(
            stdout,
            "  {:<16} {:<28} {:>12.2}",
            record.register_number(),
            record.name(),
            record.year(year).remaining
        )?;
    }
    Ok(())
}
