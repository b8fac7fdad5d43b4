//! Command-line interface for the fee ledger.
//!
//! This module provides the CLI structure and command handlers for the
//! `fee-ledger` binary. Every invocation is one interaction: log in, load the
//! ledger, run one command, and save if the command mutates.

mod args;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use args::{
    parse_date, AddArgs, ConductArgs, DepartmentArgs, DuesArgs, FeeEntry, ListArgs, PaidEntry,
    PayArgs, SearchArgs, SelectorArgs, ShowArgs, TransferArgs, UpiArgs,
};
pub use commands::{run, PASSWORD_ENV};

use crate::config::Config;
use crate::logging::Verbosity;

/// fee-ledger - College fee office ledger
///
/// Keeps the student fee table, records payments and prints receipts and
/// certificates.
#[derive(Debug, Parser)]
#[command(name = "fee-ledger")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ledger CSV (overrides ledger.data_file)
    #[arg(long = "data-file", global = true, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Credentials CSV (overrides ledger.credentials_file)
    #[arg(long = "credentials-file", global = true, value_name = "FILE")]
    pub credentials_file: Option<PathBuf>,

    /// Operator username; the password is read from FEE_LEDGER_PASSWORD or stdin
    #[arg(short, long, global = true, value_name = "USERNAME")]
    pub user: Option<String>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List batches (students without a batch appear as "Unknown")
    Batches,

    /// List students, optionally of one batch
    List(ListArgs),

    /// Show one student's details and fee status
    Show(ShowArgs),

    /// Find students whose field equals a value
    Search(SearchArgs),

    /// List students of a department
    Department(DepartmentArgs),

    /// List students with an outstanding balance
    Dues(DuesArgs),

    /// Add a student
    Add(Box<AddArgs>),

    /// Record a payment and print the receipt
    Pay(PayArgs),

    /// Print a transfer certificate
    TransferCertificate(TransferArgs),

    /// Print a conduct certificate
    ConductCertificate(ConductArgs),

    /// Print a UPI payment link
    UpiLink(UpiArgs),

    /// Generate a password_hash entry for the credentials file
    HashPassword,
}

impl Command {
    /// Whether an operator must log in before the command runs
    #[must_use]
    pub fn requires_login(&self) -> bool {
        !matches!(self, Command::HashPassword)
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }

    /// Apply file overrides from the command line to a loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.data_file {
            config.ledger.data_file = Some(path.clone());
        }
        if let Some(path) = &self.credentials_file {
            config.ledger.credentials_file = Some(path.clone());
        }
    }
}
