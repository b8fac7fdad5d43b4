//! Student Fee Ledger CLI
//!
//! Command-line interface for the college fee office.
//!
//! # Usage
//!
//! ```bash
//! echo "$PASSWORD" | fee-ledger --user clerk list --batch 2021-2025
//! fee-ledger --user clerk pay --register 9501 --year 2 --amount 15000 --purpose tuition
//! fee-ledger --user clerk dues --year 1st
//! fee-ledger --user clerk hash-password
//! ```
//!
//! Each invocation logs in, loads the ledger, runs one command and saves the
//! ledger if the command changed it. Documents go to stdout (or `--out`),
//! logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad login, unknown student, invalid amount, unreadable files, etc.)

use chrono::Local;
use clap::Parser;
use std::process;
use student_fee_ledger::cli::{self, Cli};
use student_fee_ledger::{init_logging, Config};

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let result = Config::load_from(cli.config.clone()).and_then(|mut config| {
        cli.apply_overrides(&mut config);

        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        cli::run(&cli, &config, &mut input, &mut output, Local::now().naive_local())
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
