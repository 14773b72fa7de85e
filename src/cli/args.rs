use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Process pawn-shop pledge operations from a CSV ledger file
#[derive(Parser, Debug)]
#[command(name = "pledge-ledger")]
#[command(about = "Process pledge operations and report balances", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Emit an account-wise daybook for this date instead of pledge balances
    #[arg(
        long = "daybook",
        value_name = "DATE",
        help = "Report the account-wise daybook for DATE (YYYY-MM-DD)"
    )]
    pub daybook: Option<NaiveDate>,

    /// Company to report on (required with --daybook)
    #[arg(
        long = "company",
        value_name = "ID",
        help = "Company id for the daybook report (default: 1)"
    )]
    pub company: Option<u16>,
}
