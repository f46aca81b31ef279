mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use commands::contract::ContractCommand;
use commands::financial::FinancialCommand;
use commands::lease::TermsArgs;

/// Lease present value, amortization schedules and contract records
#[derive(Parser)]
#[command(
    name = "lease",
    version,
    about = "Lease present value, amortization schedules and contract records",
    long_about = "A CLI for computing lease present values and amortization schedules \
                  with decimal precision, and for keeping lease contracts and their \
                  financial terms in a JSON-backed record store."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path of the JSON record store
    #[arg(
        long,
        env = "LEASE_STORE_PATH",
        default_value = "lease-store.json",
        global = true
    )]
    store: PathBuf,

    /// Log filter directive (e.g. "info", "lease_ledger_core=debug")
    #[arg(long, env = "LEASE_LOG", default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the present value of a lease's payments
    PresentValue(TermsArgs),
    /// Compute present value and the full amortization schedule
    Schedule(TermsArgs),
    /// Manage lease contracts in the record store
    #[command(subcommand)]
    Contract(ContractCommand),
    /// Manage lease financial records in the record store
    #[command(subcommand)]
    Financial(FinancialCommand),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::PresentValue(args) => commands::lease::run_present_value(args),
        Commands::Schedule(args) => commands::lease::run_schedule(args),
        Commands::Contract(cmd) => commands::contract::run(cmd, &cli.store),
        Commands::Financial(cmd) => commands::financial::run(cmd, &cli.store),
        Commands::Version => {
            println!("lease {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
