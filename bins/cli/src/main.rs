//! Kira command-line runner.
//!
//! Reads a document as JSON, recalculates it for a document module and
//! writes the result as JSON to stdout. Logs go to stderr.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kira_core::{
    CalcContext, CalcPolicy, DocumentCalculator, DocumentHeader, DocumentModule, ExchangeRates,
    JournalBalance, LineItem,
};
use kira_shared::{AppConfig, AppError, AppResult};

#[derive(Parser)]
#[command(
    name = "kira",
    version,
    about = "Recalculate financial document amounts",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recalculate lines and header totals of a document.
    Recalc {
        /// Document module, e.g. ap-invoice or gl-journal.
        #[arg(short, long)]
        module: DocumentModule,
        /// Document JSON file, `-` for stdin.
        #[arg(short, long, default_value = "-", value_name = "FILE")]
        input: PathBuf,
        /// New base to local exchange rate.
        #[arg(long, value_name = "RATE")]
        rate: Option<Decimal>,
        /// New base to country exchange rate.
        #[arg(long, value_name = "RATE")]
        country_rate: Option<Decimal>,
        /// Recompute line amounts from quantity and unit price first.
        #[arg(long)]
        price_lines: bool,
        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },
    /// Report debit and credit postings per currency tier.
    Balance {
        /// Document module.
        #[arg(short, long, default_value = "gl-journal")]
        module: DocumentModule,
        /// Document JSON file, `-` for stdin.
        #[arg(short, long, default_value = "-", value_name = "FILE")]
        input: PathBuf,
        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },
    /// List document modules and their calculation policies.
    Profiles {
        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Serialize)]
struct Profile {
    module: DocumentModule,
    policy: CalcPolicy,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BalanceReport {
    #[serde(flatten)]
    balance: JournalBalance,
    is_balanced: bool,
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kira=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<AppError>()
                .map_or(1, AppError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Recalc {
            module,
            input,
            rate,
            country_rate,
            price_lines,
            pretty,
        } => {
            let calculator = calculator(module)?;
            let mut doc = read_document(&input)
                .with_context(|| format!("reading document from {}", input.display()))?;

            if price_lines {
                let decimals = calculator.context().decimals;
                doc.data_details = doc
                    .data_details
                    .iter()
                    .map(|line| line.repriced(&decimals))
                    .collect();
            }

            let doc = if rate.is_some() || country_rate.is_some() {
                let rates = ExchangeRates::new(
                    rate.unwrap_or(doc.exh_rate),
                    country_rate.unwrap_or(doc.cty_exh_rate),
                );
                calculator.change_exchange_rates(&doc, rates)
            } else {
                calculator.recalculate(&doc)
            };

            info!(
                module = %module,
                lines = doc.data_details.len(),
                tot_amt = %doc.totals.tot_amt,
                "document recalculated"
            );
            write_json(&doc, pretty).context("writing document")?;
        }
        Command::Balance {
            module,
            input,
            pretty,
        } => {
            let calculator = calculator(module)?;
            let doc = read_document(&input)
                .with_context(|| format!("reading document from {}", input.display()))?;

            let balance = calculator.balance(&doc);
            let report = BalanceReport {
                balance,
                is_balanced: balance.is_balanced(),
            };
            write_json(&report, pretty).context("writing balance")?;
        }
        Command::Profiles { pretty } => {
            let profiles: Vec<Profile> = DocumentModule::ALL
                .into_iter()
                .map(|module| Profile {
                    module,
                    policy: module.policy(),
                })
                .collect();
            write_json(&profiles, pretty).context("writing profiles")?;
        }
    }

    Ok(())
}

fn calculator(module: DocumentModule) -> anyhow::Result<DocumentCalculator> {
    let config = AppConfig::load_validated().context("loading configuration")?;
    let ctx = CalcContext::for_module(config.decimals, config.finance, module)
        .map_err(AppError::from)?;
    Ok(DocumentCalculator::new(ctx))
}

fn read_document(path: &Path) -> AppResult<DocumentHeader<LineItem>> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> AppResult<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|err| AppError::Internal(err.to_string()))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}
