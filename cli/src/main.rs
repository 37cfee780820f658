//! CLI entry point for tradesim.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use tradesim_cli::commands::{self, RunOptions};
use tradesim_cli::config::Config;
use tradesim_cli::envelope::Envelope;
use tradesim_cli::error::Result;
use tradesim_cli::history;
use tradesim_cli::report::TextReport;

#[derive(Parser)]
#[command(name = "tradesim")]
#[command(about = "Day-aware Monte Carlo simulator for trading risk policies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation described by a request file
    Run {
        /// Path to request.toml
        request: PathBuf,

        /// Base seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Print a JSON envelope instead of the text summary
        #[arg(long)]
        json: bool,

        /// Spread runs over all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Derive the trade edge from historical trades, then simulate
    Backtest {
        /// Path to request.toml
        request: PathBuf,

        /// Path to a JSON trade history
        #[arg(long)]
        history: PathBuf,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        json: bool,
    },

    /// Check a request file without simulating
    Validate {
        /// Path to request.toml
        request: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let (json, result) = match cli.command {
        Command::Run {
            request,
            seed,
            json,
            parallel,
        } => (json, run(&request, RunOptions { seed, parallel }, json)),
        Command::Backtest {
            request,
            history,
            seed,
            json,
        } => (
            json,
            backtest(
                &request,
                &history,
                RunOptions {
                    seed,
                    parallel: false,
                },
                json,
            ),
        ),
        Command::Validate { request, json } => (json, validate(&request, json)),
    };

    if let Err(e) = result {
        if json {
            match Envelope::failure(&e).to_json() {
                Ok(s) => println!("{s}"),
                Err(inner) => eprintln!("Error: {inner}"),
            }
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(e.exit_code());
    }
}

fn emit<T: Serialize>(data: T) -> Result<()> {
    println!("{}", Envelope::success(data).to_json()?);
    Ok(())
}

fn run(path: &Path, opts: RunOptions, json: bool) -> Result<()> {
    let config = Config::load(path)?;
    let result = commands::run(&config, &opts)?;
    if json {
        emit(&result)
    } else {
        print!("{}", TextReport(&result));
        Ok(())
    }
}

fn backtest(path: &Path, history_path: &Path, opts: RunOptions, json: bool) -> Result<()> {
    let config = Config::load(path)?;
    let history = history::load(history_path)?;
    let report = commands::backtest(&config, &history, &opts)?;
    if json {
        emit(&report)
    } else {
        let e = &report.derived_edge;
        println!(
            "Derived edge from {} trades: win rate {:.2}%, breakeven {:.2}%, reward:risk {:.2}",
            report.history.total(),
            e.win_rate,
            e.breakeven_rate,
            e.reward_risk_ratio
        );
        print!("{}", TextReport(&report.result));
        Ok(())
    }
}

fn validate(path: &Path, json: bool) -> Result<()> {
    let config = Config::load(path)?;
    if json {
        emit(config.request())
    } else {
        println!("{}: ok", path.display());
        Ok(())
    }
}
