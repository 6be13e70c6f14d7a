mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Command};
use jobchain::config::JobchainConfig;
use jobchain::jobs::{Counter, Flaky};
use jobchain::ui::ChainProgress;
use jobchain::{Chain, ChainError};

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = JobchainConfig::load()?;
    let limit = cli.max_dispatches.or(config.max_dispatches);

    let (title, mut chain): (String, Chain<ChainProgress>) = match cli.command {
        Command::Demo => {
            let demo = &config.demo;
            let second = Counter::new("counter-2", demo.second_start).with_threshold(demo.threshold);
            let first = Counter::new("counter-1", demo.first_start)
                .with_threshold(demo.threshold)
                .then(second);
            ("demo".to_string(), Chain::new(first))
        }
        Command::Count {
            start,
            then,
            threshold,
        } => {
            let threshold = threshold.unwrap_or(config.demo.threshold);
            let mut counter = Counter::new("counter", start).with_threshold(threshold);
            if let Some(next) = then {
                counter = counter.then(Counter::new("follow-on", next).with_threshold(threshold));
            }
            (format!("count from {start}"), Chain::new(counter))
        }
        Command::Flaky {
            failures,
            max_retries,
        } => (
            format!("flaky ({failures} failures, {max_retries} retries)"),
            Chain::new(Flaky::new("flaky", failures, max_retries)),
        ),
    };

    tracing::info!(%title, ?limit, "starting chain");
    let progress = ChainProgress::start(&title);
    let report = chain.execute_traced(&progress, limit);
    progress.complete(&report);

    if cli.report {
        progress.print_report(&report);
    }

    match limit {
        Some(limit) if !report.completed => Err(ChainError::DispatchLimit {
            limit,
            entry_state: report.entry_state,
        }
        .into()),
        _ => Ok(()),
    }
}
