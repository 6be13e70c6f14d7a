//! Command-line interface built on clap.

use clap::{Parser, Subcommand};

/// Drive chains of cooperative state-machine jobs.
#[derive(Debug, Parser)]
#[command(name = "jobchain", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Abandon the chain after this many dispatches.
    #[arg(long, global = true)]
    pub max_dispatches: Option<u64>,

    /// Print the dispatch report as JSON after the run.
    #[arg(long, global = true, default_value_t = false)]
    pub report: bool,

    /// Enable debug logging on stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the built-in two-counter chain.
    Demo,

    /// Run a counter, optionally followed by a second one.
    Count {
        /// Initial counter value.
        #[arg(long, allow_negative_numbers = true)]
        start: i32,

        /// Start value of a counter invoked once the first succeeds.
        #[arg(long, allow_negative_numbers = true)]
        then: Option<i32>,

        /// Value the counter must pass before succeeding.
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i32>,
    },

    /// Run a job that fails and recovers through retries.
    Flaky {
        /// Number of busy attempts that fail.
        #[arg(long, default_value_t = 2)]
        failures: u32,

        /// Retries allowed before giving up.
        #[arg(long, default_value_t = 3)]
        max_retries: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_count_with_negative_values() {
        let cli = Cli::parse_from(["jobchain", "count", "--start", "-10", "--then", "-5"]);
        match cli.command {
            Command::Count {
                start,
                then,
                threshold,
            } => {
                assert_eq!(start, -10);
                assert_eq!(then, Some(-5));
                assert!(threshold.is_none());
            }
            _ => panic!("expected Count command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "jobchain",
            "--max-dispatches",
            "64",
            "--report",
            "--verbose",
            "demo",
        ]);
        assert!(cli.verbose);
        assert!(cli.report);
        assert_eq!(cli.max_dispatches, Some(64));
        assert!(matches!(cli.command, Command::Demo));
    }

    #[test]
    fn cli_flaky_defaults() {
        let cli = Cli::parse_from(["jobchain", "flaky"]);
        match cli.command {
            Command::Flaky {
                failures,
                max_retries,
            } => {
                assert_eq!(failures, 2);
                assert_eq!(max_retries, 3);
            }
            _ => panic!("expected Flaky command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
