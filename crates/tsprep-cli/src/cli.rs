//! Command-line arguments.

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

/// Acquire, cache and prepare the store sales and power systems time series.
#[derive(Debug, Parser)]
#[command(name = "tsprep", version)]
pub struct Cli {
    /// Configuration file. Defaults to `TSPREP_CONFIG_PATH`, then
    /// `tsprep.yaml` or `tsprep.yml` in the working directory.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Raise the log level: `-v` for debug, `-vv` for trace.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load one dataset (items, stores or sales) through the cache.
    Acquire {
        /// Dataset name.
        dataset: String,
        /// Ignore an existing cache file and fetch from the API.
        #[arg(long)]
        refresh: bool,
        /// Do not write the fetched table to the cache.
        #[arg(long)]
        no_store: bool,
    },
    /// Join sales with items and stores and write the result as CSV.
    Combine {
        /// Output file. Writes to stdout when omitted.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Prepare a time series and write it as CSV.
    Prepare {
        /// Which series to prepare.
        #[arg(value_enum)]
        target: Target,
        /// Output file. Writes to stdout when omitted.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Plot the distribution of every column of a prepared series.
    Plot {
        /// Which series to plot.
        #[arg(value_enum)]
        target: Target,
        /// PNG file to write.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
}

/// A preparable series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// Combined store sales.
    Sales,
    /// Open Power Systems Data for Germany.
    Ops,
}

impl Cli {
    /// Log level implied by `-v`, if any.
    pub const fn verbosity_level(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_acquire_flags() {
        let cli = Cli::parse_from(["tsprep", "acquire", "sales", "--refresh", "--no-store"]);
        match cli.command {
            Command::Acquire {
                dataset,
                refresh,
                no_store,
            } => {
                assert_eq!(dataset, "sales");
                assert!(refresh);
                assert!(no_store);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tsprep", "prepare", "ops", "-vv", "--config", "alt.yaml"]);
        assert_eq!(cli.verbosity_level(), Some("trace"));
        assert_eq!(cli.config, Some(PathBuf::from("alt.yaml")));
        assert!(matches!(
            cli.command,
            Command::Prepare {
                target: Target::Ops,
                output: None
            }
        ));
    }

    #[test]
    fn test_plot_requires_output() {
        assert!(Cli::try_parse_from(["tsprep", "plot", "sales"]).is_err());
    }
}
