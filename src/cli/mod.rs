//! CLI definitions and entry point.

use crate::config::CliOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Aggregate E2E test runs into one HTML report
#[derive(Parser, Debug)]
#[command(
    name = "e2e-report",
    author,
    version,
    about,
    long_about = None,
    args_conflicts_with_subcommands = true
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file (default: <PATH>/.e2e-report.yaml)
    #[arg(long, global = true, value_name = "FILE", env = "E2E_REPORT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two runs: new failures, fixed tests and regressions
    Compare(CompareArgs),

    /// List flaky tests across all runs
    Flaky(FlakyArgs),
}

/// Arguments for the default action: write the HTML report.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Directory containing run-* directories
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Output file (relative paths resolve against PATH)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,

    /// Prefix that marks a run directory
    #[arg(long, value_name = "PREFIX")]
    pub run_prefix: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CompareArgs {
    /// Directory containing run-* directories
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Base run id (default: the previous run)
    #[arg(long, value_name = "RUN")]
    pub base: Option<String>,

    /// Head run id (default: the latest run)
    #[arg(long, value_name = "RUN")]
    pub head: Option<String>,

    /// Prefix that marks a run directory
    #[arg(long, value_name = "PREFIX")]
    pub run_prefix: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FlakyArgs {
    /// Directory containing run-* directories
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Prefix that marks a run directory
    #[arg(long, value_name = "PREFIX")]
    pub run_prefix: Option<String>,
}

impl Cli {
    /// Config overrides shared by every command.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config: self.config.clone(),
            ..CliOverrides::default()
        }
    }

    /// Colored terminal output unless disabled or not a terminal.
    #[must_use]
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;
        !self.no_color && std::io::stdout().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_generates_in_cwd() {
        let cli = Cli::try_parse_from(["e2e-report"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.generate.path, PathBuf::from("."));
    }

    #[test]
    fn generate_flags() {
        let cli = Cli::try_parse_from([
            "e2e-report",
            "results",
            "-o",
            "out.html",
            "--title",
            "Nightly",
            "--run-prefix",
            "ci-",
        ])
        .unwrap();
        assert_eq!(cli.generate.path, PathBuf::from("results"));
        assert_eq!(cli.generate.output, Some(PathBuf::from("out.html")));
        assert_eq!(cli.generate.title.as_deref(), Some("Nightly"));
        assert_eq!(cli.generate.run_prefix.as_deref(), Some("ci-"));
    }

    #[test]
    fn compare_subcommand_with_globals() {
        let cli = Cli::try_parse_from([
            "e2e-report",
            "compare",
            "results",
            "--base",
            "1",
            "--head",
            "2",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Compare(args)) => {
                assert_eq!(args.path, PathBuf::from("results"));
                assert_eq!(args.base.as_deref(), Some("1"));
                assert_eq!(args.head.as_deref(), Some("2"));
            }
            other => panic!("expected compare, got {other:?}"),
        }
    }

    #[test]
    fn flaky_subcommand_defaults_path() {
        let cli = Cli::try_parse_from(["e2e-report", "flaky"]).unwrap();
        match cli.command {
            Some(Commands::Flaky(args)) => assert_eq!(args.path, PathBuf::from(".")),
            other => panic!("expected flaky, got {other:?}"),
        }
    }
}
