use clap::Parser;
use e2e_report::cli::commands;
use e2e_report::cli::{Cli, Commands};
use e2e_report::logging::init_logging;
use e2e_report::{ReportError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_json) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = cli.overrides();
    let use_color = cli.use_color();

    let result = match &cli.command {
        None => commands::generate::execute(&cli.generate, cli.json, cli.quiet, &overrides),
        Some(Commands::Compare(args)) => {
            commands::compare::execute(args, cli.json, use_color, &overrides)
        }
        Some(Commands::Flaky(args)) => commands::flaky::execute(args, cli.json, use_color, &overrides),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &ReportError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}
