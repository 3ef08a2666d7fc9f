use crate::analysis::Report;
use crate::cli::FlakyArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::{FlakyTest, TextFormatOptions, format_flaky};

/// Execute the flaky command.
///
/// # Errors
///
/// Returns an error if the config is invalid.
pub fn execute(args: &FlakyArgs, json: bool, use_color: bool, cli: &CliOverrides) -> Result<()> {
    let overrides = CliOverrides {
        run_prefix: args.run_prefix.clone(),
        ..cli.clone()
    };
    let (_, runs) = super::load_runs(&args.path, &overrides)?;
    let report = Report::build(&runs);

    if json {
        let flaky: Vec<FlakyTest<'_>> = report.flaky_rows().map(FlakyTest::from).collect();
        println!("{}", serde_json::to_string_pretty(&flaky)?);
        return Ok(());
    }

    if runs.is_empty() {
        println!("No runs found.");
        return Ok(());
    }
    let options = TextFormatOptions {
        use_color,
        max_width: None,
    };
    print!("{}", format_flaky(&report.rows, options));
    Ok(())
}
