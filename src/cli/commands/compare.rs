use crate::analysis::compare::{compare_runs, resolve_pair};
use crate::analysis::pivot::build_pivot;
use crate::cli::CompareArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::{TextFormatOptions, format_comparison, format_run_label};
use tracing::debug;

/// Execute the compare command.
///
/// # Errors
///
/// Returns an error if the config is invalid, a run id is unknown, or both
/// sides name the same run.
pub fn execute(args: &CompareArgs, json: bool, use_color: bool, cli: &CliOverrides) -> Result<()> {
    let overrides = CliOverrides {
        run_prefix: args.run_prefix.clone(),
        ..cli.clone()
    };
    let (_, runs) = super::load_runs(&args.path, &overrides)?;
    if runs.is_empty() {
        println!("No runs found.");
        return Ok(());
    }

    let (base, head) = resolve_pair(&runs, args.base.as_deref(), args.head.as_deref())?;
    debug!(base = %base.run_id, head = %head.run_id, "Comparing runs");

    let rows = build_pivot(&runs);
    let comparison = compare_runs(&rows, &base.run_id, &head.run_id);

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        println!(
            "Base: {}",
            format_run_label(&base.run_id, &base.date_str(), base.total_runtime)
        );
        println!(
            "Head: {}\n",
            format_run_label(&head.run_id, &head.date_str(), head.total_runtime)
        );
        let options = TextFormatOptions {
            use_color,
            max_width: None,
        };
        print!("{}", format_comparison(&comparison, options));
    }

    Ok(())
}
