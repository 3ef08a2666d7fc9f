use crate::analysis::Report;
use crate::cli::GenerateArgs;
use crate::config::CliOverrides;
use crate::error::{ReportError, Result};
use crate::format::{GenerateOutput, RenderOptions, render_report};
use crate::util::time::generated_stamp;
use std::fs;
use tracing::info;

/// Execute the default command: scan runs and write the HTML report.
///
/// # Errors
///
/// Returns an error if the config is invalid or the report cannot be
/// written.
pub fn execute(args: &GenerateArgs, json: bool, quiet: bool, cli: &CliOverrides) -> Result<()> {
    let overrides = CliOverrides {
        output: args.output.clone(),
        title: args.title.clone(),
        run_prefix: args.run_prefix.clone(),
        ..cli.clone()
    };

    if !json && !quiet {
        println!("Scanning {}...", args.path.display());
    }
    let (config, runs) = super::load_runs(&args.path, &overrides)?;
    let report = Report::build(&runs);

    if runs.is_empty() {
        if json {
            let payload = GenerateOutput {
                output: None,
                summary: report.summary,
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
        } else {
            println!("No runs found.");
        }
        return Ok(());
    }

    let generated_at = generated_stamp();
    let html = render_report(
        &report,
        &RenderOptions {
            title: &config.title,
            chart_js_url: &config.chart_js_url,
            generated_at: &generated_at,
        },
    )?;

    let path = config.output_path(&args.path);
    fs::write(&path, html).map_err(|source| ReportError::WriteReport {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), runs = runs.len(), tests = report.rows.len(), "Report written");

    if json {
        let payload = GenerateOutput {
            output: Some(path),
            summary: report.summary,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if !quiet {
        println!("Report generated at: {}", path.display());
    }

    Ok(())
}
