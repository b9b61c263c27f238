//! Generate and preview commands.

use super::output::{JsonRunSummary, format_text, render_preview};
use super::{CliError, OutputFormat, resolve_seed};
use rmgen::export::MapExport;
use rmgen::{MapScript, run_script};
use std::path::Path;

fn load(script: &Path) -> Result<MapScript, CliError> {
    MapScript::load(script)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", script.display())))
}

/// Execute the generate command.
///
/// # Errors
///
/// Returns an error if the script cannot be loaded or run, or the export
/// cannot be written.
pub(crate) fn execute(
    script_path: &Path,
    seed: Option<u64>,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let script = load(script_path)?;
    let seed = resolve_seed(seed);
    let run = run_script(&script, seed)?;

    if let Some(path) = output {
        MapExport::from_state(&run.context.state, seed)
            .save(path)
            .map_err(|e| CliError::new(format!("Failed to write {}: {e}", path.display())))?;
    }

    let summary = JsonRunSummary::from_run(&script, seed, &run);
    match format {
        OutputFormat::Text => print!("{}", format_text(&summary)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Execute the preview command.
///
/// # Errors
///
/// Returns an error if the script cannot be loaded or run.
pub(crate) fn preview(script_path: &Path, seed: Option<u64>) -> Result<(), CliError> {
    let script = load(script_path)?;
    let seed = resolve_seed(seed);
    let run = run_script(&script, seed)?;
    println!("seed {seed}");
    print!("{}", render_preview(&run.context.state));
    Ok(())
}
