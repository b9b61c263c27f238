//! Batch command implementation.

use super::output::{BatchStats, format_batch_text};
use super::{CliError, OutputFormat, resolve_seed};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rmgen::export::MapExport;
use rmgen::{MapScript, run_script};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the script cannot be loaded, the output directory
/// cannot be created, or the report cannot be serialized. Failures of
/// individual seeds are counted in the report instead.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    script_path: &Path,
    maps: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    out_dir: Option<&Path>,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    let script = MapScript::load(script_path)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", script_path.display())))?;

    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)
            .map_err(|e| CliError::new(format!("Failed to create {}: {e}", dir.display())))?;
    }

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);

    let pb = if progress {
        let pb = ProgressBar::new(maps);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} maps ({per_sec})",
                )
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let steps = script.steps.len();

    // Each thread folds into its own stats, merged once at the end
    let stats = (0..maps)
        .into_par_iter()
        .fold(
            || BatchStats::new(steps),
            |mut local, i| {
                let map_seed = base_seed.wrapping_add(i);
                match run_script(&script, map_seed) {
                    Ok(run) => {
                        let saved = out_dir.map_or(Ok(()), |dir| {
                            MapExport::from_state(&run.context.state, map_seed)
                                .save(dir.join(format!("map-{map_seed}.json")))
                        });
                        match saved {
                            Ok(()) => local.add_run(&run.reports),
                            Err(e) => local.add_error(map_seed, e.to_string()),
                        }
                    }
                    Err(e) => local.add_error(map_seed, e.to_string()),
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local
            },
        )
        .reduce(
            || BatchStats::new(steps),
            |mut a, b| {
                a.merge(b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    tracing::info!(
        maps = stats.maps,
        errors = stats.errors.len(),
        seconds = duration.as_secs_f64(),
        "batch finished"
    );

    match format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats, &script));
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&stats)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
