//! Output formatting utilities for CLI.

use rmgen::script::StepReport;
use rmgen::{Coord, MapScript, MapState, ScriptRun};
use serde::Serialize;
use std::collections::HashSet;

/// JSON-serializable summary of one script run.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunSummary {
    /// Script name, if it has one.
    pub(super) name: Option<String>,
    /// Random seed used.
    pub(super) seed: u64,
    /// Map side length.
    pub(super) size: i32,
    /// Objects on the finished map.
    pub(super) objects: usize,
    /// Per-step results.
    pub(super) steps: Vec<StepReport>,
}

impl JsonRunSummary {
    /// Create from a finished run.
    pub(super) fn from_run(script: &MapScript, seed: u64, run: &ScriptRun) -> Self {
        Self {
            name: script.name.clone(),
            seed,
            size: run.context.state.size(),
            objects: run.context.state.objects().len(),
            steps: run.reports.clone(),
        }
    }
}

/// Format a run summary as human-readable text.
pub(super) fn format_text(summary: &JsonRunSummary) -> String {
    let mut output = String::new();

    let name = summary.name.as_deref().unwrap_or("unnamed");
    output.push_str(&format!(
        "Map {name} (seed: {}, size: {})\n",
        summary.seed, summary.size
    ));
    for (i, step) in summary.steps.iter().enumerate() {
        output.push_str(&format!("  {i:>2}. {:<10}", step.op));
        if let Some(label) = &step.label {
            output.push_str(&format!(" [{label}]"));
        }
        output.push_str(&format!(
            " {}/{} placed in {} attempts",
            step.placed, step.requested, step.attempts
        ));
        if step.is_short() {
            output.push_str(" (short)");
        }
        output.push('\n');
    }
    output.push_str(&format!("  Objects: {}\n", summary.objects));

    output
}

/// Failure of one seed in a batch.
#[derive(Debug, Serialize)]
pub(super) struct SeedError {
    /// Seed that failed.
    pub(super) seed: u64,
    /// Error message.
    pub(super) error: String,
}

/// Totals of one script step across a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub(super) struct StepTotals {
    /// Step operation name.
    pub(super) op: &'static str,
    /// Step label.
    pub(super) label: Option<String>,
    /// Placements requested, summed over maps.
    pub(super) requested: u64,
    /// Placements made, summed over maps.
    pub(super) placed: u64,
    /// Attempts made, summed over maps.
    pub(super) attempts: u64,
    /// Maps on which the step came up short.
    pub(super) short_maps: u64,
}

/// Aggregated batch results.
#[derive(Debug, Serialize)]
pub(super) struct BatchStats {
    /// Maps generated successfully.
    pub(super) maps: u64,
    /// Seeds that failed.
    pub(super) errors: Vec<SeedError>,
    /// Per-step totals, in script order.
    pub(super) steps: Vec<StepTotals>,
}

impl BatchStats {
    /// Empty stats for a script with `steps` steps.
    pub(super) fn new(steps: usize) -> Self {
        Self {
            maps: 0,
            errors: Vec::new(),
            steps: vec![StepTotals::default(); steps],
        }
    }

    /// Record a successful map.
    pub(super) fn add_run(&mut self, reports: &[StepReport]) {
        self.maps += 1;
        for (totals, report) in self.steps.iter_mut().zip(reports) {
            totals.op = report.op;
            if totals.label.is_none() {
                totals.label.clone_from(&report.label);
            }
            totals.requested += u64::from(report.requested);
            totals.placed += report.placed as u64;
            totals.attempts += u64::from(report.attempts);
            if report.is_short() {
                totals.short_maps += 1;
            }
        }
    }

    /// Record a failed seed.
    pub(super) fn add_error(&mut self, seed: u64, error: String) {
        self.errors.push(SeedError { seed, error });
    }

    /// Merge stats from another thread.
    pub(super) fn merge(&mut self, other: Self) {
        self.maps += other.maps;
        self.errors.extend(other.errors);
        self.errors.sort_by_key(|e| e.seed);
        for (totals, theirs) in self.steps.iter_mut().zip(other.steps) {
            if totals.op.is_empty() {
                totals.op = theirs.op;
            }
            if totals.label.is_none() {
                totals.label = theirs.label;
            }
            totals.requested += theirs.requested;
            totals.placed += theirs.placed;
            totals.attempts += theirs.attempts;
            totals.short_maps += theirs.short_maps;
        }
    }
}

/// Format batch results as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_batch_text(stats: &BatchStats, script: &MapScript) -> String {
    let mut output = String::new();

    let name = script.name.as_deref().unwrap_or("unnamed");
    output.push_str(&format!(
        "Batch {name}: {} maps, {} errors\n\n",
        stats.maps,
        stats.errors.len()
    ));

    if stats.maps > 0 {
        output.push_str(&format!(
            "{:<4} {:<10} {:<12} {:>12} {:>12} {:>8}\n",
            "#", "Op", "Label", "Placed/map", "Tries/map", "Short"
        ));
        output.push_str(&format!("{}\n", "-".repeat(63)));
        let maps = stats.maps as f64;
        for (i, totals) in stats.steps.iter().enumerate() {
            output.push_str(&format!(
                "{:<4} {:<10} {:<12} {:>12} {:>12.1} {:>7.1}%\n",
                i,
                totals.op,
                totals.label.as_deref().unwrap_or("-"),
                format!(
                    "{:.1}/{:.1}",
                    totals.placed as f64 / maps,
                    totals.requested as f64 / maps
                ),
                totals.attempts as f64 / maps,
                totals.short_maps as f64 / maps * 100.0
            ));
        }
    }

    for error in stats.errors.iter().take(5) {
        output.push_str(&format!("  seed {}: {}\n", error.seed, error.error));
    }
    if stats.errors.len() > 5 {
        output.push_str(&format!("  ... and {} more\n", stats.errors.len() - 5));
    }

    output
}

/// One display character per palette entry: the first unused letter of the
/// texture name, or a digit when every letter is taken.
fn palette_glyphs(palette: &[String]) -> Vec<char> {
    let mut used = HashSet::new();
    let mut spare = ('0'..='9').chain('A'..='Z');
    palette
        .iter()
        .map(|name| {
            let glyph = name
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .find(|c| !used.contains(c))
                .or_else(|| spare.by_ref().find(|c| !used.contains(c)))
                .unwrap_or('?');
            used.insert(glyph);
            glyph
        })
        .collect()
}

/// Render the texture grid as text, objects as `*`, followed by a legend.
pub(super) fn render_preview(state: &MapState) -> String {
    let glyphs = palette_glyphs(state.palette());
    let objects: HashSet<Coord> = state.objects().iter().map(|o| o.tile()).collect();
    let size = state.size();

    let mut output = String::new();
    for z in (0..size).rev() {
        for x in 0..size {
            let tile = Coord::new(x, z);
            let c = if !state.in_shape(tile) {
                ' '
            } else if objects.contains(&tile) {
                '*'
            } else {
                state
                    .texture(tile)
                    .and_then(|t| glyphs.get(usize::from(t.0)).copied())
                    .unwrap_or('?')
            };
            output.push(c);
        }
        output.push('\n');
    }

    output.push('\n');
    for (glyph, name) in glyphs.iter().zip(state.palette()) {
        output.push_str(&format!("  {glyph}  {name}\n"));
    }
    if !objects.is_empty() {
        output.push_str("  *  object\n");
    }
    output
}
