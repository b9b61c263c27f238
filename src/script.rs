//! JSON map scripts.
//!
//! A script names the map settings, declares its tile classes and lists the
//! steps that build the map. Steps run in order against one [`MapContext`],
//! so the same script and seed always produce the same map.
//!
//! ```json
//! {
//!   "settings": { "size": 64, "base_texture": "grass" },
//!   "tile_classes": ["water"],
//!   "steps": [
//!     { "op": "areas", "label": "lakes", "count": 3,
//!       "placer": { "type": "clump", "size": 40 },
//!       "painter": { "type": "tile_class", "class": "water" },
//!       "constraint": { "type": "avoid_class", "class": "water", "distance": 6 } }
//!   ]
//! }
//! ```

mod config;

pub use config::{
    ConstraintConfig, ObjectConfig, ObjectGroupConfig, PainterConfig, PathConfig, PlacerConfig,
};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::area::{Area, AreaId};
use crate::batch::{DEFAULT_RETRY_FACTOR, create_area, create_areas, create_object_groups};
use crate::error::MapGenResult;
use crate::map::{Coord, MapContext, MapSettings};
use config::Labels;

const fn default_count() -> u32 {
    1
}

const fn default_retry_factor() -> u32 {
    DEFAULT_RETRY_FACTOR
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Paint every tile inside the map outline.
    PaintMap {
        /// Painter to apply.
        painter: PainterConfig,
    },
    /// Batch-place areas at random anchors.
    Areas {
        /// Name later constraints use to refer to the placed areas.
        #[serde(default)]
        label: Option<String>,
        /// Area shape.
        placer: PlacerConfig,
        /// Painter applied to each placed area.
        painter: PainterConfig,
        /// Tiles the areas may use.
        #[serde(default)]
        constraint: ConstraintConfig,
        /// Areas requested.
        #[serde(default = "default_count")]
        count: u32,
        /// Failed attempts tolerated per requested area.
        #[serde(default = "default_retry_factor")]
        retry_factor: u32,
    },
    /// Place one path between fixed endpoints.
    Path {
        /// Name later constraints use to refer to the path.
        #[serde(default)]
        label: Option<String>,
        /// Path geometry.
        path: PathConfig,
        /// Painter applied to the path.
        painter: PainterConfig,
        /// Tiles the path may use.
        #[serde(default)]
        constraint: ConstraintConfig,
    },
    /// Batch-place object groups at random anchors.
    Objects {
        /// Group to place.
        group: ObjectGroupConfig,
        /// Owner of the placed objects.
        #[serde(default)]
        player: u8,
        /// Tiles the objects may stand on.
        #[serde(default)]
        constraint: ConstraintConfig,
        /// Groups requested.
        #[serde(default = "default_count")]
        count: u32,
        /// Failed attempts tolerated per requested group.
        #[serde(default = "default_retry_factor")]
        retry_factor: u32,
    },
}

impl Step {
    /// Short operation name used in logs and reports.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::PaintMap { .. } => "paint_map",
            Self::Areas { .. } => "areas",
            Self::Path { .. } => "path",
            Self::Objects { .. } => "objects",
        }
    }

    fn run(&self, ctx: &mut MapContext, labels: &mut Labels) -> MapGenResult<StepReport> {
        let mut report = StepReport {
            op: self.op(),
            label: None,
            requested: 1,
            placed: 0,
            attempts: 1,
        };

        match self {
            Self::PaintMap { painter } => {
                let painter = painter.build(&ctx.state)?;
                let size = ctx.state.size();
                let points: Vec<Coord> = (0..size)
                    .flat_map(|z| (0..size).map(move |x| Coord::new(x, z)))
                    .filter(|&c| ctx.state.in_shape(c))
                    .collect();
                let area = Area::new(AreaId(ctx.state.next_area_id()), points);
                painter.paint(ctx, &area);
                report.placed = 1;
            }
            Self::Areas {
                label,
                placer,
                painter,
                constraint,
                count,
                retry_factor,
            } => {
                let constraint = constraint.build(&mut ctx.state, labels)?;
                let painter = painter.build(&ctx.state)?;
                let mut placer = placer.build()?;
                let outcome = create_areas(
                    ctx,
                    placer.as_mut(),
                    painter.as_ref(),
                    constraint.as_ref(),
                    *count,
                    *retry_factor,
                );
                report.requested = *count;
                report.placed = outcome.placed.len();
                report.attempts = outcome.attempts;
                if let Some(label) = label {
                    labels.entry(label.clone()).or_default().extend(outcome.placed);
                    report.label = Some(label.clone());
                }
            }
            Self::Path {
                label,
                path,
                painter,
                constraint,
            } => {
                let constraint = constraint.build(&mut ctx.state, labels)?;
                let painter = painter.build(&ctx.state)?;
                let placer = path.build()?;
                let area = create_area(ctx, &placer, painter.as_ref(), constraint.as_ref());
                report.placed = usize::from(area.is_some());
                if let Some(label) = label {
                    labels.entry(label.clone()).or_default().extend(area);
                    report.label = Some(label.clone());
                }
            }
            Self::Objects {
                group,
                player,
                constraint,
                count,
                retry_factor,
            } => {
                let constraint = constraint.build(&mut ctx.state, labels)?;
                let mut group = group.build(&ctx.state)?;
                let outcome = create_object_groups(
                    ctx,
                    &mut group,
                    *player,
                    constraint.as_ref(),
                    *count,
                    *retry_factor,
                );
                report.requested = *count;
                report.placed = outcome.placed.len();
                report.attempts = outcome.attempts;
            }
        }
        Ok(report)
    }
}

/// A complete map description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapScript {
    /// Free-form name, carried into reports.
    #[serde(default)]
    pub name: Option<String>,
    /// Grid settings.
    #[serde(default)]
    pub settings: MapSettings,
    /// Tile classes created before the first step.
    #[serde(default)]
    pub tile_classes: Vec<String>,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl MapScript {
    /// Parse a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid script.
    pub fn from_json(text: &str) -> MapGenResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> MapGenResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// What one step achieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Step operation name.
    pub op: &'static str,
    /// Label the step's areas were stored under.
    pub label: Option<String>,
    /// Placements requested.
    pub requested: u32,
    /// Placements that succeeded.
    pub placed: usize,
    /// Placement attempts made.
    pub attempts: u32,
}

impl StepReport {
    /// Whether the step placed fewer items than requested.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.placed < self.requested as usize
    }
}

/// A finished script run.
#[derive(Debug)]
pub struct ScriptRun {
    /// The generated map and the random stream after the last step.
    pub context: MapContext,
    /// One report per step.
    pub reports: Vec<StepReport>,
}

/// Run every step of `script` on a fresh map seeded with `seed`.
///
/// # Errors
///
/// Returns an error for invalid settings, duplicate class names, or a step
/// whose placer, painter or constraint fails to build. Placements that come
/// up short are not errors; see [`StepReport::is_short`].
pub fn run_script(script: &MapScript, seed: u64) -> MapGenResult<ScriptRun> {
    let mut context = MapContext::new(&script.settings, seed)?;
    for name in &script.tile_classes {
        context.state.create_tile_class(name)?;
    }

    let mut labels = Labels::new();
    let mut reports = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let report = step.run(&mut context, &mut labels)?;
        tracing::info!(
            step = index,
            op = report.op,
            label = report.label.as_deref(),
            requested = report.requested,
            placed = report.placed,
            attempts = report.attempts,
            "script step finished"
        );
        reports.push(report);
    }
    Ok(ScriptRun { context, reports })
}
