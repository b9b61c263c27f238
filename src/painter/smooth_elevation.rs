//! Elevation painter with a graded border.
//!
//! Painting runs in three passes over the heightmap vertices around an area:
//! a breadth-first distance transform from the vertices outside the area, a
//! paint pass that scales the elevation change by that distance, and one
//! smoothing step that removes the tile/vertex aliasing left at the border.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::area::Area;
use crate::error::{MapGenError, MapGenResult};
use crate::map::{Coord, MapContext, MapState};
use crate::painter::AreaPainter;
use crate::painter::distance::{DistanceField, Window};

/// Margin, in vertices, gathered around the area before painting.
///
/// The window always keeps the ring of vertices just outside the area, so a
/// margin below this only matters at the map edge and never changes the
/// painted heights.
pub const DEFAULT_BRUSH_SIZE: i32 = 2;

/// How the target elevation combines with the existing heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationMode {
    /// Move toward an absolute elevation.
    Set,
    /// Add a relative offset.
    Modify,
}

impl FromStr for ElevationMode {
    type Err = MapGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Self::Set),
            "modify" => Ok(Self::Modify),
            other => Err(MapGenError::InvalidElevationMode(other.to_string())),
        }
    }
}

impl fmt::Display for ElevationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => write!(f, "set"),
            Self::Modify => write!(f, "modify"),
        }
    }
}

/// Blend weight of the target elevation at BFS distance `d` (1 = border).
fn blend_factor(d: u32, blend_radius: f64) -> f64 {
    let d = f64::from(d);
    if d >= blend_radius {
        1.0
    } else {
        (d - 1.0) / blend_radius
    }
}

/// Raises, lowers or levels an area with a soft border.
#[derive(Debug, Clone, Copy)]
pub struct SmoothElevationPainter {
    mode: ElevationMode,
    elevation: f64,
    blend_radius: f64,
    random_elevation: f64,
    brush_size: i32,
}

impl SmoothElevationPainter {
    /// Create a painter.
    ///
    /// `blend_radius` is the width of the graded border in vertices;
    /// `random_elevation` scales a uniform jitter in `[-0.5, 0.5)`.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite values or negative radii.
    pub fn new(
        mode: ElevationMode,
        elevation: f64,
        blend_radius: f64,
        random_elevation: f64,
    ) -> MapGenResult<Self> {
        if !elevation.is_finite() {
            return Err(MapGenError::invalid("elevation", "must be finite"));
        }
        if !blend_radius.is_finite() || blend_radius < 0.0 {
            return Err(MapGenError::invalid(
                "blend radius",
                format!("must be finite and non-negative, got {blend_radius}"),
            ));
        }
        if !random_elevation.is_finite() || random_elevation < 0.0 {
            return Err(MapGenError::invalid(
                "random elevation",
                format!("must be finite and non-negative, got {random_elevation}"),
            ));
        }
        Ok(Self {
            mode,
            elevation,
            blend_radius,
            random_elevation,
            brush_size: DEFAULT_BRUSH_SIZE,
        })
    }

    /// Create a painter from a mode name (`"set"` or `"modify"`).
    ///
    /// # Errors
    ///
    /// Returns [`MapGenError::InvalidElevationMode`] for any other name.
    pub fn from_mode_name(
        mode: &str,
        elevation: f64,
        blend_radius: f64,
        random_elevation: f64,
    ) -> MapGenResult<Self> {
        Self::new(mode.parse()?, elevation, blend_radius, random_elevation)
    }

    /// Override the working margin around the area.
    ///
    /// # Errors
    ///
    /// Returns an error if `brush_size` is less than 1.
    pub fn with_brush_size(mut self, brush_size: i32) -> MapGenResult<Self> {
        if brush_size < 1 {
            return Err(MapGenError::invalid(
                "brush size",
                format!("must be at least 1, got {brush_size}"),
            ));
        }
        self.brush_size = brush_size;
        Ok(self)
    }

    /// Painting mode.
    #[must_use]
    pub const fn mode(&self) -> ElevationMode {
        self.mode
    }

    /// A vertex belongs to the area if any of the four tiles sharing it does.
    fn vertex_in_area(area: &Area, v: Coord) -> bool {
        area.contains(v)
            || area.contains(v.offset(-1, 0))
            || area.contains(v.offset(0, -1))
            || area.contains(v.offset(-1, -1))
    }

    /// Area vertices span `lo..=hi + 1`; the BFS needs the ring outside that.
    fn working_window(&self, state: &MapState, area: &Area) -> Option<Window> {
        let (lo, hi) = area.bounds()?;
        let size = state.size();
        let before = (self.brush_size - 1).max(1);
        let after = self.brush_size.max(2);
        Window::new(
            Coord::new((lo.x - before).max(0), (lo.z - before).max(0)),
            Coord::new((hi.x + after).min(size), (hi.z + after).min(size)),
        )
    }
}

impl AreaPainter for SmoothElevationPainter {
    fn paint(&self, ctx: &mut MapContext, area: &Area) {
        let Some(window) = self.working_window(&ctx.state, area) else {
            return;
        };

        let original: Vec<f64> = window
            .iter()
            .map(|v| ctx.state.height(v).unwrap_or(0.0))
            .collect();
        let inside: Vec<bool> = window
            .iter()
            .map(|v| Self::vertex_in_area(area, v))
            .collect();

        let distances = DistanceField::from_outside(window, |v| Self::vertex_in_area(area, v));

        let mut painted = original.clone();
        for (idx, v) in window.iter().enumerate() {
            if !inside[idx] {
                continue;
            }
            // Unreachable interior (area covers the whole window) paints at full strength
            let a = distances
                .get(v)
                .map_or(1.0, |d| blend_factor(d, self.blend_radius));
            let base = match self.mode {
                ElevationMode::Set => (1.0 - a) * original[idx],
                ElevationMode::Modify => original[idx],
            };
            let jitter = if self.random_elevation > 0.0 {
                ctx.rng.rand_float(-0.5, 0.5) * self.random_elevation
            } else {
                0.0
            };
            painted[idx] = base + a * self.elevation + jitter;
        }

        let state = &ctx.state;
        let sample = |c: Coord| -> Option<f64> {
            match window.index(c) {
                Some(idx) => Some(painted[idx]),
                None => state.height(c),
            }
        };

        let smoothed: Vec<(Coord, f64)> = window
            .iter()
            .enumerate()
            .filter(|(idx, _)| inside[*idx])
            .map(|(idx, v)| {
                let (sum, count) = std::iter::once(v)
                    .chain(v.neighbors8())
                    .filter_map(sample)
                    .fold((0.0, 0.0), |(sum, count), h| (sum + h, count + 1.0));
                (v, (painted[idx] + sum / count) / 2.0)
            })
            .collect();

        for (v, height) in smoothed {
            ctx.state.set_height(v, height);
        }
    }
}
