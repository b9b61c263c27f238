//! Placers compute candidate areas; they never mutate the map.
//!
//! A placer returns `None` when too many tiles fail its constraint. Retrying
//! with a new anchor is the caller's job (see [`crate::batch`]).

mod clump;
mod object;
mod path;
mod rect;

pub use clump::ClumpPlacer;
pub use object::{ObjectGroupPlacer, SimpleGroup, SimpleObject};
pub use path::PathPlacer;
pub use rect::RectPlacer;

use std::fmt::Debug;

use crate::constraint::Constraint;
use crate::map::{Coord, MapState};
use crate::rng::MapRng;

/// Computes the tiles of an area.
pub trait AreaPlacer: Debug {
    /// Compute the area's tiles, or `None` if the placement failed.
    fn place(
        &self,
        map: &MapState,
        rng: &mut MapRng,
        constraint: &dyn Constraint,
    ) -> Option<Vec<Coord>>;
}

/// A placer anchored on a single tile, which batch placement moves around.
pub trait CenteredPlacer: AreaPlacer {
    /// Move the anchor.
    fn set_center(&mut self, center: Coord);
}

impl<P: AreaPlacer + ?Sized> AreaPlacer for Box<P> {
    fn place(
        &self,
        map: &MapState,
        rng: &mut MapRng,
        constraint: &dyn Constraint,
    ) -> Option<Vec<Coord>> {
        (**self).place(map, rng, constraint)
    }
}

impl<P: CenteredPlacer + ?Sized> CenteredPlacer for Box<P> {
    fn set_center(&mut self, center: Coord) {
        (**self).set_center(center);
    }
}

/// Cubic blend through `v1` (at `t = 0`) and `v2` (at `t = 1`), shaped by the
/// outer neighbours `v0` and `v3`.
pub(crate) fn cubic_interpolate(v0: f64, v1: f64, v2: f64, v3: f64, t: f64) -> f64 {
    let p = (v3 - v2) - (v0 - v1);
    let q = (v0 - v1) - p;
    let r = v2 - v0;
    ((p * t + q) * t + r) * t + v1
}

/// Smooth a ring of control values into `samples` values per control point.
///
/// Neighbour lookups wrap around, so the last segment blends back into the
/// first control value.
pub(crate) fn smooth_ring(controls: &[f64], samples: usize) -> Vec<f64> {
    let n = controls.len();
    if n == 0 || samples == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(n * samples);
    for j in 0..n {
        let v0 = controls[(j + n - 1) % n];
        let v1 = controls[j];
        let v2 = controls[(j + 1) % n];
        let v3 = controls[(j + 2) % n];
        for k in 0..samples {
            #[allow(clippy::cast_precision_loss)]
            let t = k as f64 / samples as f64;
            out.push(cubic_interpolate(v0, v1, v2, v3, t));
        }
    }
    out
}
