//! Irregular blob grown along noisy rays from a center tile.

// Ray lengths and perimeter sample counts are small positive values
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use std::f64::consts::{PI, TAU};

use crate::constraint::Constraint;
use crate::error::{MapGenError, MapGenResult};
use crate::map::{Coord, MapState};
use crate::placer::{AreaPlacer, CenteredPlacer, cubic_interpolate};
use crate::rng::MapRng;

/// Places a roughly circular blob of about `size` tiles.
///
/// The outline is a ring of random radii (smoothed by cubic interpolation);
/// `coherence` 1 gives a disk, 0 the most ragged outline, and `smoothness`
/// controls how many control points the ring has.
#[derive(Debug, Clone, Copy)]
pub struct ClumpPlacer {
    size: f64,
    coherence: f64,
    smoothness: f64,
    fail_fraction: f64,
    center: Coord,
}

impl ClumpPlacer {
    /// Create a placer.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is not positive, `coherence` is outside
    /// `[0, 1]`, `smoothness` is outside `(0, 1]` or `fail_fraction` is negative.
    pub fn new(
        size: f64,
        coherence: f64,
        smoothness: f64,
        fail_fraction: f64,
        center: Coord,
    ) -> MapGenResult<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(MapGenError::invalid("clump size", format!("must be positive, got {size}")));
        }
        if !(0.0..=1.0).contains(&coherence) {
            return Err(MapGenError::invalid(
                "clump coherence",
                format!("must be in [0, 1], got {coherence}"),
            ));
        }
        if !(smoothness > 0.0 && smoothness <= 1.0) {
            return Err(MapGenError::invalid(
                "clump smoothness",
                format!("must be in (0, 1], got {smoothness}"),
            ));
        }
        if !fail_fraction.is_finite() || fail_fraction < 0.0 {
            return Err(MapGenError::invalid(
                "clump fail fraction",
                format!("must be non-negative, got {fail_fraction}"),
            ));
        }
        Ok(Self {
            size,
            coherence,
            smoothness,
            fail_fraction,
            center,
        })
    }

    /// Radial noise sampled once per perimeter step.
    fn outline_noise(&self, rng: &mut MapRng, radius: f64, samples: usize) -> Vec<f64> {
        let mut controls = 1 + (1.0 / self.smoothness.max(1.0 / samples as f64)).floor() as usize;
        let circumference = radius * TAU;
        if controls as f64 > circumference {
            controls = circumference.floor() as usize + 1;
        }
        let values: Vec<f64> = (0..controls).map(|_| rng.rand_float(0.0, 2.0)).collect();

        (0..samples)
            .map(|i| {
                let u = i as f64 * controls as f64 / samples as f64;
                let c = (u.floor() as usize).min(controls - 1);
                let t = u - c as f64;
                cubic_interpolate(
                    values[(c + controls - 1) % controls],
                    values[c],
                    values[(c + 1) % controls],
                    values[(c + 2) % controls],
                    t,
                )
            })
            .collect()
    }
}

impl CenteredPlacer for ClumpPlacer {
    fn set_center(&mut self, center: Coord) {
        self.center = center;
    }
}

impl AreaPlacer for ClumpPlacer {
    fn place(
        &self,
        map: &MapState,
        rng: &mut MapRng,
        constraint: &dyn Constraint,
    ) -> Option<Vec<Coord>> {
        if !map.in_bounds(self.center) || !constraint.allows(map, self.center) {
            return None;
        }

        let radius = (self.size / PI).sqrt();
        let perimeter = 4.0 * radius * TAU;
        let samples = perimeter.ceil().max(1.0) as usize;
        let noise = self.outline_noise(rng, radius, samples);

        let side = map.size() as usize;
        let mut seen = vec![false; side * side];
        let mut points = Vec::new();
        let mut failed = 0usize;

        let cx = f64::from(self.center.x) + 0.5;
        let cz = f64::from(self.center.z) + 0.5;
        for (p, n) in noise.iter().enumerate() {
            let theta = TAU * p as f64 / samples as f64;
            let ray = radius * (1.0 + (1.0 - self.coherence) * n);
            let (step_x, step_z) = (theta.sin(), theta.cos());
            let (mut x, mut z) = (cx, cz);
            for _ in 0..ray.ceil().max(0.0) as usize {
                let tile = Coord::new(x.floor() as i32, z.floor() as i32);
                if map.in_bounds(tile) && constraint.allows(map, tile) {
                    let idx = tile.z as usize * side + tile.x as usize;
                    if !seen[idx] {
                        seen[idx] = true;
                        points.push(tile);
                    }
                } else {
                    failed += 1;
                }
                x += step_x;
                z += step_z;
            }
        }

        if failed as f64 > self.size * self.fail_fraction {
            tracing::trace!(x = self.center.x, z = self.center.z, failed, "clump placement failed");
            return None;
        }
        Some(points)
    }
}
