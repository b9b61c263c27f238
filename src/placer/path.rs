//! Winding ribbon between two tiles.
//!
//! The straight segment between the endpoints is displaced sideways by a 1-D
//! noise curve (random control offsets, cubic interpolated), widened into a
//! ribbon with a tapered half-width, and rasterized quad by quad. A tile is
//! covered when its center lies inside one of the quad's two triangles.

// Step counts and tile indices derive from small positive distances
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use crate::constraint::Constraint;
use crate::error::{MapGenError, MapGenResult};
use crate::map::{Coord, MapState};
use crate::placer::{AreaPlacer, smooth_ring};
use crate::rng::MapRng;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct Point {
    x: f64,
    z: f64,
}

/// Places a noisy path of roughly `width` tiles between two tiles.
#[derive(Debug, Clone, Copy)]
pub struct PathPlacer {
    start: Coord,
    end: Coord,
    width: f64,
    waviness: f64,
    smoothness: f64,
    offset: f64,
    taper: f64,
    fail_fraction: f64,
}

impl PathPlacer {
    /// Create a placer.
    ///
    /// * `waviness`: control points per 4 tiles of length (0 = straight)
    /// * `smoothness`: interpolation steps per control point, per 4 tiles
    /// * `offset`: maximum sideways displacement per 4 tiles of length
    /// * `taper`: fraction of the width lost by the end of the path
    /// * `fail_fraction`: rejected tiles tolerated per tile of width and length
    ///
    /// # Errors
    ///
    /// Returns an error for coincident endpoints, a non-positive width, negative
    /// shape parameters, or a taper outside `[0, 1]`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start: Coord,
        end: Coord,
        width: f64,
        waviness: f64,
        smoothness: f64,
        offset: f64,
        taper: f64,
        fail_fraction: f64,
    ) -> MapGenResult<Self> {
        if start == end {
            return Err(MapGenError::invalid("path endpoints", "must differ"));
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(MapGenError::invalid("path width", format!("must be positive, got {width}")));
        }
        for (what, value) in [
            ("path waviness", waviness),
            ("path smoothness", smoothness),
            ("path offset", offset),
            ("path fail fraction", fail_fraction),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MapGenError::invalid(what, format!("must be non-negative, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&taper) {
            return Err(MapGenError::invalid("path taper", format!("must be in [0, 1], got {taper}")));
        }
        Ok(Self {
            start,
            end,
            width,
            waviness,
            smoothness,
            offset,
            taper,
            fail_fraction,
        })
    }

    /// Straight path: no waviness, no taper, no tolerance for rejections.
    ///
    /// # Errors
    ///
    /// Same as [`PathPlacer::new`].
    pub fn straight(start: Coord, end: Coord, width: f64) -> MapGenResult<Self> {
        Self::new(start, end, width, 0.0, 1.0, 0.0, 0.0, 0.0)
    }

    /// Straight-line length between the endpoints.
    #[must_use]
    pub fn distance(&self) -> f64 {
        f64::from(self.end.x - self.start.x).hypot(f64::from(self.end.z - self.start.z))
    }

    /// Sideways displacement for every interpolation step, endpoints pinned to 0.
    fn lateral_noise(&self, rng: &mut MapRng, distance: f64) -> Vec<f64> {
        let steps = 1 + (distance / 4.0 * self.waviness).floor() as usize;
        let substeps = 1 + (distance / 4.0 * self.smoothness).floor() as usize;
        let bound = 1.0 + (distance / 4.0 * self.offset).floor();

        let mut controls = vec![0.0; steps];
        for value in controls.iter_mut().take(steps.saturating_sub(1)).skip(1) {
            *value = rng.rand_float(-bound, bound);
        }

        let mut noise = smooth_ring(&controls, substeps);
        // Closing sample: the ring wraps back to the first (pinned) control
        noise.push(controls[0]);
        noise
    }

    /// Left and right edges of the ribbon, one point per interpolation step.
    fn ribbon(&self, noise: &[f64]) -> (Vec<Point>, Vec<Point>) {
        let (x1, z1) = (f64::from(self.start.x) + 0.5, f64::from(self.start.z) + 0.5);
        let (x2, z2) = (f64::from(self.end.x) + 0.5, f64::from(self.end.z) + 0.5);
        let distance = self.distance();
        let (ux, uz) = ((x2 - x1) / distance, (z2 - z1) / distance);
        let total = noise.len() - 1;

        let centers: Vec<Point> = noise
            .iter()
            .enumerate()
            .map(|(j, n)| {
                let t = j as f64 / total as f64;
                Point {
                    x: x1 + (x2 - x1) * t - uz * n,
                    z: z1 + (z2 - z1) * t + ux * n,
                }
            })
            .collect();

        let half_width = self.width / 2.0;
        let mut left = Vec::with_capacity(centers.len());
        let mut right = Vec::with_capacity(centers.len());
        for (j, c) in centers.iter().enumerate() {
            let (a, b) = if j < total {
                (c, &centers[j + 1])
            } else {
                (&centers[j - 1], c)
            };
            let (mut tx, mut tz) = (b.x - a.x, b.z - a.z);
            let len = tx.hypot(tz);
            if len > EPSILON {
                tx /= len;
                tz /= len;
            } else {
                (tx, tz) = (ux, uz);
            }
            let t = j as f64 / total as f64;
            let w = half_width * (1.0 - t * self.taper);
            left.push(Point {
                x: c.x - tz * w,
                z: c.z + tx * w,
            });
            right.push(Point {
                x: c.x + tz * w,
                z: c.z - tx * w,
            });
        }
        (left, right)
    }
}

/// Tiles whose centers lie inside the triangle, row by row.
fn fill_triangle(tri: [Point; 3], mut visit: impl FnMut(Coord)) {
    let min_z = tri.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
    let max_z = tri.iter().map(|p| p.z).fold(f64::NEG_INFINITY, f64::max);
    let first_row = (min_z - 0.5 - EPSILON).ceil() as i32;
    let last_row = (max_z - 0.5 + EPSILON).floor() as i32;

    for row in first_row..=last_row {
        let y = f64::from(row) + 0.5;
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (i, &p) in tri.iter().enumerate() {
            let q = tri[(i + 1) % 3];
            let (pz_lo, pz_hi) = (p.z.min(q.z), p.z.max(q.z));
            if y < pz_lo - EPSILON || y > pz_hi + EPSILON {
                continue;
            }
            if (q.z - p.z).abs() < EPSILON {
                lo = lo.min(p.x.min(q.x));
                hi = hi.max(p.x.max(q.x));
            } else {
                let x = p.x + (y - p.z) * (q.x - p.x) / (q.z - p.z);
                lo = lo.min(x);
                hi = hi.max(x);
            }
        }
        if lo > hi {
            continue;
        }
        let first_col = (lo - 0.5 - EPSILON).ceil() as i32;
        let last_col = (hi - 0.5 + EPSILON).floor() as i32;
        for col in first_col..=last_col {
            visit(Coord::new(col, row));
        }
    }
}

impl AreaPlacer for PathPlacer {
    fn place(
        &self,
        map: &MapState,
        rng: &mut MapRng,
        constraint: &dyn Constraint,
    ) -> Option<Vec<Coord>> {
        let distance = self.distance();
        let noise = self.lateral_noise(rng, distance);
        let (left, right) = self.ribbon(&noise);

        let side = map.size() as usize;
        let mut seen = vec![false; side * side];
        let mut points = Vec::new();
        let mut failed = 0usize;

        for j in 0..left.len() - 1 {
            let quad = [left[j], left[j + 1], right[j], right[j + 1]];
            for tri in [[quad[1], quad[0], quad[2]], [quad[1], quad[2], quad[3]]] {
                fill_triangle(tri, |tile| {
                    if !map.in_bounds(tile) {
                        return;
                    }
                    let idx = tile.z as usize * side + tile.x as usize;
                    if seen[idx] {
                        return;
                    }
                    seen[idx] = true;
                    if constraint.allows(map, tile) {
                        points.push(tile);
                    } else {
                        failed += 1;
                    }
                });
            }
        }

        if failed as f64 > self.width * self.fail_fraction * distance {
            tracing::trace!(
                start_x = self.start.x,
                start_z = self.start.z,
                failed,
                "path placement failed"
            );
            return None;
        }
        Some(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{AvoidTileClassConstraint, NullConstraint};
    use crate::map::MapSettings;

    fn map() -> MapState {
        MapState::new(&MapSettings {
            size: 32,
            ..MapSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parameters_validated() {
        let a = Coord::new(1, 1);
        let b = Coord::new(9, 1);
        assert!(PathPlacer::straight(a, a, 3.0).is_err());
        assert!(PathPlacer::straight(a, b, 0.0).is_err());
        assert!(PathPlacer::new(a, b, 3.0, -1.0, 1.0, 1.0, 0.0, 0.0).is_err());
        assert!(PathPlacer::new(a, b, 3.0, 1.0, 1.0, 1.0, 1.5, 0.0).is_err());
    }

    #[test]
    fn test_straight_path_is_rectangle() {
        let map = map();
        let placer = PathPlacer::straight(Coord::new(5, 10), Coord::new(15, 10), 3.0).unwrap();
        let mut points = placer.place(&map, &mut MapRng::new(3), &NullConstraint).unwrap();
        points.sort();
        let mut expected: Vec<Coord> = (9..=11)
            .flat_map(|z| (5..=15).map(move |x| Coord::new(x, z)))
            .collect();
        expected.sort();
        assert_eq!(points, expected);
    }

    #[test]
    fn test_fill_triangle_single_tile() {
        let mut tiles = Vec::new();
        fill_triangle(
            [
                Point { x: 2.0, z: 2.0 },
                Point { x: 3.0, z: 2.0 },
                Point { x: 2.0, z: 3.0 },
            ],
            |c| tiles.push(c),
        );
        assert_eq!(tiles, vec![Coord::new(2, 2)]);
    }

    #[test]
    fn test_wavy_path_stays_near_line() {
        let map = map();
        let placer =
            PathPlacer::new(Coord::new(2, 16), Coord::new(29, 16), 2.0, 1.0, 1.0, 0.2, 0.0, 0.0)
                .unwrap();
        let points = placer.place(&map, &mut MapRng::new(11), &NullConstraint).unwrap();
        assert!(!points.is_empty());
        // Offset bound is 1 + floor(27 / 4 * 0.2) = 2; the cubic can overshoot it
        assert!(points.iter().all(|p| (p.z - 16).abs() <= 5), "{points:?}");
    }

    #[test]
    fn test_failure_budget() {
        let mut map = map();
        let river = map.create_tile_class("river").unwrap();
        for z in 0..32 {
            map.tile_class_mut(river).add(Coord::new(10, z));
        }
        let avoid = AvoidTileClassConstraint::new(river, 0.0);

        // Three rejected tiles, budget 3 * 0 * 10 = 0
        let strict = PathPlacer::straight(Coord::new(5, 10), Coord::new(15, 10), 3.0).unwrap();
        assert!(strict.place(&map, &mut MapRng::new(1), &avoid).is_none());

        // Budget 3 * 0.2 * 10 = 6
        let tolerant =
            PathPlacer::new(Coord::new(5, 10), Coord::new(15, 10), 3.0, 0.0, 1.0, 0.0, 0.0, 0.2)
                .unwrap();
        let points = tolerant.place(&map, &mut MapRng::new(1), &avoid).unwrap();
        assert_eq!(points.len(), 30);
        assert!(points.iter().all(|p| p.x != 10));
    }

    #[test]
    fn test_off_map_tiles_skipped() {
        let map = map();
        let placer = PathPlacer::straight(Coord::new(0, 0), Coord::new(10, 0), 3.0).unwrap();
        let points = placer.place(&map, &mut MapRng::new(1), &NullConstraint).unwrap();
        assert!(points.iter().all(|p| map.in_bounds(*p)));
        assert_eq!(points.len(), 11 * 2);
    }
}
