//! Axis-aligned rectangles.

use crate::constraint::Constraint;
use crate::map::{Coord, MapState};
use crate::placer::{AreaPlacer, CenteredPlacer};
use crate::rng::MapRng;

/// Places every tile of a rectangle, clamped to the map.
///
/// Unlike the blob and path placers this one has no tolerance: a single
/// rejected tile fails the whole placement.
#[derive(Debug, Clone, Copy)]
pub struct RectPlacer {
    min: Coord,
    max: Coord,
}

impl RectPlacer {
    /// Rectangle spanning `min..=max` (corners may be given in any order).
    #[must_use]
    pub fn new(a: Coord, b: Coord) -> Self {
        Self {
            min: Coord::new(a.x.min(b.x), a.z.min(b.z)),
            max: Coord::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    /// Rectangle of `width × height` tiles centered on `center`.
    #[must_use]
    pub fn centered(center: Coord, width: i32, height: i32) -> Self {
        let min = center.offset(-(width / 2), -(height / 2));
        Self::new(min, min.offset(width.max(1) - 1, height.max(1) - 1))
    }
}

impl CenteredPlacer for RectPlacer {
    fn set_center(&mut self, center: Coord) {
        *self = Self::centered(
            center,
            self.max.x - self.min.x + 1,
            self.max.z - self.min.z + 1,
        );
    }
}

impl AreaPlacer for RectPlacer {
    fn place(
        &self,
        map: &MapState,
        _rng: &mut MapRng,
        constraint: &dyn Constraint,
    ) -> Option<Vec<Coord>> {
        let last = map.size() - 1;
        let (x0, x1) = (self.min.x.max(0), self.max.x.min(last));
        let (z0, z1) = (self.min.z.max(0), self.max.z.min(last));

        let mut points = Vec::new();
        for z in z0..=z1 {
            for x in x0..=x1 {
                let tile = Coord::new(x, z);
                if !constraint.allows(map, tile) {
                    return None;
                }
                points.push(tile);
            }
        }
        Some(points)
    }
}
