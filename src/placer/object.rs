//! Discrete object placement around an anchor.

use crate::constraint::Constraint;
use crate::error::{MapGenError, MapGenResult};
use crate::map::{Coord, MapState, PlacedObject};
use crate::rng::MapRng;
use crate::tile_class::TileClassId;

/// Failed position samples after which a single object gives up.
pub(crate) const MAX_FAILED_SAMPLES: u32 = 20;

/// Computes a set of objects; the batch driver commits them to the map.
pub trait ObjectGroupPlacer: std::fmt::Debug {
    /// Compute the group's objects, or `None` if any of them could not be placed.
    fn place(
        &self,
        map: &MapState,
        rng: &mut MapRng,
        player: u8,
        constraint: &dyn Constraint,
    ) -> Option<Vec<PlacedObject>>;

    /// Move the anchor.
    fn set_center(&mut self, center: Coord);

    /// Class tagged on the tiles of committed objects.
    fn tile_class(&self) -> Option<TileClassId> {
        None
    }
}

impl<P: ObjectGroupPlacer + ?Sized> ObjectGroupPlacer for Box<P> {
    fn place(
        &self,
        map: &MapState,
        rng: &mut MapRng,
        player: u8,
        constraint: &dyn Constraint,
    ) -> Option<Vec<PlacedObject>> {
        (**self).place(map, rng, player, constraint)
    }

    fn set_center(&mut self, center: Coord) {
        (**self).set_center(center);
    }

    fn tile_class(&self) -> Option<TileClassId> {
        (**self).tile_class()
    }
}

/// A random number of copies of one template scattered in a ring.
#[derive(Debug, Clone)]
pub struct SimpleObject {
    template: String,
    min_count: u32,
    max_count: u32,
    min_distance: f64,
    max_distance: f64,
    min_angle: f64,
    max_angle: f64,
}

impl SimpleObject {
    /// Create an object template entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a range is inverted or a distance is negative.
    pub fn new(
        template: impl Into<String>,
        min_count: u32,
        max_count: u32,
        min_distance: f64,
        max_distance: f64,
        min_angle: f64,
        max_angle: f64,
    ) -> MapGenResult<Self> {
        if min_count > max_count {
            return Err(MapGenError::invalid(
                "object count",
                format!("min {min_count} exceeds max {max_count}"),
            ));
        }
        if !(min_distance >= 0.0 && min_distance <= max_distance && max_distance.is_finite()) {
            return Err(MapGenError::invalid(
                "object distance",
                format!("expected 0 <= min <= max, got {min_distance}..{max_distance}"),
            ));
        }
        if !(min_angle.is_finite() && max_angle.is_finite()) || min_angle > max_angle {
            return Err(MapGenError::invalid(
                "object angle",
                format!("min {min_angle} exceeds max {max_angle}"),
            ));
        }
        Ok(Self {
            template: template.into(),
            min_count,
            max_count,
            min_distance,
            max_distance,
            min_angle,
            max_angle,
        })
    }

    /// A single object on the anchor tile.
    #[must_use]
    pub fn single(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            min_count: 1,
            max_count: 1,
            min_distance: 0.0,
            max_distance: 0.0,
            min_angle: 0.0,
            max_angle: 0.0,
        }
    }

    /// Template name.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Append this object's copies to `placed`. Returns false as soon as one
    /// copy exhausts its sample budget.
    #[allow(clippy::too_many_arguments)]
    fn place_into(
        &self,
        map: &MapState,
        rng: &mut MapRng,
        center: Coord,
        player: u8,
        avoid_self: bool,
        constraint: &dyn Constraint,
        placed: &mut Vec<PlacedObject>,
    ) -> bool {
        let count = rng.rand_int_inclusive(
            i32::try_from(self.min_count).unwrap_or(i32::MAX),
            i32::try_from(self.max_count).unwrap_or(i32::MAX),
        );
        let (cx, cz) = (f64::from(center.x) + 0.5, f64::from(center.z) + 0.5);

        for _ in 0..count {
            let mut failed = 0;
            loop {
                let distance = rng.rand_float(self.min_distance, self.max_distance);
                let direction = rng.rand_angle();
                let x = cx + distance * direction.cos();
                let z = cz + distance * direction.sin();

                #[allow(clippy::cast_possible_truncation)]
                let tile = Coord::new(x.floor() as i32, z.floor() as i32);
                let crowded = avoid_self
                    && placed.iter().any(|o| {
                        let (dx, dz) = (o.x - x, o.z - z);
                        dx * dx + dz * dz < 1.0
                    });

                if map.in_bounds(tile) && !crowded && constraint.allows(map, tile) {
                    placed.push(PlacedObject {
                        template: self.template.clone(),
                        player,
                        x,
                        z,
                        angle: rng.rand_float(self.min_angle, self.max_angle),
                    });
                    break;
                }
                failed += 1;
                if failed >= MAX_FAILED_SAMPLES {
                    return false;
                }
            }
        }
        true
    }
}

/// A group of objects sharing one anchor. All of them place or none do.
#[derive(Debug, Clone)]
pub struct SimpleGroup {
    objects: Vec<SimpleObject>,
    avoid_self: bool,
    tile_class: Option<TileClassId>,
    center: Coord,
}

impl SimpleGroup {
    /// Create a group.
    ///
    /// With `avoid_self`, objects of the group keep at least one tile apart.
    #[must_use]
    pub fn new(
        objects: Vec<SimpleObject>,
        avoid_self: bool,
        tile_class: Option<TileClassId>,
        center: Coord,
    ) -> Self {
        Self {
            objects,
            avoid_self,
            tile_class,
            center,
        }
    }

    /// Current anchor.
    #[must_use]
    pub const fn center(&self) -> Coord {
        self.center
    }
}

impl ObjectGroupPlacer for SimpleGroup {
    fn place(
        &self,
        map: &MapState,
        rng: &mut MapRng,
        player: u8,
        constraint: &dyn Constraint,
    ) -> Option<Vec<PlacedObject>> {
        let mut placed = Vec::new();
        for object in &self.objects {
            if !object.place_into(
                map,
                rng,
                self.center,
                player,
                self.avoid_self,
                constraint,
                &mut placed,
            ) {
                tracing::trace!(
                    template = object.template(),
                    x = self.center.x,
                    z = self.center.z,
                    "object group placement failed"
                );
                return None;
            }
        }
        Some(placed)
    }

    fn set_center(&mut self, center: Coord) {
        self.center = center;
    }

    fn tile_class(&self) -> Option<TileClassId> {
        self.tile_class
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
    fn test_object_ranges_validated() {
        assert!(SimpleObject::new("tree", 3, 1, 0.0, 1.0, 0.0, 0.0).is_err());
        assert!(SimpleObject::new("tree", 1, 3, 2.0, 1.0, 0.0, 0.0).is_err());
        assert!(SimpleObject::new("tree", 1, 3, -1.0, 1.0, 0.0, 0.0).is_err());
        assert!(SimpleObject::new("tree", 1, 3, 0.0, 1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_group_places_within_ring() {
        let map = map();
        let trees = SimpleObject::new("tree", 4, 6, 2.0, 5.0, 0.0, 1.0).unwrap();
        let group = SimpleGroup::new(vec![trees], true, None, Coord::new(16, 16));
        let placed = group.place(&map, &mut MapRng::new(8), 0, &NullConstraint).unwrap();

        assert!((4..=6).contains(&placed.len()));
        for o in &placed {
            let (dx, dz) = (o.x - 16.5, o.z - 16.5);
            let d = (dx * dx + dz * dz).sqrt();
            assert!((2.0..=5.0).contains(&d), "distance {d}");
            assert!((0.0..=1.0).contains(&o.angle));
            assert_eq!(o.template, "tree");
        }
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                let (dx, dz) = (a.x - b.x, a.z - b.z);
                assert!(dx * dx + dz * dz >= 1.0);
            }
        }
    }

    #[test]
    fn test_group_is_all_or_nothing() {
        let mut map = map();
        let cliffs = map.create_tile_class("cliffs").unwrap();
        for x in 0..32 {
            for z in 0..32 {
                if x > 20 {
                    map.tile_class_mut(cliffs).add(Coord::new(x, z));
                }
            }
        }
        let near = SimpleObject::single("house");
        let far = SimpleObject::new("tower", 1, 1, 8.0, 8.0, 0.0, 0.0).unwrap();
        // Center at x = 22 is inside the cliffs, so the house always fails
        let group = SimpleGroup::new(vec![far, near], false, None, Coord::new(22, 16));
        let avoid = AvoidTileClassConstraint::new(cliffs, 0.0);
        assert!(group.place(&map, &mut MapRng::new(2), 1, &avoid).is_none());
    }

    #[test]
    fn test_single_object_on_anchor() {
        let map = map();
        let mut group =
            SimpleGroup::new(vec![SimpleObject::single("cc")], false, None, Coord::new(0, 0));
        group.set_center(Coord::new(7, 9));
        let placed = group.place(&map, &mut MapRng::new(1), 3, &NullConstraint).unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].tile(), Coord::new(7, 9));
        assert_eq!(placed[0].player, 3);
    }
}
