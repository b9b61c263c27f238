//! Constraints over tile class membership near a tile.

use crate::constraint::Constraint;
use crate::map::{Coord, MapState};
use crate::tile_class::TileClassId;

/// Allows tiles with no class member within `distance`.
#[derive(Debug, Clone, Copy)]
pub struct AvoidTileClassConstraint {
    class: TileClassId,
    distance: f64,
}

impl AvoidTileClassConstraint {
    /// Create the constraint.
    #[must_use]
    pub const fn new(class: TileClassId, distance: f64) -> Self {
        Self { class, distance }
    }
}

impl Constraint for AvoidTileClassConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        map.tile_class(self.class)
            .count_members_in_radius(at, self.distance)
            == 0
    }
}

/// Allows tiles whose whole `distance` window lies inside the class.
#[derive(Debug, Clone, Copy)]
pub struct StayInTileClassConstraint {
    class: TileClassId,
    distance: f64,
}

impl StayInTileClassConstraint {
    /// Create the constraint.
    #[must_use]
    pub const fn new(class: TileClassId, distance: f64) -> Self {
        Self { class, distance }
    }
}

impl Constraint for StayInTileClassConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        map.tile_class(self.class)
            .count_non_members_in_radius(at, self.distance)
            == 0
    }
}

/// Allows tiles with at least one class member within `distance`.
#[derive(Debug, Clone, Copy)]
pub struct NearTileClassConstraint {
    class: TileClassId,
    distance: f64,
}

impl NearTileClassConstraint {
    /// Create the constraint.
    #[must_use]
    pub const fn new(class: TileClassId, distance: f64) -> Self {
        Self { class, distance }
    }
}

impl Constraint for NearTileClassConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        map.tile_class(self.class)
            .count_members_in_radius(at, self.distance)
            > 0
    }
}

/// Allows tiles on the transition band of a class: members within
/// `distance_outside` and non-members within `distance_inside`.
#[derive(Debug, Clone, Copy)]
pub struct BorderTileClassConstraint {
    class: TileClassId,
    distance_inside: f64,
    distance_outside: f64,
}

impl BorderTileClassConstraint {
    /// Create the constraint.
    #[must_use]
    pub const fn new(class: TileClassId, distance_inside: f64, distance_outside: f64) -> Self {
        Self {
            class,
            distance_inside,
            distance_outside,
        }
    }
}

impl Constraint for BorderTileClassConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        let class = map.tile_class(self.class);
        class.count_members_in_radius(at, self.distance_outside) > 0
            && class.count_non_members_in_radius(at, self.distance_inside) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapSettings;

    fn map_with_block() -> (MapState, TileClassId) {
        let mut map = MapState::new(&MapSettings {
            size: 32,
            ..MapSettings::default()
        })
        .unwrap();
        let lake = map.create_tile_class("lake").unwrap();
        for z in 10..20 {
            for x in 10..20 {
                map.tile_class_mut(lake).add(Coord::new(x, z));
            }
        }
        (map, lake)
    }

    #[test]
    fn test_unbounded_distance_sees_whole_map() {
        let (map, lake) = map_with_block();
        let far = Coord::new(31, 0);
        assert!(!AvoidTileClassConstraint::new(lake, f64::INFINITY).allows(&map, far));
        assert!(NearTileClassConstraint::new(lake, f64::INFINITY).allows(&map, far));
        let stay = StayInTileClassConstraint::new(lake, f64::INFINITY);
        assert!(!stay.allows(&map, Coord::new(15, 15)));
    }

    #[test]
    fn test_avoid_tile_class() {
        let (map, lake) = map_with_block();
        let avoid = AvoidTileClassConstraint::new(lake, 3.0);
        assert!(avoid.allows(&map, Coord::new(2, 2)));
        assert!(avoid.allows(&map, Coord::new(6, 15)));
        assert!(!avoid.allows(&map, Coord::new(7, 15)));
        assert!(!avoid.allows(&map, Coord::new(15, 15)));
    }

    #[test]
    fn test_stay_in_tile_class() {
        let (map, lake) = map_with_block();
        let stay = StayInTileClassConstraint::new(lake, 2.0);
        assert!(stay.allows(&map, Coord::new(15, 15)));
        assert!(stay.allows(&map, Coord::new(12, 15)));
        assert!(!stay.allows(&map, Coord::new(11, 15)));
        assert!(!stay.allows(&map, Coord::new(2, 2)));
    }

    #[test]
    fn test_near_tile_class() {
        let (map, lake) = map_with_block();
        let near = NearTileClassConstraint::new(lake, 2.0);
        assert!(near.allows(&map, Coord::new(8, 15)));
        assert!(!near.allows(&map, Coord::new(7, 15)));
    }

    #[test]
    fn test_border_tile_class() {
        let (map, lake) = map_with_block();
        let border = BorderTileClassConstraint::new(lake, 1.0, 1.0);
        assert!(border.allows(&map, Coord::new(9, 15)));
        assert!(border.allows(&map, Coord::new(10, 15)));
        assert!(!border.allows(&map, Coord::new(8, 15)));
        assert!(!border.allows(&map, Coord::new(11, 15)));
    }
}
