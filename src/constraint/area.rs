//! Constraints relative to previously created areas.

use crate::area::Area;
use crate::constraint::Constraint;
use crate::map::{Coord, MapState};

/// Allows tiles inside at least one of the areas.
#[derive(Debug, Clone)]
pub struct StayAreasConstraint {
    areas: Vec<Area>,
}

impl StayAreasConstraint {
    /// Create the constraint.
    #[must_use]
    pub fn new(areas: Vec<Area>) -> Self {
        Self { areas }
    }
}

impl Constraint for StayAreasConstraint {
    fn allows(&self, _map: &MapState, at: Coord) -> bool {
        self.areas.iter().any(|area| area.contains(at))
    }
}

/// Allows tiles inside none of the areas.
#[derive(Debug, Clone)]
pub struct AvoidAreasConstraint {
    areas: Vec<Area>,
}

impl AvoidAreasConstraint {
    /// Create the constraint.
    #[must_use]
    pub fn new(areas: Vec<Area>) -> Self {
        Self { areas }
    }
}

impl Constraint for AvoidAreasConstraint {
    fn allows(&self, _map: &MapState, at: Coord) -> bool {
        !self.areas.iter().any(|area| area.contains(at))
    }
}

/// Allows tiles outside every area that have an edge neighbour inside one.
#[derive(Debug, Clone)]
pub struct AdjacentToAreaConstraint {
    areas: Vec<Area>,
}

impl AdjacentToAreaConstraint {
    /// Create the constraint.
    #[must_use]
    pub fn new(areas: Vec<Area>) -> Self {
        Self { areas }
    }

    fn inside(&self, at: Coord) -> bool {
        self.areas.iter().any(|area| area.contains(at))
    }
}

impl Constraint for AdjacentToAreaConstraint {
    fn allows(&self, _map: &MapState, at: Coord) -> bool {
        !self.inside(at) && at.neighbors4().iter().any(|&n| self.inside(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaId;
    use crate::map::MapSettings;

    fn square(id: u32, x0: i32, z0: i32, side: i32) -> Area {
        let points = (z0..z0 + side)
            .flat_map(|z| (x0..x0 + side).map(move |x| Coord::new(x, z)))
            .collect();
        Area::new(AreaId(id), points)
    }

    fn map() -> MapState {
        MapState::new(&MapSettings {
            size: 16,
            ..MapSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_stay_and_avoid_areas() {
        let map = map();
        let areas = vec![square(1, 0, 0, 3), square(2, 10, 10, 2)];
        let stay = StayAreasConstraint::new(areas.clone());
        let avoid = AvoidAreasConstraint::new(areas);

        for c in [Coord::new(1, 1), Coord::new(11, 11)] {
            assert!(stay.allows(&map, c));
            assert!(!avoid.allows(&map, c));
        }
        assert!(!stay.allows(&map, Coord::new(5, 5)));
        assert!(avoid.allows(&map, Coord::new(5, 5)));
    }

    #[test]
    fn test_adjacent_to_area() {
        let map = map();
        let adjacent = AdjacentToAreaConstraint::new(vec![square(1, 4, 4, 3)]);
        assert!(adjacent.allows(&map, Coord::new(3, 5)));
        assert!(adjacent.allows(&map, Coord::new(5, 7)));
        // Inside the area
        assert!(!adjacent.allows(&map, Coord::new(5, 5)));
        // Only diagonally adjacent
        assert!(!adjacent.allows(&map, Coord::new(3, 3)));
        assert!(!adjacent.allows(&map, Coord::new(10, 10)));
    }
}
