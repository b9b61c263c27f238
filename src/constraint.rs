//! Boolean predicates over map tiles.
//!
//! Placers test every candidate tile against a [`Constraint`]. Constraints
//! read the map but never mutate it.

mod area;
mod cached;
mod terrain;
mod tile_class;

pub use area::{AdjacentToAreaConstraint, AvoidAreasConstraint, StayAreasConstraint};
pub use cached::StaticConstraint;
pub use terrain::{
    AvoidTextureConstraint, HeightConstraint, PassableMapAreaConstraint, SlopeConstraint,
    StayTextureConstraint,
};
pub use tile_class::{
    AvoidTileClassConstraint, BorderTileClassConstraint, NearTileClassConstraint,
    StayInTileClassConstraint,
};

use std::fmt::Debug;

use crate::map::{Coord, MapState};
use crate::tile_class::TileClassId;

/// A predicate over a single tile.
pub trait Constraint: Debug {
    /// Whether the tile at `at` satisfies the predicate.
    fn allows(&self, map: &MapState, at: Coord) -> bool;
}

impl<C: Constraint + ?Sized> Constraint for Box<C> {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        (**self).allows(map, at)
    }
}

impl<C: Constraint + ?Sized> Constraint for &C {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        (**self).allows(map, at)
    }
}

/// Always allows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullConstraint;

impl Constraint for NullConstraint {
    fn allows(&self, _map: &MapState, _at: Coord) -> bool {
        true
    }
}

/// Allows a tile only if every child allows it. Children are evaluated in
/// order and evaluation stops at the first rejection.
#[derive(Debug, Default)]
pub struct AndConstraint {
    constraints: Vec<Box<dyn Constraint>>,
}

impl AndConstraint {
    /// Combine constraints.
    #[must_use]
    pub fn new(constraints: Vec<Box<dyn Constraint>>) -> Self {
        Self { constraints }
    }

    /// Append one more child.
    #[must_use]
    pub fn with(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether there are no children (the conjunction is then always true).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl Constraint for AndConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        self.constraints.iter().all(|c| c.allows(map, at))
    }
}

/// Avoid every listed class by its distance.
#[must_use]
pub fn avoid_classes(classes: &[(TileClassId, f64)]) -> AndConstraint {
    AndConstraint::new(
        classes
            .iter()
            .map(|&(class, distance)| {
                Box::new(AvoidTileClassConstraint::new(class, distance)) as Box<dyn Constraint>
            })
            .collect(),
    )
}

/// Stay at least the given distance inside every listed class.
#[must_use]
pub fn stay_classes(classes: &[(TileClassId, f64)]) -> AndConstraint {
    AndConstraint::new(
        classes
            .iter()
            .map(|&(class, distance)| {
                Box::new(StayInTileClassConstraint::new(class, distance)) as Box<dyn Constraint>
            })
            .collect(),
    )
}

/// Stay within the given distance of every listed class.
#[must_use]
pub fn near_classes(classes: &[(TileClassId, f64)]) -> AndConstraint {
    AndConstraint::new(
        classes
            .iter()
            .map(|&(class, distance)| {
                Box::new(NearTileClassConstraint::new(class, distance)) as Box<dyn Constraint>
            })
            .collect(),
    )
}

/// Sit on the border band of every listed class.
#[must_use]
pub fn border_classes(classes: &[(TileClassId, f64, f64)]) -> AndConstraint {
    AndConstraint::new(
        classes
            .iter()
            .map(|&(class, inside, outside)| {
                Box::new(BorderTileClassConstraint::new(class, inside, outside))
                    as Box<dyn Constraint>
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapSettings;

    #[derive(Debug)]
    struct Never;

    impl Constraint for Never {
        fn allows(&self, _map: &MapState, _at: Coord) -> bool {
            false
        }
    }

    #[derive(Debug)]
    struct Panics;

    impl Constraint for Panics {
        fn allows(&self, _map: &MapState, _at: Coord) -> bool {
            panic!("should have short-circuited")
        }
    }

    fn map() -> MapState {
        MapState::new(&MapSettings {
            size: 16,
            ..MapSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_null_allows_everything() {
        let map = map();
        assert!(NullConstraint.allows(&map, Coord::new(0, 0)));
        assert!(NullConstraint.allows(&map, Coord::new(15, 15)));
    }

    #[test]
    fn test_and_empty_is_true() {
        assert!(AndConstraint::default().allows(&map(), Coord::new(1, 1)));
    }

    #[test]
    fn test_and_short_circuits() {
        let and = AndConstraint::default().with(Never).with(Panics);
        assert!(!and.allows(&map(), Coord::new(1, 1)));
    }

    #[test]
    fn test_avoid_classes_combines_all() {
        let mut map = map();
        let water = map.create_tile_class("water").unwrap();
        let forest = map.create_tile_class("forest").unwrap();
        map.tile_class_mut(forest).add(Coord::new(8, 8));

        let constraint = avoid_classes(&[(water, 2.0), (forest, 2.0)]);
        assert_eq!(constraint.len(), 2);
        assert!(constraint.allows(&map, Coord::new(2, 2)));
        assert!(!constraint.allows(&map, Coord::new(9, 8)));
    }
}
