//! Constraints over textures, elevation and host passability.

use crate::constraint::Constraint;
use crate::map::{Coord, MapState, TextureId};

/// Allows tiles painted with the given texture.
#[derive(Debug, Clone, Copy)]
pub struct StayTextureConstraint {
    texture: TextureId,
}

impl StayTextureConstraint {
    /// Create the constraint.
    #[must_use]
    pub const fn new(texture: TextureId) -> Self {
        Self { texture }
    }
}

impl Constraint for StayTextureConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        map.texture(at) == Some(self.texture)
    }
}

/// Allows tiles not painted with the given texture.
#[derive(Debug, Clone, Copy)]
pub struct AvoidTextureConstraint {
    texture: TextureId,
}

impl AvoidTextureConstraint {
    /// Create the constraint.
    #[must_use]
    pub const fn new(texture: TextureId) -> Self {
        Self { texture }
    }
}

impl Constraint for AvoidTextureConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        map.texture(at).is_some_and(|t| t != self.texture)
    }
}

/// Allows tiles whose mean corner height lies in `[min, max]`.
///
/// Either bound may be infinite to test one side only.
#[derive(Debug, Clone, Copy)]
pub struct HeightConstraint {
    min: f64,
    max: f64,
}

impl HeightConstraint {
    /// Create the constraint.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Constraint for HeightConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        map.tile_height(at)
            .is_some_and(|h| h >= self.min && h <= self.max)
    }
}

/// Allows tiles whose slope lies in `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct SlopeConstraint {
    min: f64,
    max: f64,
}

impl SlopeConstraint {
    /// Create the constraint.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Constraint for SlopeConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        map.slope(at).is_some_and(|s| s >= self.min && s <= self.max)
    }
}

/// Allows tiles the host marked passable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassableMapAreaConstraint;

impl Constraint for PassableMapAreaConstraint {
    fn allows(&self, map: &MapState, at: Coord) -> bool {
        map.is_passable(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapSettings;

    fn map() -> MapState {
        MapState::new(&MapSettings {
            size: 16,
            ..MapSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_texture_constraints() {
        let mut map = map();
        let grass = map.texture_id("grass").unwrap();
        let sand = map.intern_texture("sand");
        map.set_texture(Coord::new(4, 4), sand);

        assert!(StayTextureConstraint::new(sand).allows(&map, Coord::new(4, 4)));
        assert!(!StayTextureConstraint::new(sand).allows(&map, Coord::new(5, 4)));
        assert!(AvoidTextureConstraint::new(grass).allows(&map, Coord::new(4, 4)));
        assert!(!AvoidTextureConstraint::new(grass).allows(&map, Coord::new(5, 4)));
    }

    #[test]
    fn test_height_open_bounds() {
        let mut map = map();
        for (dx, dz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            map.set_height(Coord::new(3 + dx, 3 + dz), 10.0);
        }
        let high = HeightConstraint::new(5.0, f64::INFINITY);
        let low = HeightConstraint::new(f64::NEG_INFINITY, 0.0);
        assert!(high.allows(&map, Coord::new(3, 3)));
        assert!(!high.allows(&map, Coord::new(8, 8)));
        assert!(low.allows(&map, Coord::new(8, 8)));
        assert!(!low.allows(&map, Coord::new(3, 3)));
        // Inclusive bounds
        assert!(HeightConstraint::new(10.0, 10.0).allows(&map, Coord::new(3, 3)));
    }

    #[test]
    fn test_slope() {
        let mut map = map();
        map.set_height(Coord::new(6, 6), 3.0);
        let steep = SlopeConstraint::new(2.0, f64::INFINITY);
        assert!(steep.allows(&map, Coord::new(5, 5)));
        assert!(steep.allows(&map, Coord::new(6, 6)));
        assert!(!steep.allows(&map, Coord::new(9, 9)));
    }

    #[test]
    fn test_passable() {
        let mut map = map();
        map.set_passable(Coord::new(2, 2), false);
        assert!(!PassableMapAreaConstraint.allows(&map, Coord::new(2, 2)));
        assert!(PassableMapAreaConstraint.allows(&map, Coord::new(3, 2)));
        assert!(!PassableMapAreaConstraint.allows(&map, Coord::new(-1, 2)));
    }
}
