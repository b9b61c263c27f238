//! Memoizing wrapper evaluated against a frozen copy of the map.

// Indices are bounded by the validated map size
#![allow(clippy::cast_sign_loss)]

use std::cell::Cell;
use std::sync::Arc;

use crate::constraint::Constraint;
use crate::map::{Coord, MapState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cached {
    Unknown,
    Allowed,
    Denied,
}

/// Caches an inner constraint per tile.
///
/// The map is cloned into a snapshot when the wrapper is built, and the inner
/// constraint is only ever evaluated against that snapshot. Later changes to
/// the live map are therefore never observed: build a new `StaticConstraint`
/// after mutating the map if fresh answers are needed.
#[derive(Debug)]
pub struct StaticConstraint {
    inner: Box<dyn Constraint>,
    snapshot: Arc<MapState>,
    cache: Vec<Cell<Cached>>,
}

impl StaticConstraint {
    /// Freeze `map` and wrap `inner`.
    #[must_use]
    pub fn new(map: &MapState, inner: impl Constraint + 'static) -> Self {
        Self::from_snapshot(Arc::new(map.clone()), Box::new(inner))
    }

    /// Wrap `inner` over an existing snapshot, sharing it with other wrappers.
    #[must_use]
    pub fn from_snapshot(snapshot: Arc<MapState>, inner: Box<dyn Constraint>) -> Self {
        let side = snapshot.size() as usize;
        Self {
            inner,
            cache: vec![Cell::new(Cached::Unknown); side * side],
            snapshot,
        }
    }

    /// The frozen map this constraint answers for.
    #[must_use]
    pub fn snapshot(&self) -> &Arc<MapState> {
        &self.snapshot
    }

    /// Number of tiles evaluated so far.
    #[must_use]
    pub fn cached_tiles(&self) -> usize {
        self.cache
            .iter()
            .filter(|c| c.get() != Cached::Unknown)
            .count()
    }
}

impl Constraint for StaticConstraint {
    fn allows(&self, _map: &MapState, at: Coord) -> bool {
        if !self.snapshot.in_bounds(at) {
            return self.inner.allows(&self.snapshot, at);
        }
        let idx = at.z as usize * self.snapshot.size() as usize + at.x as usize;
        match self.cache[idx].get() {
            Cached::Allowed => true,
            Cached::Denied => false,
            Cached::Unknown => {
                let allowed = self.inner.allows(&self.snapshot, at);
                self.cache[idx].set(if allowed {
                    Cached::Allowed
                } else {
                    Cached::Denied
                });
                allowed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::AvoidTileClassConstraint;
    use crate::map::MapSettings;

    #[test]
    fn test_static_caches_lazily() {
        let mut map = MapState::new(&MapSettings {
            size: 16,
            ..MapSettings::default()
        })
        .unwrap();
        let hills = map.create_tile_class("hills").unwrap();
        map.tile_class_mut(hills).add(Coord::new(8, 8));

        let cached = StaticConstraint::new(&map, AvoidTileClassConstraint::new(hills, 1.0));
        assert_eq!(cached.cached_tiles(), 0);
        assert!(!cached.allows(&map, Coord::new(8, 9)));
        assert!(cached.allows(&map, Coord::new(2, 2)));
        assert!(cached.allows(&map, Coord::new(2, 2)));
        assert_eq!(cached.cached_tiles(), 2);
    }

    #[test]
    fn test_static_ignores_later_mutation() {
        let mut map = MapState::new(&MapSettings {
            size: 16,
            ..MapSettings::default()
        })
        .unwrap();
        let hills = map.create_tile_class("hills").unwrap();
        let cached = StaticConstraint::new(&map, AvoidTileClassConstraint::new(hills, 1.0));

        map.tile_class_mut(hills).add(Coord::new(4, 4));

        // Never queried before the mutation, still answers for the snapshot
        assert!(cached.allows(&map, Coord::new(4, 4)));
        assert!(!AvoidTileClassConstraint::new(hills, 1.0).allows(&map, Coord::new(4, 4)));
    }
}
