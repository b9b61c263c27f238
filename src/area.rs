//! Areas: the tile sets produced by placers and consumed by painters.

use std::collections::HashSet;
use std::sync::Arc;

use crate::map::Coord;

/// Identifier assigned to an area when it is created on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId(pub u32);

#[derive(Debug)]
struct AreaData {
    id: AreaId,
    points: Vec<Coord>,
    members: HashSet<Coord>,
}

/// An ordered, immutable set of tiles.
///
/// Clones share the same storage, so an area can be handed to several
/// constraints and painters without copying its points.
#[derive(Debug, Clone)]
pub struct Area {
    data: Arc<AreaData>,
}

impl Area {
    /// Build an area from placer output. Duplicate points keep their first
    /// position in the order.
    #[must_use]
    pub fn new(id: AreaId, points: Vec<Coord>) -> Self {
        let mut members = HashSet::with_capacity(points.len());
        let points = points.into_iter().filter(|p| members.insert(*p)).collect();
        Self {
            data: Arc::new(AreaData { id, points, members }),
        }
    }

    /// Identifier of the area.
    #[must_use]
    pub fn id(&self) -> AreaId {
        self.data.id
    }

    /// Tiles in placement order.
    #[must_use]
    pub fn points(&self) -> &[Coord] {
        &self.data.points
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.points.len()
    }

    /// Whether the area has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.points.is_empty()
    }

    /// Whether the tile belongs to the area.
    #[must_use]
    pub fn contains(&self, c: Coord) -> bool {
        self.data.members.contains(&c)
    }

    /// Inclusive bounding box `(min, max)`, or `None` for an empty area.
    #[must_use]
    pub fn bounds(&self) -> Option<(Coord, Coord)> {
        let first = *self.data.points.first()?;
        Some(self.data.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Coord::new(lo.x.min(p.x), lo.z.min(p.z)),
                Coord::new(hi.x.max(p.x), hi.z.max(p.z)),
            )
        }))
    }
}
