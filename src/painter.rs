//! Painters mutate the map over a previously placed area.
//!
//! An area may be painted several times (texture, then elevation, then
//! class tags); painters never decide where an area goes.

mod distance;
mod layered;
mod smooth_elevation;

pub use layered::LayeredPainter;
pub use smooth_elevation::{DEFAULT_BRUSH_SIZE, ElevationMode, SmoothElevationPainter};

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::area::Area;
use crate::map::{Coord, MapContext, MapState, TextureId};
use crate::tile_class::TileClassId;

/// Mutates the map over an area.
pub trait AreaPainter: Debug {
    /// Apply the painter to every tile of `area`.
    fn paint(&self, ctx: &mut MapContext, area: &Area);
}

impl<P: AreaPainter + ?Sized> AreaPainter for Box<P> {
    fn paint(&self, ctx: &mut MapContext, area: &Area) {
        (**self).paint(ctx, area);
    }
}

impl<P: AreaPainter + ?Sized> AreaPainter for &P {
    fn paint(&self, ctx: &mut MapContext, area: &Area) {
        (**self).paint(ctx, area);
    }
}

/// A texture choice for painted tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Terrain {
    /// Always the same texture.
    Simple(String),
    /// A texture drawn uniformly per tile.
    Random(Vec<String>),
}

impl Terrain {
    /// Intern the textures once per paint call.
    pub(crate) fn resolve(&self, state: &mut MapState) -> Vec<TextureId> {
        match self {
            Self::Simple(name) => vec![state.intern_texture(name)],
            Self::Random(names) => names.iter().map(|n| state.intern_texture(n)).collect(),
        }
    }
}

impl From<&str> for Terrain {
    fn from(name: &str) -> Self {
        Self::Simple(name.to_string())
    }
}

/// Paint one resolved terrain on a tile.
pub(crate) fn place_terrain(ctx: &mut MapContext, textures: &[TextureId], at: Coord) {
    if let Some(&texture) = ctx.rng.pick(textures) {
        ctx.state.set_texture(at, texture);
    }
}

/// Sets the texture of every area tile.
#[derive(Debug, Clone)]
pub struct TerrainPainter {
    terrain: Terrain,
}

impl TerrainPainter {
    /// Create the painter.
    #[must_use]
    pub fn new(terrain: impl Into<Terrain>) -> Self {
        Self {
            terrain: terrain.into(),
        }
    }
}

impl AreaPainter for TerrainPainter {
    fn paint(&self, ctx: &mut MapContext, area: &Area) {
        let textures = self.terrain.resolve(&mut ctx.state);
        for &point in area.points() {
            place_terrain(ctx, &textures, point);
        }
    }
}

/// Sets the four corner vertices of every area tile to a fixed elevation.
#[derive(Debug, Clone, Copy)]
pub struct ElevationPainter {
    elevation: f64,
}

impl ElevationPainter {
    /// Create the painter.
    #[must_use]
    pub const fn new(elevation: f64) -> Self {
        Self { elevation }
    }
}

impl AreaPainter for ElevationPainter {
    fn paint(&self, ctx: &mut MapContext, area: &Area) {
        for &point in area.points() {
            for (dx, dz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                ctx.state.set_height(point.offset(dx, dz), self.elevation);
            }
        }
    }
}

/// Adds every area tile to a tile class.
#[derive(Debug, Clone, Copy)]
pub struct TileClassPainter {
    class: TileClassId,
}

impl TileClassPainter {
    /// Create the painter.
    #[must_use]
    pub const fn new(class: TileClassId) -> Self {
        Self { class }
    }
}

impl AreaPainter for TileClassPainter {
    fn paint(&self, ctx: &mut MapContext, area: &Area) {
        let class = ctx.state.tile_class_mut(self.class);
        for &point in area.points() {
            class.add(point);
        }
    }
}

/// Removes every area tile from a tile class.
#[derive(Debug, Clone, Copy)]
pub struct TileClassUnPainter {
    class: TileClassId,
}

impl TileClassUnPainter {
    /// Create the painter.
    #[must_use]
    pub const fn new(class: TileClassId) -> Self {
        Self { class }
    }
}

impl AreaPainter for TileClassUnPainter {
    fn paint(&self, ctx: &mut MapContext, area: &Area) {
        let class = ctx.state.tile_class_mut(self.class);
        for &point in area.points() {
            class.remove(point);
        }
    }
}

/// Applies several painters in order.
#[derive(Debug, Default)]
pub struct MultiPainter {
    painters: Vec<Box<dyn AreaPainter>>,
}

impl MultiPainter {
    /// Create the painter.
    #[must_use]
    pub fn new(painters: Vec<Box<dyn AreaPainter>>) -> Self {
        Self { painters }
    }

    /// Append one more painter.
    #[must_use]
    pub fn with(mut self, painter: impl AreaPainter + 'static) -> Self {
        self.painters.push(Box::new(painter));
        self
    }
}

impl AreaPainter for MultiPainter {
    fn paint(&self, ctx: &mut MapContext, area: &Area) {
        for painter in &self.painters {
            painter.paint(ctx, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaId;
    use crate::map::MapSettings;

    fn ctx() -> MapContext {
        MapContext::new(
            &MapSettings {
                size: 16,
                ..MapSettings::default()
            },
            1,
        )
        .unwrap()
    }

    fn area() -> Area {
        Area::new(AreaId(1), vec![Coord::new(2, 2), Coord::new(3, 2), Coord::new(3, 3)])
    }

    #[test]
    fn test_terrain_painter() {
        let mut ctx = ctx();
        TerrainPainter::new("snow").paint(&mut ctx, &area());
        let snow = ctx.state.texture_id("snow").unwrap();
        assert_eq!(ctx.state.texture(Coord::new(3, 3)), Some(snow));
        assert_ne!(ctx.state.texture(Coord::new(4, 4)), Some(snow));
    }

    #[test]
    fn test_random_terrain_uses_listed_textures() {
        let mut ctx = ctx();
        let terrain = Terrain::Random(vec!["dirt".to_string(), "mud".to_string()]);
        TerrainPainter::new(terrain).paint(&mut ctx, &area());
        let allowed = [ctx.state.texture_id("dirt"), ctx.state.texture_id("mud")];
        for &p in area().points() {
            assert!(allowed.contains(&ctx.state.texture(p)));
        }
    }

    #[test]
    fn test_elevation_painter_sets_corners() {
        let mut ctx = ctx();
        ElevationPainter::new(4.5).paint(&mut ctx, &area());
        for v in [Coord::new(2, 2), Coord::new(4, 3), Coord::new(4, 4)] {
            assert!((ctx.state.height(v).unwrap() - 4.5).abs() < 1e-12);
        }
        assert!(ctx.state.height(Coord::new(6, 6)).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_tile_class_paint_and_unpaint() {
        let mut ctx = ctx();
        let rocks = ctx.state.create_tile_class("rocks").unwrap();
        MultiPainter::default()
            .with(TileClassPainter::new(rocks))
            .with(TerrainPainter::new("stone"))
            .paint(&mut ctx, &area());
        assert_eq!(ctx.state.tile_class(rocks).len(), 3);

        TileClassUnPainter::new(rocks).paint(&mut ctx, &area());
        assert!(ctx.state.tile_class(rocks).is_empty());
    }
}
