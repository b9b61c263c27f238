//! The map grid shared by constraints, placers and painters.
//!
//! A map of side `N` has `N × N` tiles and an `(N + 1) × (N + 1)` heightmap;
//! tile `(x, z)` is bounded by the vertices `(x, z)` to `(x + 1, z + 1)`.

// Grid sizes are validated to fit comfortably in i32/usize
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MapGenError, MapGenResult};
use crate::rng::MapRng;
use crate::tile_class::{TileClass, TileClassId};

/// Smallest accepted map side.
pub const MIN_MAP_SIZE: u32 = 16;
/// Largest accepted map side.
pub const MAX_MAP_SIZE: u32 = 1024;

/// A tile or heightmap-vertex coordinate.
///
/// Signed so that windows and rasterized shapes can reach past the map edge;
/// storage access always goes through a bounds check.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub z: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Offset by `(dx, dz)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// The four edge-adjacent neighbours (left, right, up, down).
    #[must_use]
    pub const fn neighbors4(self) -> [Coord; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// The eight neighbours sharing an edge or a corner.
    #[must_use]
    pub const fn neighbors8(self) -> [Coord; 8] {
        [
            self.offset(-1, -1),
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(-1, 1),
            self.offset(0, 1),
            self.offset(1, 1),
        ]
    }

    /// Squared euclidean distance.
    #[must_use]
    pub fn distance_squared(self, other: Coord) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dz = i64::from(self.z - other.z);
        dx * dx + dz * dz
    }
}

/// Outline of the playable map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapShape {
    /// The whole square grid is playable.
    #[default]
    Square,
    /// Only the inscribed disk is playable.
    Circular,
}

/// Parameters fixed for a whole generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Tile side length `N`.
    pub size: u32,
    /// Playable outline.
    pub shape: MapShape,
    /// Texture every tile starts with.
    pub base_texture: String,
    /// Height every vertex starts with.
    pub base_height: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            size: 128,
            shape: MapShape::Square,
            base_texture: "grass".to_string(),
            base_height: 0.0,
        }
    }
}

/// Interned texture name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u16);

/// An object committed to the map by object placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    /// Template name understood by the host engine.
    pub template: String,
    /// Owning player, 0 for gaia.
    pub player: u8,
    /// Position in tile units (fractional).
    pub x: f64,
    /// Position in tile units (fractional).
    pub z: f64,
    /// Facing in radians.
    pub angle: f64,
}

impl PlacedObject {
    /// Tile containing the object.
    #[must_use]
    pub fn tile(&self) -> Coord {
        Coord::new(self.x.floor() as i32, self.z.floor() as i32)
    }
}

/// Terrain, elevation, passability and classification grids.
#[derive(Debug, Clone)]
pub struct MapState {
    size: i32,
    shape: MapShape,
    palette: Vec<String>,
    palette_index: HashMap<String, TextureId>,
    textures: Vec<TextureId>,
    heights: Vec<f64>,
    passable: Vec<bool>,
    classes: Vec<TileClass>,
    objects: Vec<PlacedObject>,
    next_area_id: u32,
}

impl MapState {
    /// Create a map filled with the base texture at the base height.
    ///
    /// # Errors
    ///
    /// Returns [`MapGenError::InvalidMapSize`] if the size is out of range.
    pub fn new(settings: &MapSettings) -> MapGenResult<Self> {
        if !(MIN_MAP_SIZE..=MAX_MAP_SIZE).contains(&settings.size) {
            return Err(MapGenError::InvalidMapSize {
                size: settings.size,
                min: MIN_MAP_SIZE,
                max: MAX_MAP_SIZE,
            });
        }
        if !settings.base_height.is_finite() {
            return Err(MapGenError::invalid("base height", "must be finite"));
        }

        let size = settings.size as usize;
        let mut state = Self {
            size: settings.size as i32,
            shape: settings.shape,
            palette: Vec::new(),
            palette_index: HashMap::new(),
            textures: Vec::new(),
            heights: vec![settings.base_height; (size + 1) * (size + 1)],
            passable: vec![true; size * size],
            classes: Vec::new(),
            objects: Vec::new(),
            next_area_id: 1,
        };
        let base = state.intern_texture(&settings.base_texture);
        state.textures = vec![base; size * size];
        Ok(state)
    }

    /// Tile side length.
    #[must_use]
    pub const fn size(&self) -> i32 {
        self.size
    }

    /// Playable outline.
    #[must_use]
    pub const fn shape(&self) -> MapShape {
        self.shape
    }

    /// Center of the map in tile units.
    #[must_use]
    pub fn center(&self) -> f64 {
        f64::from(self.size) / 2.0
    }

    /// Whether `c` names a tile of the grid.
    #[must_use]
    pub const fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.z >= 0 && c.x < self.size && c.z < self.size
    }

    /// Whether `c` names a heightmap vertex.
    #[must_use]
    pub const fn vertex_in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.z >= 0 && c.x <= self.size && c.z <= self.size
    }

    /// Whether the tile lies inside the playable outline.
    #[must_use]
    pub fn in_shape(&self, c: Coord) -> bool {
        if !self.in_bounds(c) {
            return false;
        }
        match self.shape {
            MapShape::Square => true,
            MapShape::Circular => {
                let half = self.center();
                let dx = f64::from(c.x) + 0.5 - half;
                let dz = f64::from(c.z) + 0.5 - half;
                dx * dx + dz * dz <= half * half
            }
        }
    }

    fn tile_index(&self, c: Coord) -> Option<usize> {
        if self.in_bounds(c) {
            Some(c.z as usize * self.size as usize + c.x as usize)
        } else {
            None
        }
    }

    fn vertex_index(&self, c: Coord) -> Option<usize> {
        if self.vertex_in_bounds(c) {
            Some(c.z as usize * (self.size as usize + 1) + c.x as usize)
        } else {
            None
        }
    }

    /// Intern a texture name, returning its id.
    pub fn intern_texture(&mut self, name: &str) -> TextureId {
        if let Some(&id) = self.palette_index.get(name) {
            return id;
        }
        let id = TextureId(self.palette.len() as u16);
        self.palette.push(name.to_string());
        self.palette_index.insert(name.to_string(), id);
        id
    }

    /// Look up an already interned texture.
    #[must_use]
    pub fn texture_id(&self, name: &str) -> Option<TextureId> {
        self.palette_index.get(name).copied()
    }

    /// Name of an interned texture.
    #[must_use]
    pub fn texture_name(&self, id: TextureId) -> Option<&str> {
        self.palette.get(usize::from(id.0)).map(String::as_str)
    }

    /// All interned texture names, indexed by [`TextureId`].
    #[must_use]
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    /// Texture of a tile.
    #[must_use]
    pub fn texture(&self, c: Coord) -> Option<TextureId> {
        self.tile_index(c).map(|idx| self.textures[idx])
    }

    /// Per-tile textures in row-major order.
    #[must_use]
    pub fn textures(&self) -> &[TextureId] {
        &self.textures
    }

    /// Set the texture of a tile. Returns `false` if out of bounds.
    pub fn set_texture(&mut self, c: Coord, id: TextureId) -> bool {
        if let Some(idx) = self.tile_index(c) {
            self.textures[idx] = id;
            true
        } else {
            false
        }
    }

    /// Height of a vertex.
    #[must_use]
    pub fn height(&self, v: Coord) -> Option<f64> {
        self.vertex_index(v).map(|idx| self.heights[idx])
    }

    /// Per-vertex heights in row-major order.
    #[must_use]
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Set the height of a vertex. Returns `false` if out of bounds.
    pub fn set_height(&mut self, v: Coord, height: f64) -> bool {
        if let Some(idx) = self.vertex_index(v) {
            self.heights[idx] = height;
            true
        } else {
            false
        }
    }

    fn corner_heights(&self, c: Coord) -> Option<[f64; 4]> {
        if !self.in_bounds(c) {
            return None;
        }
        let h = |dx, dz| self.height(c.offset(dx, dz)).unwrap_or(0.0);
        Some([h(0, 0), h(1, 0), h(0, 1), h(1, 1)])
    }

    /// Mean height of the four corners of a tile.
    #[must_use]
    pub fn tile_height(&self, c: Coord) -> Option<f64> {
        self.corner_heights(c).map(|h| h.iter().sum::<f64>() / 4.0)
    }

    /// Height difference across a tile's four corners.
    #[must_use]
    pub fn slope(&self, c: Coord) -> Option<f64> {
        self.corner_heights(c).map(|h| {
            let max = h.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = h.iter().copied().fold(f64::INFINITY, f64::min);
            max - min
        })
    }

    /// Whether the host marked the tile passable. Out-of-bounds tiles are not.
    #[must_use]
    pub fn is_passable(&self, c: Coord) -> bool {
        self.tile_index(c).is_some_and(|idx| self.passable[idx])
    }

    /// Overwrite the host passability of a tile.
    pub fn set_passable(&mut self, c: Coord, passable: bool) -> bool {
        if let Some(idx) = self.tile_index(c) {
            self.passable[idx] = passable;
            true
        } else {
            false
        }
    }

    /// Register a new, empty tile class.
    ///
    /// # Errors
    ///
    /// Returns [`MapGenError::DuplicateTileClass`] if the name is taken.
    pub fn create_tile_class(&mut self, name: &str) -> MapGenResult<TileClassId> {
        if self.tile_class_id(name).is_some() {
            return Err(MapGenError::DuplicateTileClass(name.to_string()));
        }
        let id = TileClassId(self.classes.len());
        self.classes.push(TileClass::new(name, self.size));
        Ok(id)
    }

    /// Look up a tile class by name.
    #[must_use]
    pub fn tile_class_id(&self, name: &str) -> Option<TileClassId> {
        self.classes
            .iter()
            .position(|class| class.name() == name)
            .map(TileClassId)
    }

    /// A registered tile class.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this map.
    #[must_use]
    pub fn tile_class(&self, id: TileClassId) -> &TileClass {
        &self.classes[id.0]
    }

    /// A registered tile class, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this map.
    pub fn tile_class_mut(&mut self, id: TileClassId) -> &mut TileClass {
        &mut self.classes[id.0]
    }

    /// All registered tile classes.
    #[must_use]
    pub fn tile_classes(&self) -> &[TileClass] {
        &self.classes
    }

    /// Objects committed so far.
    #[must_use]
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    /// Commit an object.
    pub fn add_object(&mut self, object: PlacedObject) {
        self.objects.push(object);
    }

    pub(crate) fn next_area_id(&mut self) -> u32 {
        let id = self.next_area_id;
        self.next_area_id += 1;
        id
    }
}

/// Everything one generation run mutates: the grids plus the seeded RNG.
#[derive(Debug, Clone)]
pub struct MapContext {
    /// Grid state.
    pub state: MapState,
    /// Random stream for this run.
    pub rng: MapRng,
}

impl MapContext {
    /// Create a fresh context.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid.
    pub fn new(settings: &MapSettings, seed: u64) -> MapGenResult<Self> {
        Ok(Self {
            state: MapState::new(settings)?,
            rng: MapRng::new(seed),
        })
    }

    /// Draw a random tile inside the playable outline.
    pub fn random_anchor(&mut self) -> Coord {
        let size = self.state.size();
        match self.state.shape() {
            MapShape::Square => Coord::new(
                self.rng.rand_int_exclusive(0, size),
                self.rng.rand_int_exclusive(0, size),
            ),
            MapShape::Circular => {
                let half = self.state.center();
                let r = half * self.rng.unit().sqrt();
                let theta = self.rng.rand_angle();
                let x = (half + r * theta.cos()).floor() as i32;
                let z = (half + r * theta.sin()).floor() as i32;
                Coord::new(x.clamp(0, size - 1), z.clamp(0, size - 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(size: u32) -> MapSettings {
        MapSettings {
            size,
            ..MapSettings::default()
        }
    }

    #[test]
    fn test_map_creation() {
        let map = MapState::new(&settings(32)).unwrap();
        assert_eq!(map.size(), 32);
        assert_eq!(map.textures().len(), 32 * 32);
        assert_eq!(map.heights().len(), 33 * 33);
        assert_eq!(map.texture_name(map.texture(Coord::new(3, 3)).unwrap()), Some("grass"));
    }

    #[test]
    fn test_map_invalid_size() {
        assert!(matches!(
            MapState::new(&settings(4)),
            Err(MapGenError::InvalidMapSize { size: 4, .. })
        ));
        assert!(MapState::new(&settings(4096)).is_err());
    }

    #[test]
    fn test_map_bounds() {
        let map = MapState::new(&settings(16)).unwrap();
        assert!(map.in_bounds(Coord::new(0, 0)));
        assert!(map.in_bounds(Coord::new(15, 15)));
        assert!(!map.in_bounds(Coord::new(16, 0)));
        assert!(!map.in_bounds(Coord::new(0, -1)));
        assert!(map.vertex_in_bounds(Coord::new(16, 16)));
        assert!(!map.vertex_in_bounds(Coord::new(17, 16)));
    }

    #[test]
    fn test_texture_interning() {
        let mut map = MapState::new(&settings(16)).unwrap();
        let sand = map.intern_texture("sand");
        assert_eq!(map.intern_texture("sand"), sand);
        assert_eq!(map.texture_id("sand"), Some(sand));
        assert!(map.set_texture(Coord::new(1, 2), sand));
        assert_eq!(map.texture(Coord::new(1, 2)), Some(sand));
        assert!(!map.set_texture(Coord::new(-1, 2), sand));
    }

    #[test]
    fn test_tile_height_and_slope() {
        let mut map = MapState::new(&settings(16)).unwrap();
        map.set_height(Coord::new(3, 3), 4.0);
        let tile = Coord::new(3, 3);
        assert!((map.tile_height(tile).unwrap() - 1.0).abs() < 1e-9);
        assert!((map.slope(tile).unwrap() - 4.0).abs() < 1e-9);
        assert!((map.slope(Coord::new(10, 10)).unwrap()).abs() < 1e-9);
        assert_eq!(map.slope(Coord::new(16, 0)), None);
    }

    #[test]
    fn test_duplicate_tile_class() {
        let mut map = MapState::new(&settings(16)).unwrap();
        let water = map.create_tile_class("water").unwrap();
        assert_eq!(map.tile_class_id("water"), Some(water));
        assert!(matches!(
            map.create_tile_class("water"),
            Err(MapGenError::DuplicateTileClass(_))
        ));
    }

    #[test]
    fn test_circular_anchor_inside_disk() {
        let mut ctx = MapContext::new(
            &MapSettings {
                size: 64,
                shape: MapShape::Circular,
                ..MapSettings::default()
            },
            3,
        )
        .unwrap();
        for _ in 0..500 {
            let c = ctx.random_anchor();
            assert!(ctx.state.in_bounds(c));
            let dx = f64::from(c.x) + 0.5 - 32.0;
            let dz = f64::from(c.z) + 0.5 - 32.0;
            assert!(dx * dx + dz * dz <= 34.0 * 34.0);
        }
    }
}
