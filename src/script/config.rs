//! Serializable descriptions of placers, painters and constraints.
//!
//! Each description is a closed enum tagged by `type`. Building one resolves
//! class names and area labels against the running map and validates every
//! parameter, so a mistake in a script surfaces as a [`MapGenError`] before
//! the step that uses it places anything.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::area::Area;
use crate::constraint::{
    AdjacentToAreaConstraint, AndConstraint, AvoidAreasConstraint, AvoidTextureConstraint,
    AvoidTileClassConstraint, BorderTileClassConstraint, Constraint, HeightConstraint,
    NearTileClassConstraint, NullConstraint, PassableMapAreaConstraint, SlopeConstraint,
    StaticConstraint, StayAreasConstraint, StayInTileClassConstraint, StayTextureConstraint,
};
use crate::error::{MapGenError, MapGenResult};
use crate::map::{Coord, MapState};
use crate::painter::{
    AreaPainter, ElevationPainter, LayeredPainter, MultiPainter, SmoothElevationPainter, Terrain,
    TerrainPainter, TileClassPainter, TileClassUnPainter,
};
use crate::placer::{CenteredPlacer, ClumpPlacer, PathPlacer, RectPlacer, SimpleGroup, SimpleObject};
use crate::tile_class::TileClassId;

/// Areas produced by earlier steps, by label.
pub(crate) type Labels = HashMap<String, Vec<Area>>;

fn class_id(state: &MapState, name: &str) -> MapGenResult<TileClassId> {
    state
        .tile_class_id(name)
        .ok_or_else(|| MapGenError::UnknownTileClass(name.to_string()))
}

fn labelled(labels: &Labels, names: &[String]) -> MapGenResult<Vec<Area>> {
    let mut areas = Vec::new();
    for name in names {
        let found = labels
            .get(name)
            .ok_or_else(|| MapGenError::UnknownArea(name.clone()))?;
        areas.extend(found.iter().cloned());
    }
    Ok(areas)
}

const fn default_half() -> f64 {
    0.5
}

const fn default_one() -> f64 {
    1.0
}

const fn default_count() -> u32 {
    1
}

/// Where a batch places its areas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlacerConfig {
    /// Irregular blob, see [`ClumpPlacer`].
    Clump {
        /// Approximate tile count.
        size: f64,
        /// 1 for a disk, 0 for the most ragged outline.
        #[serde(default = "default_half")]
        coherence: f64,
        /// Fewer outline control points as this grows.
        #[serde(default = "default_half")]
        smoothness: f64,
        /// Rejected tiles tolerated per tile of size.
        #[serde(default)]
        fail_fraction: f64,
    },
    /// Axis-aligned rectangle, see [`RectPlacer`].
    Rect {
        /// Tiles along x.
        width: i32,
        /// Tiles along z.
        height: i32,
    },
}

impl PlacerConfig {
    /// Build the placer; the batch driver supplies its anchor.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range parameters.
    pub fn build(&self) -> MapGenResult<Box<dyn CenteredPlacer>> {
        Ok(match *self {
            Self::Clump {
                size,
                coherence,
                smoothness,
                fail_fraction,
            } => Box::new(ClumpPlacer::new(
                size,
                coherence,
                smoothness,
                fail_fraction,
                Coord::default(),
            )?),
            Self::Rect { width, height } => {
                if width < 1 || height < 1 {
                    return Err(MapGenError::invalid(
                        "rect dimensions",
                        format!("must be at least 1x1, got {width}x{height}"),
                    ));
                }
                Box::new(RectPlacer::centered(Coord::default(), width, height))
            }
        })
    }
}

/// A winding path between two fixed tiles, see [`PathPlacer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// First endpoint.
    pub start: Coord,
    /// Second endpoint.
    pub end: Coord,
    /// Ribbon width in tiles.
    pub width: f64,
    /// Control points per 4 tiles.
    #[serde(default)]
    pub waviness: f64,
    /// Interpolation steps per control point, per 4 tiles.
    #[serde(default = "default_one")]
    pub smoothness: f64,
    /// Sideways amplitude per 4 tiles.
    #[serde(default)]
    pub offset: f64,
    /// Width lost by the far end.
    #[serde(default)]
    pub taper: f64,
    /// Rejected tiles tolerated per tile of width and length.
    #[serde(default)]
    pub fail_fraction: f64,
}

impl PathConfig {
    /// Build the placer.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range parameters.
    pub fn build(&self) -> MapGenResult<PathPlacer> {
        PathPlacer::new(
            self.start,
            self.end,
            self.width,
            self.waviness,
            self.smoothness,
            self.offset,
            self.taper,
            self.fail_fraction,
        )
    }
}

/// What happens to a placed area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PainterConfig {
    /// Set the texture of every tile.
    Terrain {
        /// Texture name, or a list to draw from per tile.
        terrain: Terrain,
    },
    /// Concentric texture layers from the border inwards.
    Layered {
        /// One more terrain than widths.
        terrains: Vec<Terrain>,
        /// Layer widths in tiles.
        widths: Vec<u32>,
    },
    /// Flat elevation on every tile corner.
    Elevation {
        /// Target height.
        elevation: f64,
    },
    /// Blended elevation change.
    SmoothElevation {
        /// `set` or `modify`.
        mode: String,
        /// Target height or offset.
        elevation: f64,
        /// Border distance over which the change fades in.
        #[serde(default)]
        blend_radius: f64,
        /// Jitter amplitude.
        #[serde(default)]
        random_elevation: f64,
        /// Working margin around the area.
        #[serde(default)]
        brush_size: Option<i32>,
    },
    /// Tag tiles with a class.
    TileClass {
        /// Class name.
        class: String,
    },
    /// Remove tiles from a class.
    UntileClass {
        /// Class name.
        class: String,
    },
    /// Several painters in order.
    Multi {
        /// Painters to apply.
        painters: Vec<PainterConfig>,
    },
}

impl PainterConfig {
    /// Build the painter.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown class names, unknown elevation modes or
    /// out-of-range parameters.
    pub fn build(&self, state: &MapState) -> MapGenResult<Box<dyn AreaPainter>> {
        Ok(match self {
            Self::Terrain { terrain } => Box::new(TerrainPainter::new(terrain.clone())),
            Self::Layered { terrains, widths } => {
                Box::new(LayeredPainter::new(terrains.clone(), widths.clone())?)
            }
            Self::Elevation { elevation } => Box::new(ElevationPainter::new(*elevation)),
            Self::SmoothElevation {
                mode,
                elevation,
                blend_radius,
                random_elevation,
                brush_size,
            } => {
                let painter = SmoothElevationPainter::from_mode_name(
                    mode,
                    *elevation,
                    *blend_radius,
                    *random_elevation,
                )?;
                match brush_size {
                    Some(size) => Box::new(painter.with_brush_size(*size)?),
                    None => Box::new(painter),
                }
            }
            Self::TileClass { class } => Box::new(TileClassPainter::new(class_id(state, class)?)),
            Self::UntileClass { class } => {
                Box::new(TileClassUnPainter::new(class_id(state, class)?))
            }
            Self::Multi { painters } => Box::new(MultiPainter::new(
                painters
                    .iter()
                    .map(|p| p.build(state))
                    .collect::<MapGenResult<_>>()?,
            )),
        })
    }
}

/// Which tiles a placement may use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintConfig {
    /// Anything goes.
    #[default]
    Null,
    /// Every child must allow the tile.
    And {
        /// Children, evaluated in order.
        constraints: Vec<ConstraintConfig>,
    },
    /// No class member within `distance`.
    AvoidClass {
        /// Class name.
        class: String,
        /// Radius in tiles.
        distance: f64,
    },
    /// Only members, with no non-member within `distance`.
    StayClass {
        /// Class name.
        class: String,
        /// Radius in tiles.
        distance: f64,
    },
    /// At least one member within `distance`.
    NearClass {
        /// Class name.
        class: String,
        /// Radius in tiles.
        distance: f64,
    },
    /// On the class's transition band.
    BorderClass {
        /// Class name.
        class: String,
        /// Radius searched for non-members.
        inside: f64,
        /// Radius searched for members.
        outside: f64,
    },
    /// Tiles painted with a texture.
    StayTexture {
        /// Texture name.
        texture: String,
    },
    /// Tiles not painted with a texture.
    AvoidTexture {
        /// Texture name.
        texture: String,
    },
    /// Tile height within bounds; a missing bound is open.
    Height {
        /// Lowest allowed height.
        #[serde(default)]
        min: Option<f64>,
        /// Highest allowed height.
        #[serde(default)]
        max: Option<f64>,
    },
    /// Tile slope within bounds.
    Slope {
        /// Lowest allowed slope.
        #[serde(default)]
        min: f64,
        /// Highest allowed slope.
        max: f64,
    },
    /// Host-passable tiles.
    Passable,
    /// Inside one of the labelled areas.
    StayAreas {
        /// Labels of earlier steps.
        areas: Vec<String>,
    },
    /// Outside all labelled areas.
    AvoidAreas {
        /// Labels of earlier steps.
        areas: Vec<String>,
    },
    /// Outside the labelled areas but touching one.
    AdjacentToAreas {
        /// Labels of earlier steps.
        areas: Vec<String>,
    },
    /// `inner` evaluated once per tile against the map as it is now.
    Static {
        /// Constraint to cache.
        inner: Box<ConstraintConfig>,
    },
}

impl ConstraintConfig {
    /// Build the constraint against the current map.
    ///
    /// Texture names are interned, so a constraint may mention a texture
    /// nothing has been painted with yet.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown class names or area labels.
    pub(crate) fn build(
        &self,
        state: &mut MapState,
        labels: &Labels,
    ) -> MapGenResult<Box<dyn Constraint>> {
        Ok(match self {
            Self::Null => Box::new(NullConstraint),
            Self::And { constraints } => Box::new(AndConstraint::new(
                constraints
                    .iter()
                    .map(|c| c.build(state, labels))
                    .collect::<MapGenResult<_>>()?,
            )),
            Self::AvoidClass { class, distance } => Box::new(AvoidTileClassConstraint::new(
                class_id(state, class)?,
                *distance,
            )),
            Self::StayClass { class, distance } => Box::new(StayInTileClassConstraint::new(
                class_id(state, class)?,
                *distance,
            )),
            Self::NearClass { class, distance } => Box::new(NearTileClassConstraint::new(
                class_id(state, class)?,
                *distance,
            )),
            Self::BorderClass {
                class,
                inside,
                outside,
            } => Box::new(BorderTileClassConstraint::new(
                class_id(state, class)?,
                *inside,
                *outside,
            )),
            Self::StayTexture { texture } => {
                Box::new(StayTextureConstraint::new(state.intern_texture(texture)))
            }
            Self::AvoidTexture { texture } => {
                Box::new(AvoidTextureConstraint::new(state.intern_texture(texture)))
            }
            Self::Height { min, max } => Box::new(HeightConstraint::new(
                min.unwrap_or(f64::NEG_INFINITY),
                max.unwrap_or(f64::INFINITY),
            )),
            Self::Slope { min, max } => Box::new(SlopeConstraint::new(*min, *max)),
            Self::Passable => Box::new(PassableMapAreaConstraint),
            Self::StayAreas { areas } => Box::new(StayAreasConstraint::new(labelled(labels, areas)?)),
            Self::AvoidAreas { areas } => {
                Box::new(AvoidAreasConstraint::new(labelled(labels, areas)?))
            }
            Self::AdjacentToAreas { areas } => {
                Box::new(AdjacentToAreaConstraint::new(labelled(labels, areas)?))
            }
            Self::Static { inner } => {
                let inner = inner.build(state, labels)?;
                Box::new(StaticConstraint::from_snapshot(
                    Arc::new(state.clone()),
                    inner,
                ))
            }
        })
    }
}

/// One object template within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    /// Template name understood by the host engine.
    pub template: String,
    /// Fewest copies.
    #[serde(default = "default_count")]
    pub min_count: u32,
    /// Most copies.
    #[serde(default = "default_count")]
    pub max_count: u32,
    /// Closest distance from the anchor.
    #[serde(default)]
    pub min_distance: f64,
    /// Farthest distance from the anchor.
    #[serde(default)]
    pub max_distance: f64,
    /// Smallest facing.
    #[serde(default)]
    pub min_angle: f64,
    /// Largest facing.
    #[serde(default)]
    pub max_angle: f64,
}

/// Objects placed together around one anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectGroupConfig {
    /// Templates in placement order.
    pub objects: Vec<ObjectConfig>,
    /// Keep the group's objects a tile apart.
    #[serde(default)]
    pub avoid_self: bool,
    /// Class tagged on the committed object tiles.
    #[serde(default)]
    pub tile_class: Option<String>,
}

impl ObjectGroupConfig {
    /// Build the group; the batch driver supplies its anchor.
    ///
    /// # Errors
    ///
    /// Returns an error for inverted ranges or an unknown class name.
    pub fn build(&self, state: &MapState) -> MapGenResult<SimpleGroup> {
        let objects = self
            .objects
            .iter()
            .map(|o| {
                SimpleObject::new(
                    o.template.clone(),
                    o.min_count,
                    o.max_count,
                    o.min_distance,
                    o.max_distance,
                    o.min_angle,
                    o.max_angle,
                )
            })
            .collect::<MapGenResult<_>>()?;
        let tile_class = self
            .tile_class
            .as_deref()
            .map(|name| class_id(state, name))
            .transpose()?;
        Ok(SimpleGroup::new(
            objects,
            self.avoid_self,
            tile_class,
            Coord::default(),
        ))
    }
}
