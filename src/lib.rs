// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! rmgen: constraint, painter and placer toolkit for random RTS maps.
//!
//! A map is built by repeatedly choosing tiles and changing them:
//! - **placers** compute candidate areas (blobs, rectangles, winding paths)
//! - **constraints** decide which tiles a placer may use
//! - **painters** change texture, elevation and tile classes over an area
//! - **batch** placement retries placers at random anchors
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Map scripts (JSON) / CLI          │
//! ├─────────────────────────────────────┤
//! │   Batch placement (retry loop)      │
//! ├─────────────────────────────────────┤
//! │  Placers │ Constraints │ Painters   │
//! ├─────────────────────────────────────┤
//! │  MapState + TileClass + MapRng      │
//! └─────────────────────────────────────┘
//! ```
//!
//! Everything a run mutates lives in one [`MapContext`], so a map is fully
//! determined by its script and seed.

pub mod area;
pub mod batch;
pub mod constraint;
pub mod error;
pub mod export;
pub mod map;
pub mod painter;
pub mod placer;
pub mod rng;
pub mod script;
pub mod tile_class;

pub use area::{Area, AreaId};
pub use batch::{
    BatchOutcome, DEFAULT_RETRY_FACTOR, create_area, create_areas, create_object_group,
    create_object_groups,
};
pub use constraint::{AndConstraint, Constraint, NullConstraint};
pub use error::{MapGenError, MapGenResult};
pub use map::{Coord, MapContext, MapSettings, MapShape, MapState, PlacedObject};
pub use painter::AreaPainter;
pub use placer::{AreaPlacer, CenteredPlacer, ObjectGroupPlacer};
pub use rng::MapRng;
pub use script::{MapScript, ScriptRun, run_script};
pub use tile_class::{TileClass, TileClassId};
