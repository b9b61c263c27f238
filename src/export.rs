//! JSON snapshot of a generated map.
//!
//! This is a neutral interchange document, not a host engine map file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MapGenResult;
use crate::map::{MapShape, MapState, PlacedObject};

/// Member count of one tile class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    /// Class name.
    pub name: String,
    /// Tiles in the class.
    pub members: usize,
}

/// Everything a host needs to rebuild the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapExport {
    /// Seed the map was generated from.
    pub seed: u64,
    /// Tile side length.
    pub size: i32,
    /// Playable outline.
    pub shape: MapShape,
    /// Texture names, indexed by `textures`.
    pub palette: Vec<String>,
    /// Palette index per tile, row-major.
    pub textures: Vec<u16>,
    /// Vertex heights, row-major, `(size + 1)²` entries.
    pub heights: Vec<f64>,
    /// Placed objects.
    pub objects: Vec<PlacedObject>,
    /// Tile class sizes.
    pub tile_classes: Vec<ClassSummary>,
}

impl MapExport {
    /// Snapshot a map.
    #[must_use]
    pub fn from_state(state: &MapState, seed: u64) -> Self {
        Self {
            seed,
            size: state.size(),
            shape: state.shape(),
            palette: state.palette().to_vec(),
            textures: state.textures().iter().map(|t| t.0).collect(),
            heights: state.heights().to_vec(),
            objects: state.objects().to_vec(),
            tile_classes: state
                .tile_classes()
                .iter()
                .map(|class| ClassSummary {
                    name: class.name().to_string(),
                    members: class.len(),
                })
                .collect(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> MapGenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON document to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> MapGenResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Coord, MapSettings};

    #[test]
    fn test_export_layout() {
        let mut state = MapState::new(&MapSettings {
            size: 16,
            ..MapSettings::default()
        })
        .unwrap();
        let sand = state.intern_texture("sand");
        state.set_texture(Coord::new(1, 0), sand);
        let dunes = state.create_tile_class("dunes").unwrap();
        state.tile_class_mut(dunes).add(Coord::new(1, 0));

        let export = MapExport::from_state(&state, 5);
        assert_eq!(export.palette, vec!["grass".to_string(), "sand".to_string()]);
        assert_eq!(export.textures.len(), 256);
        assert_eq!(export.textures[1], 1);
        assert_eq!(export.heights.len(), 17 * 17);
        assert_eq!(
            export.tile_classes,
            vec![ClassSummary {
                name: "dunes".to_string(),
                members: 1
            }]
        );

        let back: MapExport = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(back, export);
    }
}
