//! Concentric terrain layers by distance from the area border.

use crate::area::Area;
use crate::error::{MapGenError, MapGenResult};
use crate::map::{Coord, MapContext};
use crate::painter::distance::{DistanceField, Window};
use crate::painter::{AreaPainter, Terrain, place_terrain};

/// Paints `terrains[i]` on the tiles whose border distance falls within the
/// cumulative `widths[..=i]`, and the last terrain on everything deeper.
#[derive(Debug, Clone)]
pub struct LayeredPainter {
    terrains: Vec<Terrain>,
    widths: Vec<u32>,
}

impl LayeredPainter {
    /// Create the painter.
    ///
    /// # Errors
    ///
    /// Returns an error unless there is exactly one more terrain than widths.
    pub fn new(terrains: Vec<Terrain>, widths: Vec<u32>) -> MapGenResult<Self> {
        if terrains.len() != widths.len() + 1 {
            return Err(MapGenError::invalid(
                "layered painter",
                format!(
                    "expected {} terrains for {} widths, got {}",
                    widths.len() + 1,
                    widths.len(),
                    terrains.len()
                ),
            ));
        }
        Ok(Self { terrains, widths })
    }

    fn layer_for(&self, distance: Option<u32>) -> usize {
        let Some(distance) = distance else {
            return self.widths.len();
        };
        let mut reach = 0;
        for (layer, width) in self.widths.iter().enumerate() {
            reach += width;
            if distance <= reach {
                return layer;
            }
        }
        self.widths.len()
    }
}

impl AreaPainter for LayeredPainter {
    fn paint(&self, ctx: &mut MapContext, area: &Area) {
        let Some((lo, hi)) = area.bounds() else {
            return;
        };
        let size = ctx.state.size();
        let Some(window) = Window::new(
            Coord::new((lo.x - 1).max(0), (lo.z - 1).max(0)),
            Coord::new((hi.x + 1).min(size - 1), (hi.z + 1).min(size - 1)),
        ) else {
            return;
        };
        let distances = DistanceField::from_outside(window, |c| area.contains(c));

        let layers: Vec<_> = self
            .terrains
            .iter()
            .map(|terrain| terrain.resolve(&mut ctx.state))
            .collect();

        for &point in area.points() {
            let layer = self.layer_for(distances.get(point));
            place_terrain(ctx, &layers[layer], point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaId;
    use crate::map::MapSettings;

    #[test]
    fn test_layer_count_validated() {
        assert!(LayeredPainter::new(vec!["a".into()], vec![1]).is_err());
        assert!(LayeredPainter::new(vec!["a".into(), "b".into()], vec![1]).is_ok());
    }

    #[test]
    fn test_layers_by_distance() {
        let mut ctx = MapContext::new(
            &MapSettings {
                size: 32,
                ..MapSettings::default()
            },
            4,
        )
        .unwrap();
        let points = (8..20)
            .flat_map(|z| (8..20).map(move |x| Coord::new(x, z)))
            .collect();
        let area = Area::new(AreaId(1), points);
        let painter = LayeredPainter::new(
            vec!["shore".into(), "shallows".into(), "deep".into()],
            vec![1, 2],
        )
        .unwrap();
        painter.paint(&mut ctx, &area);

        let name = |x, z| {
            let id = ctx.state.texture(Coord::new(x, z)).unwrap();
            ctx.state.texture_name(id).unwrap().to_string()
        };
        assert_eq!(name(8, 14), "shore");
        assert_eq!(name(9, 14), "shallows");
        assert_eq!(name(10, 14), "shallows");
        assert_eq!(name(11, 14), "deep");
        assert_eq!(name(14, 14), "deep");
        assert_eq!(name(7, 14), "grass");
    }
}
