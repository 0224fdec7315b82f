//! Tilesets embedded in a map document.

use crate::named::Named;
use crate::properties::Properties;

/// Pixel nudge applied when drawing this tileset's tiles (`<tileoffset>`). Positive y is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileOffset {
    pub x: i32,
    pub y: i32,
}

/// Source image of a tileset (`<image>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    /// Path as written in the document, usually relative to the map file.
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// A named bank of tiles contributing the GID range starting at `first_gid`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    /// Smallest GID owned by this tileset
    pub first_gid: u32,
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub offset: Option<TileOffset>,
    pub image: Option<TileImage>,
    pub properties: Properties,
}

impl Tileset {
    pub fn new(first_gid: u32, name: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            first_gid,
            name: name.into(),
            tile_width,
            tile_height,
            spacing: 0,
            margin: 0,
            offset: None,
            image: None,
            properties: Properties::new(),
        }
    }

    pub fn with_image(mut self, source: impl Into<String>, width: u32, height: u32) -> Self {
        self.image = Some(TileImage {
            source: source.into(),
            width,
            height,
        });
        self
    }

    /// Tile columns in the image, `None` without an image or when the count
    /// does not fit in a `u32`.
    pub fn columns(&self) -> Option<u32> {
        let image = self.image.as_ref()?;
        span(image.width, self.tile_width, self.spacing, self.margin)
    }

    pub fn rows(&self) -> Option<u32> {
        let image = self.image.as_ref()?;
        span(image.height, self.tile_height, self.spacing, self.margin)
    }

    /// Number of tiles the image holds, `None` without an image or when the
    /// count does not fit in a `u32`.
    pub fn tile_count(&self) -> Option<u32> {
        self.columns()?.checked_mul(self.rows()?)
    }

    /// Tileset-local id of `gid`, `None` when `gid` lies below this tileset's range.
    pub fn local_id(&self, gid: u32) -> Option<u32> {
        gid.checked_sub(self.first_gid)
    }
}

impl Named for Tileset {
    fn name(&self) -> &str {
        &self.name
    }
}

// Tiles fit along one axis: (extent - 2 * margin + spacing) / (tile + spacing)
fn span(extent: u32, tile: u32, spacing: u32, margin: u32) -> Option<u32> {
    let (extent, tile, spacing, margin) = (
        u64::from(extent),
        u64::from(tile),
        u64::from(spacing),
        u64::from(margin),
    );
    let stride = tile + spacing;
    if stride == 0 {
        return Some(0);
    }
    u32::try_from((extent + spacing).saturating_sub(margin * 2) / stride).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_count_with_spacing_and_margin() {
        let mut tileset =
            Tileset::new(1, "grass", 64, 64).with_image("isometric_grass.png", 256, 384);
        assert_eq!(tileset.columns(), Some(4));
        assert_eq!(tileset.rows(), Some(6));
        assert_eq!(tileset.tile_count(), Some(24));

        tileset.spacing = 2;
        tileset.margin = 1;
        // (256 + 2 - 2) / 66 = 3
        assert_eq!(tileset.columns(), Some(3));
    }

    #[test]
    fn test_extreme_attributes_do_not_overflow() {
        let mut tileset = Tileset::new(1, "big", 16, 16).with_image("big.png", 256, 256);
        tileset.margin = 3_000_000_000;
        assert_eq!(tileset.columns(), Some(0));
        assert_eq!(tileset.tile_count(), Some(0));

        tileset.margin = 0;
        tileset.spacing = u32::MAX;
        assert_eq!(tileset.columns(), Some(1));

        let mut tileset = Tileset::new(1, "thin", 0, 1).with_image("thin.png", u32::MAX, 1);
        tileset.spacing = 1;
        // u32::MAX + 1 columns
        assert_eq!(tileset.columns(), None);
        assert_eq!(tileset.tile_count(), None);

        let tileset = Tileset::new(1, "dense", 1, 1).with_image("dense.png", 100_000, 100_000);
        assert_eq!(tileset.columns(), Some(100_000));
        assert_eq!(tileset.tile_count(), None);
    }

    #[test]
    fn test_local_id() {
        let tileset = Tileset::new(10, "walls", 32, 32);
        assert_eq!(tileset.local_id(10), Some(0));
        assert_eq!(tileset.local_id(15), Some(5));
        assert_eq!(tileset.local_id(3), None);
        assert_eq!(tileset.tile_count(), None);
    }
}
