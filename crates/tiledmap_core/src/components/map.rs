//! The map document root.

use std::fmt;

use tracing::debug;

use crate::error::{MapError, Result};
use crate::named::NamedList;
use crate::properties::Properties;

use super::layer::{GridSize, ObjectLayer, TileLayer};
use super::tileset::Tileset;

/// Projection of the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Orthogonal,
    Isometric,
}

impl Orientation {
    /// Parse the `orientation` attribute of `<map>`.
    pub fn from_attr(value: &str) -> Result<Self> {
        match value {
            "orthogonal" => Ok(Orientation::Orthogonal),
            "isometric" => Ok(Orientation::Isometric),
            other => Err(MapError::UnrecognizedOrientation(other.to_string())),
        }
    }

    pub fn as_attr(self) -> &'static str {
        match self {
            Orientation::Orthogonal => "orthogonal",
            Orientation::Isometric => "isometric",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_attr())
    }
}

/// A Tiled map: grid geometry, tilesets, tile layers, object layers and properties.
///
/// The document owns every node. Layers are handed over by value and never move
/// between documents on their own. Tile layer names and object layer names are
/// unique within their own collection, independently of each other.
///
/// # Example
///
/// ```rust
/// use tiledmap_core::prelude::*;
///
/// let mut map = Document::new("1.0", Orientation::Orthogonal, 10, 8, 32, 32);
/// map.add_tileset(Tileset::new(1, "terrain", 32, 32)).unwrap();
/// map.add_tile_layer(TileLayer::new("ground")).unwrap();
///
/// // The layer inherited the map size
/// assert_eq!(map.tile_layer("ground").unwrap().width(), 10);
/// assert!(map.add_tile_layer(TileLayer::new("ground")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub version: String,
    pub orientation: Orientation,

    /// Tile size in pixels
    pub tile_width: u32,
    pub tile_height: u32,

    pub properties: Properties,

    grid: GridSize,
    tilesets: NamedList<Tileset>,
    tile_layers: NamedList<TileLayer>,
    object_layers: NamedList<ObjectLayer>,
}

impl Document {
    pub fn new(
        version: impl Into<String>,
        orientation: Orientation,
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        Self {
            version: version.into(),
            orientation,
            tile_width,
            tile_height,
            properties: Properties::new(),
            grid: GridSize::new(width, height),
            tilesets: NamedList::new(),
            tile_layers: NamedList::new(),
            object_layers: NamedList::new(),
        }
    }

    /// Map width in cells.
    pub fn width(&self) -> u32 {
        self.grid.width
    }

    /// Map height in cells.
    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Change the map size. Layers without an explicit size follow along; their
    /// cell storage is not reshaped.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.grid = GridSize::new(width, height);
        for layer in self.tile_layers.iter_mut() {
            layer.inherit_size(self.grid);
        }
        for layer in self.object_layers.iter_mut() {
            layer.inherit_size(self.grid);
        }
    }

    // ===== TILESETS =====

    pub fn add_tileset(&mut self, tileset: Tileset) -> Result<()> {
        self.tilesets.insert(tileset)
    }

    pub fn tileset(&self, name: &str) -> Option<&Tileset> {
        self.tilesets.get(name)
    }

    pub fn tileset_mut(&mut self, name: &str) -> Option<&mut Tileset> {
        self.tilesets.get_mut(name)
    }

    pub fn remove_tileset(&mut self, name: &str) -> Option<Tileset> {
        self.tilesets.remove(name)
    }

    pub fn tilesets(&self) -> &NamedList<Tileset> {
        &self.tilesets
    }

    /// Tileset owning `gid`: the one with the largest `first_gid <= gid`.
    ///
    /// Transform bits are ignored. GID 0 ("no tile") has no tileset.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&Tileset> {
        let gid = crate::cells::get_code(gid);
        if gid == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .filter(|tileset| tileset.first_gid <= gid)
            .max_by_key(|tileset| tileset.first_gid)
    }

    // ===== TILE LAYERS =====

    /// Take ownership of `layer`. A layer without its own size adopts the map's.
    pub fn add_tile_layer(&mut self, mut layer: TileLayer) -> Result<()> {
        layer.inherit_size(self.grid);
        debug!(
            "Adding tile layer '{}' ({}x{})",
            layer.name,
            layer.width(),
            layer.height()
        );
        self.tile_layers.insert(layer)
    }

    pub fn tile_layer(&self, name: &str) -> Option<&TileLayer> {
        self.tile_layers.get(name)
    }

    pub fn tile_layer_mut(&mut self, name: &str) -> Option<&mut TileLayer> {
        self.tile_layers.get_mut(name)
    }

    /// Like [`Document::tile_layer`] but a miss is a [`MapError::NotFound`].
    pub fn require_tile_layer(&self, name: &str) -> Result<&TileLayer> {
        self.tile_layer(name)
            .ok_or_else(|| MapError::NotFound(format!("tile layer '{name}'")))
    }

    pub fn remove_tile_layer(&mut self, name: &str) -> Option<TileLayer> {
        self.tile_layers.remove(name)
    }

    pub fn tile_layers(&self) -> &NamedList<TileLayer> {
        &self.tile_layers
    }

    // ===== OBJECT LAYERS =====

    pub fn add_object_layer(&mut self, mut layer: ObjectLayer) -> Result<()> {
        layer.inherit_size(self.grid);
        debug!(
            "Adding object layer '{}' ({} objects)",
            layer.name,
            layer.objects.len()
        );
        self.object_layers.insert(layer)
    }

    pub fn object_layer(&self, name: &str) -> Option<&ObjectLayer> {
        self.object_layers.get(name)
    }

    pub fn object_layer_mut(&mut self, name: &str) -> Option<&mut ObjectLayer> {
        self.object_layers.get_mut(name)
    }

    pub fn require_object_layer(&self, name: &str) -> Result<&ObjectLayer> {
        self.object_layer(name)
            .ok_or_else(|| MapError::NotFound(format!("object layer '{name}'")))
    }

    pub fn remove_object_layer(&mut self, name: &str) -> Option<ObjectLayer> {
        self.object_layers.remove(name)
    }

    pub fn object_layers(&self) -> &NamedList<ObjectLayer> {
        &self.object_layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> Document {
        Document::new("1.0", Orientation::Isometric, 25, 25, 64, 32)
    }

    #[test]
    fn test_orientation_attr() {
        assert_eq!(
            Orientation::from_attr("isometric").unwrap(),
            Orientation::Isometric
        );
        assert!(matches!(
            Orientation::from_attr("hexagonal"),
            Err(MapError::UnrecognizedOrientation(ref o)) if o == "hexagonal"
        ));
        assert_eq!(Orientation::Orthogonal.to_string(), "orthogonal");
    }

    #[test]
    fn test_duplicate_names_per_collection() {
        let mut map = map();
        map.add_tile_layer(TileLayer::new("main")).unwrap();
        // Object layers have their own namespace
        map.add_object_layer(ObjectLayer::new("main")).unwrap();

        let err = map.add_tile_layer(TileLayer::with_size("main", 1, 1));
        assert!(matches!(err, Err(MapError::DuplicateKey(_))));
        assert_eq!(map.tile_layers().len(), 1);
        assert_eq!(map.tile_layer("main").unwrap().width(), 25);

        map.add_tileset(Tileset::new(1, "grass", 64, 64)).unwrap();
        let err = map.add_tileset(Tileset::new(100, "grass", 64, 64));
        assert!(matches!(err, Err(MapError::DuplicateKey(_))));
        assert_eq!(map.tileset("grass").unwrap().first_gid, 1);
    }

    #[test]
    fn test_tileset_for_gid() {
        let mut map = map();
        map.add_tileset(Tileset::new(1, "grass", 64, 64)).unwrap();
        map.add_tileset(Tileset::new(25, "water", 64, 64)).unwrap();

        assert!(map.tileset_for_gid(0).is_none());
        assert_eq!(map.tileset_for_gid(1).unwrap().name, "grass");
        assert_eq!(map.tileset_for_gid(24).unwrap().name, "grass");
        assert_eq!(map.tileset_for_gid(25).unwrap().name, "water");
        assert_eq!(
            map.tileset_for_gid(26 | 0x8000_0000).unwrap().name,
            "water"
        );
    }

    #[test]
    fn test_resize_propagates_to_inheriting_layers() {
        let mut map = map();
        map.add_tile_layer(TileLayer::new("inherits")).unwrap();
        map.add_tile_layer(TileLayer::with_size("own", 3, 3)).unwrap();
        map.add_object_layer(ObjectLayer::new("objects")).unwrap();

        map.set_size(40, 30);
        assert_eq!(map.tile_layer("inherits").unwrap().width(), 40);
        assert_eq!(map.tile_layer("own").unwrap().width(), 3);
        assert_eq!(map.object_layer("objects").unwrap().height(), 30);
    }

    #[test]
    fn test_require_layer_not_found() {
        let map = map();
        assert!(matches!(
            map.require_tile_layer("nope"),
            Err(MapError::NotFound(_))
        ));
        assert!(map.require_object_layer("nope").is_err());
    }
}
