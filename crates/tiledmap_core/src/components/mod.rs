//! Nodes of the map document tree.

pub mod layer;
pub mod map;
pub mod object;
pub mod tileset;

// Re-export commonly used types
pub use layer::{GridSize, ObjectLayer, TileLayer};
pub use map::{Document, Orientation};
pub use object::{Point, Shape, ShapeKind, TiledObject, format_points, parse_points};
pub use tileset::{TileImage, TileOffset, Tileset};
