//! # `tiledmap_core`
//!
//! Document model and cell codec for Tiled maps. Holds everything about a map
//! that does not depend on its markup: tilesets, tile layers with their packed
//! cell data, object layers, and string properties at every level.
//!
//! **This crate does NOT parse or write XML** - that is `tiledmap_assets`.
//! Rendering decoded layers is left to the consumer.
//!
//! ## Architecture
//!
//! - [`properties`]: ordered key/value tables with forgiving typed accessors
//! - [`cells`]: raw cell storage, the base64 + gzip/zlib payload codec and the
//!   tile code / transform bit split
//! - [`components`]: `Document`, `Tileset`, `TileLayer`, `ObjectLayer`, `TiledObject`
//! - [`config`]: limits and per-version opacity scaling shared by reader and writer
//! - [`error`]: the `MapError` taxonomy
//!
//! ## Example Usage
//!
//! ```rust
//! use tiledmap_core::prelude::*;
//!
//! let mut map = Document::new("1.0", Orientation::Orthogonal, 2, 2, 16, 16);
//! let cells = CellArray::from_cells(vec![1, 2, 3, 4 | 0x8000_0000]);
//! map.add_tile_layer(TileLayer::new("ground").with_cells(cells)).unwrap();
//!
//! let cell = map.tile_layer("ground").unwrap().cell_at(1, 1);
//! assert_eq!(cell.code, 4);
//! assert!(cell.flipped_h());
//! ```

pub mod cells;
pub mod components;
pub mod config;
pub mod error;
pub mod named;
pub mod properties;

pub mod prelude {
    //! Common imports for `tiledmap_core` users.

    pub use crate::cells::{
        Cell, CellArray, Compression, Encoding, TileTransform, get_code, get_transform,
    };
    pub use crate::components::{
        Document, GridSize, ObjectLayer, Orientation, Point, Shape, ShapeKind, TileImage,
        TileLayer, TileOffset, TiledObject, Tileset,
    };
    pub use crate::config::{CodecConfig, OpacityConfig, OpacityScale};
    pub use crate::error::{MapError, Result};
    pub use crate::named::{Named, NamedList};
    pub use crate::properties::{Properties, Property};
}

// Re-export the error type at crate root for convenience
pub use error::{MapError, Result};
