//! # tiledmap
//!
//! Read, inspect, edit and save Tiled (`.tmx`) map documents.
//!
//! The work is split across two crates, re-exported here:
//!
//! - [`tiledmap_core`]: the document model (tilesets, tile layers, object
//!   layers, properties) and the base64 + gzip/zlib cell codec
//! - [`tiledmap_assets`]: the XML reader and writer
//!
//! The functions below use [`CodecConfig::default`]. Call
//! [`read_map`](tiledmap_assets::read_map) and
//! [`write_map`](tiledmap_assets::write_map) directly to pass a custom config.
//!
//! ## Example
//!
//! ```rust
//! use tiledmap::prelude::*;
//!
//! let mut map = Document::new("1.0", Orientation::Orthogonal, 3, 2, 32, 32);
//! map.add_tileset(Tileset::new(1, "terrain", 32, 32)).unwrap();
//! map.add_tile_layer(TileLayer::new("ground")).unwrap();
//! map.tile_layer_mut("ground").unwrap().set_cell(2, 1, 5);
//!
//! let bytes = tiledmap::save_document_to_bytes(&map).unwrap();
//! let loaded = tiledmap::load_document_from_bytes(&bytes).unwrap();
//! assert_eq!(loaded, map);
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

pub use tiledmap_assets;
pub use tiledmap_core;

use tiledmap_assets::{read_map, write_map};
use tiledmap_core::components::Document;
use tiledmap_core::config::CodecConfig;
use tiledmap_core::error::Result;

/// Prelude module for convenient imports
pub mod prelude {
    pub use tiledmap_assets::prelude::*;
    pub use tiledmap_core::prelude::*;

    pub use crate::{
        load_document, load_document_from_bytes, load_document_from_reader, save_document,
        save_document_to_bytes, save_document_to_path,
    };
}

/// Load the map at `path`.
pub fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    debug!("Loading map from {}", path.display());
    let file = File::open(path)?;
    load_document_from_reader(BufReader::new(file))
}

pub fn load_document_from_reader(reader: impl Read) -> Result<Document> {
    read_map(reader, &CodecConfig::default())
}

pub fn load_document_from_bytes(bytes: &[u8]) -> Result<Document> {
    load_document_from_reader(bytes)
}

/// Write `document` as TMX into `writer`.
pub fn save_document(document: &Document, writer: impl Write) -> Result<()> {
    write_map(document, writer, &CodecConfig::default())
}

/// Write `document` to `path`, replacing any existing file.
pub fn save_document_to_path(document: &Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!("Saving map to {}", path.display());
    let mut writer = BufWriter::new(File::create(path)?);
    save_document(document, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn save_document_to_bytes(document: &Document) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    save_document(document, &mut bytes)?;
    Ok(bytes)
}
