//! TMX (XML) reader and writer for [`tiledmap_core`] documents.
//!
//! Reading streams the document with `xml-rs`: each element family has its own
//! loader under [`loaders`], and elements that are not modeled are skipped with a
//! warning. [`writer`] emits the same subset back.

pub mod loaders;
pub mod writer;

pub use loaders::map::read_map;
pub use writer::write_map;

/// Prelude module for convenient imports
///
/// # Example
/// ```rust
/// use tiledmap_assets::prelude::*;
/// use tiledmap_core::config::CodecConfig;
///
/// let xml = r#"<map version="1.0" orientation="orthogonal" width="1" height="1"
///                   tilewidth="16" tileheight="16">
///                <layer name="ground"><data><tile gid="7"/></data></layer>
///              </map>"#;
/// let map = read_map(xml.as_bytes(), &CodecConfig::default()).unwrap();
/// assert_eq!(map.tile_layer("ground").unwrap().raw_at(0, 0), 7);
///
/// let mut out = Vec::new();
/// write_map(&map, &mut out, &CodecConfig::default()).unwrap();
/// ```
pub mod prelude {
    pub use crate::loaders::map::read_map;
    pub use crate::writer::write_map;
}
