//! The `<map>` root element.

use std::io::Read;

use tiledmap_core::components::{Document, Orientation};
use tiledmap_core::config::CodecConfig;
use tiledmap_core::error::{MapError, Result};
use tracing::debug;

use super::layer::read_tile_layer;
use super::object::read_object_layer;
use super::properties::read_properties;
use super::tileset::read_tileset;
use super::{Attrs, LoadContext, XmlCursor};

/// Parse a complete TMX document from `reader`.
///
/// # Errors
///
/// * [`MapError::MalformedDocument`] for broken markup, a root other than
///   `<map>`, or a missing or unparseable required attribute
/// * [`MapError::UnrecognizedOrientation`], [`MapError::UnrecognizedEncoding`]
///   and [`MapError::UnrecognizedCompression`] for unknown attribute values
/// * [`MapError::DuplicateKey`] when two tilesets, two tile layers, two object
///   layers or two properties share a name
/// * [`MapError::PayloadTooLarge`] when a layer inflates past
///   [`CodecConfig::max_decompressed_bytes`]
pub fn read_map<R: Read>(reader: R, config: &CodecConfig) -> Result<Document> {
    let mut cursor = XmlCursor::new(reader);
    let (root, attrs) = cursor.root()?;
    if root != "map" {
        return Err(MapError::malformed(format!(
            "root element is <{root}>, expected <map>"
        )));
    }
    read_map_element(&mut cursor, attrs, config)
}

fn read_map_element<R: Read>(
    cursor: &mut XmlCursor<R>,
    attrs: Attrs,
    config: &CodecConfig,
) -> Result<Document> {
    let version = attrs.required_str("version")?;
    let orientation = Orientation::from_attr(&attrs.required_str("orientation")?)?;
    let mut document = Document::new(
        version,
        orientation,
        attrs.required("width")?,
        attrs.required("height")?,
        attrs.required("tilewidth")?,
        attrs.required("tileheight")?,
    );

    let context = LoadContext {
        grid: document.grid(),
        opacity: config.opacity.scale_for(&document.version),
        max_decompressed_bytes: config.max_decompressed_bytes,
    };
    debug!(
        "Reading {} map v{} ({}x{}, opacity {:?})",
        document.orientation,
        document.version,
        document.width(),
        document.height(),
        context.opacity
    );

    cursor.children("map", |cursor, child, attrs| match child {
        "tileset" => document.add_tileset(read_tileset(cursor, attrs)?),
        "layer" => document.add_tile_layer(read_tile_layer(cursor, attrs, &context)?),
        "objectgroup" => document.add_object_layer(read_object_layer(cursor, attrs, &context)?),
        "properties" => read_properties(cursor, &mut document.properties),
        other => cursor.skip_unknown("map", other),
    })?;

    debug!(
        "Read map with {} tilesets, {} tile layers, {} object layers",
        document.tilesets().len(),
        document.tile_layers().len(),
        document.object_layers().len()
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(xml: &str) -> Result<Document> {
        read_map(xml.as_bytes(), &CodecConfig::default())
    }

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.0" orientation="isometric" width="2" height="2" tilewidth="64" tileheight="32">
 <properties><property name="music" value="theme.ogg"/></properties>
 <tileset firstgid="1" name="grass" tilewidth="64" tileheight="64"/>
 <layer name="ground">
  <data><tile gid="1"/><tile gid="2"/><tile gid="0"/><tile gid="1"/></data>
 </layer>
 <objectgroup name="spawns"><object name="player" x="32" y="16"/></objectgroup>
 <imagelayer name="sky"><image source="sky.png"/></imagelayer>
</map>"#;

    #[test]
    fn test_read_minimal_map() {
        let document = read(MINIMAL).unwrap();

        assert_eq!(document.version, "1.0");
        assert_eq!(document.orientation, Orientation::Isometric);
        assert_eq!((document.width(), document.height()), (2, 2));
        assert_eq!((document.tile_width, document.tile_height), (64, 32));
        assert_eq!(document.properties.get("music"), Some("theme.ogg"));
        assert!(document.tileset("grass").is_some());

        let ground = document.tile_layer("ground").unwrap();
        assert_eq!(ground.width(), 2);
        assert_eq!(ground.raw_at(1, 0), 2);
        assert_eq!(ground.raw_at(0, 1), 0);

        let spawns = document.object_layer("spawns").unwrap();
        assert_eq!(spawns.height(), 2);
        assert_eq!(spawns.object("player").unwrap().x, 32);
    }

    #[test]
    fn test_missing_required_attribute() {
        let result = read(r#"<map version="1.0" orientation="orthogonal" width="2" height="2"/>"#);
        assert!(
            matches!(result, Err(MapError::MalformedDocument(ref m)) if m.contains("tilewidth"))
        );
    }

    #[test]
    fn test_unknown_orientation() {
        let result = read(
            r#"<map version="1.0" orientation="hexagonal" width="1" height="1" tilewidth="1" tileheight="1"/>"#,
        );
        assert!(matches!(result, Err(MapError::UnrecognizedOrientation(_))));
    }

    #[test]
    fn test_wrong_root() {
        assert!(matches!(
            read("<tileset/>"),
            Err(MapError::MalformedDocument(_))
        ));
        assert!(matches!(read("not xml"), Err(MapError::MalformedDocument(_))));
    }

    #[test]
    fn test_duplicate_layer_names() {
        let result = read(
            r#"<map version="1.0" orientation="orthogonal" width="1" height="1" tilewidth="8" tileheight="8">
                 <layer name="a"><data><tile/></data></layer>
                 <layer name="a"><data><tile/></data></layer>
               </map>"#,
        );
        assert!(matches!(result, Err(MapError::DuplicateKey(ref k)) if k == "a"));
    }
}
