//! `<tileset>` elements embedded in a map.

use std::io::Read;

use tiledmap_core::components::{TileImage, TileOffset, Tileset};
use tiledmap_core::error::{MapError, Result};
use tracing::debug;

use super::properties::read_properties;
use super::{Attrs, XmlCursor};

pub(crate) fn read_tileset<R: Read>(cursor: &mut XmlCursor<R>, attrs: Attrs) -> Result<Tileset> {
    if attrs.get("name").is_none()
        && let Some(source) = attrs.get("source")
    {
        return Err(MapError::malformed(format!(
            "external tileset '{source}' is not supported, embed it in the map"
        )));
    }

    let mut tileset = Tileset::new(
        attrs.required("firstgid")?,
        attrs.required_str("name")?,
        attrs.required("tilewidth")?,
        attrs.required("tileheight")?,
    );
    tileset.spacing = attrs.optional("spacing")?.unwrap_or(0);
    tileset.margin = attrs.optional("margin")?.unwrap_or(0);

    cursor.children("tileset", |cursor, child, attrs| match child {
        "tileoffset" => {
            tileset.offset = Some(TileOffset {
                x: attrs.optional("x")?.unwrap_or(0),
                y: attrs.optional("y")?.unwrap_or(0),
            });
            cursor.skip()
        }
        "image" => {
            tileset.image = Some(TileImage {
                source: attrs.required_str("source")?,
                width: attrs.optional("width")?.unwrap_or(0),
                height: attrs.optional("height")?.unwrap_or(0),
            });
            cursor.skip()
        }
        "properties" => read_properties(cursor, &mut tileset.properties),
        other => cursor.skip_unknown("tileset", other),
    })?;

    debug!(
        "Loaded tileset '{}' (first gid {})",
        tileset.name, tileset.first_gid
    );
    Ok(tileset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(xml: &str) -> Result<Tileset> {
        let mut cursor = XmlCursor::new(xml.as_bytes());
        let (_, attrs) = cursor.root()?;
        read_tileset(&mut cursor, attrs)
    }

    #[test]
    fn test_read_tileset() {
        let tileset = read(
            r#"<tileset firstgid="1" name="isometric_grass_and_water" tilewidth="64" tileheight="64">
                 <tileoffset x="0" y="16"/>
                 <image source="isometric_grass_and_water.png" width="256" height="384"/>
                 <terraintypes><terrain name="Grass" tile="0"/></terraintypes>
                 <properties><property name="kind" value="ground"/></properties>
               </tileset>"#,
        )
        .unwrap();

        assert_eq!(tileset.first_gid, 1);
        assert_eq!(tileset.name, "isometric_grass_and_water");
        assert_eq!(tileset.offset, Some(TileOffset { x: 0, y: 16 }));
        let image = tileset.image.as_ref().unwrap();
        assert_eq!(image.source, "isometric_grass_and_water.png");
        assert_eq!((image.width, image.height), (256, 384));
        assert_eq!(tileset.tile_count(), Some(24));
        assert_eq!(tileset.properties.get("kind"), Some("ground"));
    }

    #[test]
    fn test_missing_firstgid_is_malformed() {
        let result = read(r#"<tileset name="a" tilewidth="8" tileheight="8"/>"#);
        assert!(matches!(result, Err(MapError::MalformedDocument(_))));
    }

    #[test]
    fn test_external_tileset_is_rejected() {
        let result = read(r#"<tileset firstgid="1" source="terrain.tsx"/>"#);
        assert!(
            matches!(result, Err(MapError::MalformedDocument(ref m)) if m.contains("terrain.tsx"))
        );
    }
}
