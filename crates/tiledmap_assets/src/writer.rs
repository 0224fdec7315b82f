//! TMX writer.
//!
//! Children of `<map>` are written as properties, tilesets, tile layers, then
//! object layers. Attributes holding their default value (opacity 1, rotation 0,
//! empty names) are left out, which the loaders read back as the same value.

use std::io::Write;

use tiledmap_core::cells::{CellArray, Compression, Encoding};
use tiledmap_core::components::{
    Document, ObjectLayer, Point, Shape, TileLayer, TiledObject, Tileset, format_points,
};
use tiledmap_core::config::{CodecConfig, OpacityScale};
use tiledmap_core::error::{MapError, Result};
use tiledmap_core::properties::Properties;
use tracing::debug;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

/// Serialize `document` as TMX into `sink`.
///
/// # Errors
///
/// * [`MapError::UnimplementedCodec`] when a layer asks for plain XML cells
///   with compression
/// * [`MapError::Io`] when `sink` fails
pub fn write_map<W: Write>(document: &Document, sink: W, config: &CodecConfig) -> Result<()> {
    let mut writer = MapWriter {
        events: EmitterConfig::new()
            .perform_indent(config.indent)
            .create_writer(sink),
        opacity: config.opacity.scale_for(&document.version),
    };
    writer.map(document)?;
    debug!(
        "Wrote map v{} with {} tile layers and {} object layers",
        document.version,
        document.tile_layers().len(),
        document.object_layers().len()
    );
    Ok(())
}

struct MapWriter<W: Write> {
    events: EventWriter<W>,
    opacity: OpacityScale,
}

impl<W: Write> MapWriter<W> {
    fn emit<'a>(&mut self, event: impl Into<XmlEvent<'a>>) -> Result<()> {
        self.events.write(event).map_err(|e| match e {
            xml::writer::Error::Io(io) => MapError::Io(io),
            other => MapError::malformed(format!("failed to write XML: {other}")),
        })
    }

    fn end(&mut self) -> Result<()> {
        self.emit(XmlEvent::end_element())
    }

    /// Attribute text for a normalized opacity, `None` when fully opaque.
    fn opacity_attr(&self, opacity: f32) -> Option<String> {
        (opacity != 1.0).then(|| self.opacity.format(opacity))
    }

    fn map(&mut self, document: &Document) -> Result<()> {
        let width = document.width().to_string();
        let height = document.height().to_string();
        let tile_width = document.tile_width.to_string();
        let tile_height = document.tile_height.to_string();
        self.emit(
            XmlEvent::start_element("map")
                .attr("version", &document.version)
                .attr("orientation", document.orientation.as_attr())
                .attr("width", &width)
                .attr("height", &height)
                .attr("tilewidth", &tile_width)
                .attr("tileheight", &tile_height),
        )?;

        self.properties(&document.properties)?;
        for tileset in document.tilesets() {
            self.tileset(tileset)?;
        }
        for layer in document.tile_layers() {
            self.tile_layer(layer)?;
        }
        for layer in document.object_layers() {
            self.object_layer(layer)?;
        }
        self.end()
    }

    fn properties(&mut self, properties: &Properties) -> Result<()> {
        if properties.is_empty() {
            return Ok(());
        }
        self.emit(XmlEvent::start_element("properties"))?;
        for (name, value) in properties.iter() {
            self.emit(
                XmlEvent::start_element("property")
                    .attr("name", name)
                    .attr("value", value),
            )?;
            self.end()?;
        }
        self.end()
    }

    fn tileset(&mut self, tileset: &Tileset) -> Result<()> {
        let first_gid = tileset.first_gid.to_string();
        let tile_width = tileset.tile_width.to_string();
        let tile_height = tileset.tile_height.to_string();
        let spacing = tileset.spacing.to_string();
        let margin = tileset.margin.to_string();

        let mut element = XmlEvent::start_element("tileset")
            .attr("firstgid", &first_gid)
            .attr("name", &tileset.name)
            .attr("tilewidth", &tile_width)
            .attr("tileheight", &tile_height);
        if tileset.spacing != 0 {
            element = element.attr("spacing", &spacing);
        }
        if tileset.margin != 0 {
            element = element.attr("margin", &margin);
        }
        self.emit(element)?;

        if let Some(offset) = tileset.offset {
            let (x, y) = (offset.x.to_string(), offset.y.to_string());
            self.emit(XmlEvent::start_element("tileoffset").attr("x", &x).attr("y", &y))?;
            self.end()?;
        }
        if let Some(image) = &tileset.image {
            let (width, height) = (image.width.to_string(), image.height.to_string());
            self.emit(
                XmlEvent::start_element("image")
                    .attr("source", &image.source)
                    .attr("width", &width)
                    .attr("height", &height),
            )?;
            self.end()?;
        }
        self.properties(&tileset.properties)?;
        self.end()
    }

    fn tile_layer(&mut self, layer: &TileLayer) -> Result<()> {
        let cells = layer.cell_array();
        // Fail before any of the layer is written
        let payload = match cells.encoding() {
            Encoding::Base64 => Some(cells.encode()?),
            Encoding::Xml if cells.compression() != Compression::None => {
                return Err(MapError::UnimplementedCodec {
                    encoding: Encoding::Xml,
                    compression: cells.compression(),
                });
            }
            Encoding::Xml => None,
        };

        let width = layer.width().to_string();
        let height = layer.height().to_string();
        let opacity = self.opacity_attr(layer.opacity);
        let mut element = XmlEvent::start_element("layer").attr("name", &layer.name);
        if layer.has_explicit_size() {
            element = element.attr("width", &width).attr("height", &height);
        }
        if let Some(opacity) = &opacity {
            element = element.attr("opacity", opacity);
        }
        self.emit(element)?;
        self.properties(&layer.properties)?;

        let mut data = XmlEvent::start_element("data");
        if let Some(encoding) = cells.encoding().as_attr() {
            data = data.attr("encoding", encoding);
        }
        if let Some(compression) = cells.compression().as_attr() {
            data = data.attr("compression", compression);
        }
        self.emit(data)?;
        match payload {
            Some(text) => self.emit(XmlEvent::characters(&text))?,
            None => self.tiles(cells)?,
        }
        self.end()?;
        self.end()
    }

    fn tiles(&mut self, cells: &CellArray) -> Result<()> {
        for raw in cells.iter() {
            let gid = raw.to_string();
            self.emit(XmlEvent::start_element("tile").attr("gid", &gid))?;
            self.end()?;
        }
        Ok(())
    }

    fn object_layer(&mut self, layer: &ObjectLayer) -> Result<()> {
        let opacity = self.opacity_attr(layer.opacity);
        let mut element = XmlEvent::start_element("objectgroup").attr("name", &layer.name);
        if let Some(opacity) = &opacity {
            element = element.attr("opacity", opacity);
        }
        self.emit(element)?;
        self.properties(&layer.properties)?;
        for object in &layer.objects {
            self.object(object)?;
        }
        self.end()
    }

    fn object(&mut self, object: &TiledObject) -> Result<()> {
        let gid = object.gid().map(|gid| gid.to_string());
        let x = object.x.to_string();
        let y = object.y.to_string();
        let width = object.width.map(|w| w.to_string());
        let height = object.height.map(|h| h.to_string());
        let rotation = object.rotation.to_string();

        let mut element = XmlEvent::start_element("object");
        if !object.name.is_empty() {
            element = element.attr("name", &object.name);
        }
        if !object.object_type.is_empty() {
            element = element.attr("type", &object.object_type);
        }
        if let Some(gid) = &gid {
            element = element.attr("gid", gid);
        }
        element = element.attr("x", &x).attr("y", &y);
        if let Some(width) = &width {
            element = element.attr("width", width);
        }
        if let Some(height) = &height {
            element = element.attr("height", height);
        }
        if object.rotation != 0.0 {
            element = element.attr("rotation", &rotation);
        }
        self.emit(element)?;
        self.properties(&object.properties)?;

        match object.shape_data() {
            Shape::Rectangle | Shape::Tile { .. } => {}
            Shape::Ellipse => {
                self.emit(XmlEvent::start_element("ellipse"))?;
                self.end()?;
            }
            Shape::Polygon(points) => self.points("polygon", points)?,
            Shape::PolyLine(points) => self.points("polyline", points)?,
        }
        self.end()
    }

    fn points(&mut self, tag: &str, points: &[Point]) -> Result<()> {
        let points = format_points(points);
        self.emit(XmlEvent::start_element(tag).attr("points", &points))?;
        self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::map::read_map;
    use tiledmap_core::components::Orientation;

    fn write(document: &Document, config: &CodecConfig) -> Result<String> {
        let mut out = Vec::new();
        write_map(document, &mut out, config)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn sample() -> Document {
        let mut document = Document::new("1.0", Orientation::Orthogonal, 2, 2, 16, 16);
        document.properties.set("music", "cave.ogg");
        document
            .add_tileset(Tileset::new(1, "cave", 16, 16).with_image("cave.png", 64, 64))
            .unwrap();

        let mut ground = TileLayer::new("ground");
        ground.opacity = 0.5;
        document.add_tile_layer(ground).unwrap();
        let ground = document.tile_layer_mut("ground").unwrap();
        ground.set_cell(0, 0, 3);
        ground.set_cell(1, 1, 4 | 0x2000_0000);

        let mut objects = ObjectLayer::new("objects");
        objects.objects.push(TiledObject::new("spawn", 8, 8).with_size(16, 16));
        objects.objects.push(
            TiledObject::new("fence", 0, 0)
                .with_shape(Shape::PolyLine(vec![Point::new(0, 0), Point::new(32, -4)])),
        );
        document.add_object_layer(objects).unwrap();
        document
    }

    #[test]
    fn test_write_then_read() {
        let document = sample();
        let xml = write(&document, &CodecConfig::default()).unwrap();

        assert!(xml.contains(r#"encoding="base64""#));
        assert!(xml.contains(r#"compression="gzip""#));
        assert!(xml.contains(r#"points="0,0 32,-4""#));

        let reread = read_map(xml.as_bytes(), &CodecConfig::default()).unwrap();
        assert_eq!(reread, document);
    }

    #[test]
    fn test_children_order() {
        let xml = write(&sample(), &CodecConfig::default()).unwrap();
        let positions: Vec<_> = ["<properties", "<tileset", "<layer", "<objectgroup"]
            .iter()
            .map(|tag| xml.find(tag).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_plain_xml_cells() {
        let mut document = sample();
        document
            .tile_layer_mut("ground")
            .unwrap()
            .cell_array_mut()
            .set_codec(Encoding::Xml, Compression::None);

        let xml = write(&document, &CodecConfig::default()).unwrap();
        assert!(xml.contains(r#"<tile gid="3""#));
        assert!(!xml.contains("compression="));
        assert_eq!(read_map(xml.as_bytes(), &CodecConfig::default()).unwrap(), document);
    }

    #[test]
    fn test_compressed_plain_xml_is_unimplemented() {
        let mut document = sample();
        document
            .tile_layer_mut("ground")
            .unwrap()
            .cell_array_mut()
            .set_codec(Encoding::Xml, Compression::Zlib);

        let result = write(&document, &CodecConfig::default());
        assert!(matches!(
            result,
            Err(MapError::UnimplementedCodec {
                encoding: Encoding::Xml,
                compression: Compression::Zlib
            })
        ));
    }

    #[test]
    fn test_percent_opacity_is_scaled_back() {
        let mut config = CodecConfig::default();
        config.opacity.percent_versions.push("1.0".into());

        let xml = write(&sample(), &config).unwrap();
        assert!(xml.contains(r#"opacity="50""#));
        let reread = read_map(xml.as_bytes(), &config).unwrap();
        assert_eq!(reread.tile_layer("ground").unwrap().opacity, 0.5);
    }
}
