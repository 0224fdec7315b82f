//! `<objectgroup>` elements and the objects they hold.

use std::io::Read;

use tiledmap_core::components::{ObjectLayer, Shape, TiledObject, parse_points};
use tiledmap_core::error::Result;
use tracing::{debug, warn};

use super::properties::read_properties;
use super::{Attrs, LoadContext, XmlCursor};

pub(crate) fn read_object_layer<R: Read>(
    cursor: &mut XmlCursor<R>,
    attrs: Attrs,
    context: &LoadContext,
) -> Result<ObjectLayer> {
    let mut layer = ObjectLayer::new(attrs.required_str("name")?);
    layer.opacity = context.opacity(&attrs)?;

    cursor.children("objectgroup", |cursor, child, attrs| match child {
        "object" => {
            layer.objects.push(read_object(cursor, attrs)?);
            Ok(())
        }
        "properties" => read_properties(cursor, &mut layer.properties),
        other => cursor.skip_unknown("objectgroup", other),
    })?;

    debug!(
        "Loaded object layer '{}' ({} objects)",
        layer.name,
        layer.objects.len()
    );
    Ok(layer)
}

/// Read one `<object>`.
///
/// Position and rotation must parse. `gid`, `width` and `height` are read
/// leniently: a bad value leaves them unset. A `gid` makes the object a tile
/// stamp regardless of any shape child.
fn read_object<R: Read>(cursor: &mut XmlCursor<R>, attrs: Attrs) -> Result<TiledObject> {
    let mut object = TiledObject::new(
        attrs.get("name").unwrap_or_default(),
        attrs.optional("x")?.unwrap_or(0),
        attrs.optional("y")?.unwrap_or(0),
    );
    object.object_type = attrs.get("type").unwrap_or_default().to_string();
    object.width = attrs.lenient("width");
    object.height = attrs.lenient("height");
    object.rotation = attrs.optional("rotation")?.unwrap_or(0.0);
    let gid: Option<u32> = attrs.lenient("gid");

    let mut shape = None;
    cursor.children("object", |cursor, child, attrs| {
        let parsed = match child {
            "ellipse" => Shape::Ellipse,
            "polygon" => Shape::Polygon(parse_points(&attrs.required_str("points")?)?),
            "polyline" => Shape::PolyLine(parse_points(&attrs.required_str("points")?)?),
            "properties" => return read_properties(cursor, &mut object.properties),
            other => return cursor.skip_unknown("object", other),
        };
        shape = Some(parsed);
        cursor.skip()
    })?;

    match (gid, shape) {
        (Some(gid), Some(ignored)) => {
            warn!(
                "Object '{}' has a gid and a {:?} shape, keeping the tile",
                object.name,
                ignored.kind()
            );
            object.set_gid(gid);
        }
        (Some(gid), None) => object.set_gid(gid),
        (None, Some(shape)) => object = object.with_shape(shape),
        (None, None) => {}
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiledmap_core::MapError;
    use tiledmap_core::components::{GridSize, Point, ShapeKind};
    use tiledmap_core::config::OpacityScale;

    fn read(xml: &str) -> Result<ObjectLayer> {
        let context = LoadContext {
            grid: GridSize::new(4, 4),
            opacity: OpacityScale::Unit,
            max_decompressed_bytes: None,
        };
        let mut cursor = XmlCursor::new(xml.as_bytes());
        let (_, attrs) = cursor.root()?;
        read_object_layer(&mut cursor, attrs, &context)
    }

    #[test]
    fn test_object_shapes() {
        let layer = read(
            r#"<objectgroup name="things" opacity="0.75">
                 <object name="door" type="warp" gid="17" x="96" y="32" width="32" height="32"/>
                 <object name="zone" x="10" y="20" width="64" height="48" rotation="45"/>
                 <object name="pond" x="0" y="0"><ellipse/></object>
                 <object name="wall" x="5" y="5"><polygon points="0,0 256,64 0,256"/></object>
                 <object name="road" x="-8" y="0">
                   <properties><property name="speed" value="3"/></properties>
                   <polyline points="0,0 10,-10"/>
                 </object>
               </objectgroup>"#,
        )
        .unwrap();

        assert_eq!(layer.opacity, 0.75);
        let shapes: Vec<_> = layer.objects.iter().map(|o| o.shape()).collect();
        assert_eq!(
            shapes,
            vec![
                ShapeKind::Tile,
                ShapeKind::Rectangle,
                ShapeKind::Ellipse,
                ShapeKind::Polygon,
                ShapeKind::PolyLine,
            ]
        );

        let door = layer.object("door").unwrap();
        assert_eq!(door.gid(), Some(17));
        assert_eq!(door.object_type, "warp");
        assert_eq!((door.width, door.height), (Some(32), Some(32)));

        assert_eq!(layer.object("zone").unwrap().rotation, 45.0);
        assert_eq!(
            layer.object("wall").unwrap().points().unwrap()[1],
            Point::new(256, 64)
        );
        let road = layer.object("road").unwrap();
        assert_eq!(road.x, -8);
        assert_eq!(road.properties.get_int("speed", 0), 3);
    }

    #[test]
    fn test_lenient_size_and_gid() {
        let layer = read(
            r#"<objectgroup name="o">
                 <object name="a" gid="-1" width="wide" height="-1" x="1" y="2"/>
               </objectgroup>"#,
        )
        .unwrap();

        let object = &layer.objects[0];
        assert_eq!(object.shape(), ShapeKind::Rectangle);
        assert_eq!((object.width, object.height), (None, None));
    }

    #[test]
    fn test_gid_wins_over_shape_child() {
        let layer = read(
            r#"<objectgroup name="o"><object gid="3" x="0" y="0"><ellipse/></object></objectgroup>"#,
        )
        .unwrap();
        assert_eq!(layer.objects[0].gid(), Some(3));
        assert_eq!(layer.objects[0].name, "");
    }

    #[test]
    fn test_strict_position() {
        let result = read(r#"<objectgroup name="o"><object x="left" y="0"/></objectgroup>"#);
        assert!(matches!(result, Err(MapError::MalformedDocument(_))));
    }

    #[test]
    fn test_bad_points() {
        let result = read(
            r#"<objectgroup name="o"><object x="0" y="0"><polygon points="0,0 1"/></object></objectgroup>"#,
        );
        assert!(matches!(result, Err(MapError::MalformedPointList(_))));
    }
}
