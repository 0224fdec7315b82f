//! Objects placed on object layers.

use std::fmt;

use crate::error::{MapError, Result};
use crate::properties::Properties;

/// A vertex of a polygon or polyline, in pixels relative to the object's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Which kind of shape an object is, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Tile,
    Rectangle,
    Ellipse,
    Polygon,
    PolyLine,
}

/// Shape payload of a [`TiledObject`]. Exactly one variant is ever populated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Shape {
    /// Plain box spanned by the object's size. The fallback when nothing else is set.
    #[default]
    Rectangle,
    /// Tile stamp referencing a global tile id.
    Tile { gid: u32 },
    Ellipse,
    Polygon(Vec<Point>),
    PolyLine(Vec<Point>),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle => ShapeKind::Rectangle,
            Shape::Tile { .. } => ShapeKind::Tile,
            Shape::Ellipse => ShapeKind::Ellipse,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::PolyLine(_) => ShapeKind::PolyLine,
        }
    }
}

/// An entity placed in map space: tile stamp, rectangle, ellipse, polygon or polyline.
///
/// # Example
///
/// ```rust
/// use tiledmap_core::components::object::{Point, ShapeKind, TiledObject};
///
/// let mut door = TiledObject::new("door", 96, 32);
/// door.set_gid(17);
/// assert_eq!(door.shape(), ShapeKind::Tile);
///
/// door.set_shape(ShapeKind::Polygon);
/// door.points_mut().unwrap().push(Point::new(0, 0));
/// assert_eq!(door.shape(), ShapeKind::Polygon);
/// assert_eq!(door.gid(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TiledObject {
    pub name: String,

    /// Free-form `type` attribute.
    pub object_type: String,

    /// Position in pixels.
    pub x: i32,
    pub y: i32,

    /// Size in pixels, `None` when not set in the document.
    pub width: Option<u32>,
    pub height: Option<u32>,

    /// Clockwise rotation in degrees.
    pub rotation: f32,

    pub properties: Properties,

    shape: Shape,
}

impl TiledObject {
    /// A rectangle object at `(x, y)` with no size.
    pub fn new(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = object_type.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn shape_data(&self) -> &Shape {
        &self.shape
    }

    /// Switch to `kind`, discarding any previous payload.
    ///
    /// Polygon and polyline start with an empty point list. Switching to
    /// [`ShapeKind::Tile`] keeps an existing GID but otherwise leaves the object
    /// a rectangle until [`TiledObject::set_gid`] is called.
    pub fn set_shape(&mut self, kind: ShapeKind) {
        self.shape = match kind {
            ShapeKind::Tile => match self.shape {
                Shape::Tile { gid } => Shape::Tile { gid },
                _ => Shape::Rectangle,
            },
            ShapeKind::Rectangle => Shape::Rectangle,
            ShapeKind::Ellipse => Shape::Ellipse,
            ShapeKind::Polygon => Shape::Polygon(Vec::new()),
            ShapeKind::PolyLine => Shape::PolyLine(Vec::new()),
        };
    }

    /// Global tile id when the object is a tile stamp.
    pub fn gid(&self) -> Option<u32> {
        match self.shape {
            Shape::Tile { gid } => Some(gid),
            _ => None,
        }
    }

    /// Turn the object into a tile stamp of `gid`, clearing any other shape.
    pub fn set_gid(&mut self, gid: u32) {
        self.shape = Shape::Tile { gid };
    }

    /// Drop the tile reference; the object becomes a rectangle.
    pub fn clear_gid(&mut self) {
        if matches!(self.shape, Shape::Tile { .. }) {
            self.shape = Shape::Rectangle;
        }
    }

    /// Vertices of a polygon or polyline.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.shape {
            Shape::Polygon(points) | Shape::PolyLine(points) => Some(points),
            _ => None,
        }
    }

    pub fn points_mut(&mut self) -> Option<&mut Vec<Point>> {
        match &mut self.shape {
            Shape::Polygon(points) | Shape::PolyLine(points) => Some(points),
            _ => None,
        }
    }
}

/// Parse a `points` attribute such as `"0,0 256,64 -192,192"`.
///
/// Every whitespace separated token must be exactly two comma separated integers.
pub fn parse_points(s: &str) -> Result<Vec<Point>> {
    s.split_whitespace()
        .map(|token| {
            let malformed = || MapError::MalformedPointList(token.to_string());
            let (x, y) = token.split_once(',').ok_or_else(malformed)?;
            let x = x.parse::<i32>().map_err(|_| malformed())?;
            let y = y.parse::<i32>().map_err(|_| malformed())?;
            Ok(Point { x, y })
        })
        .collect()
}

/// Inverse of [`parse_points`].
pub fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
