//! Tile layers and object layers.
//!
//! A layer never points back at its document. Sizing that a layer inherits
//! from the map is copied in when the layer is added to a
//! [`Document`](super::map::Document) and refreshed when the document is resized.

use crate::cells::{Cell, CellArray};
use crate::named::Named;
use crate::properties::Properties;

use super::object::TiledObject;

/// Grid size of a layer in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width × height`, saturating at `usize::MAX` on narrow targets.
    pub fn cell_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Row-major index of `(x, y)`, `None` outside `[0, width) × [0, height)`.
    pub fn index(self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(x as usize + y as usize * self.width as usize)
    }
}

/// A grid of packed cells (`<layer>`).
///
/// # Example
///
/// ```rust
/// use tiledmap_core::components::layer::TileLayer;
/// use tiledmap_core::cells::TileTransform;
///
/// let mut layer = TileLayer::with_size("ground", 4, 3);
/// layer.set_cell(1, 2, 7 | 0x8000_0000);
///
/// let cell = layer.cell_at(1, 2);
/// assert_eq!(cell.code, 7);
/// assert_eq!(cell.transform, TileTransform::HORIZONTAL);
/// assert_eq!(layer.cell_at(-1, 0).code, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,

    /// Normalized to `0.0..=1.0`
    pub opacity: f32,

    pub properties: Properties,

    grid: GridSize,
    explicit_size: bool,
    cells: CellArray,
}

impl TileLayer {
    /// A layer that takes its size from the document it is added to.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            properties: Properties::new(),
            grid: GridSize::default(),
            explicit_size: false,
            cells: CellArray::default(),
        }
    }

    /// A layer with its own `width` × `height`, filled with empty cells.
    pub fn with_size(name: impl Into<String>, width: u32, height: u32) -> Self {
        let grid = GridSize::new(width, height);
        Self {
            grid,
            explicit_size: true,
            cells: CellArray::new(grid.cell_count()),
            ..Self::new(name)
        }
    }

    /// A layer wrapping cells that were already decoded. `size` is the layer's
    /// own size, `None` to take the document's. Nothing is allocated beyond `cells`.
    pub fn from_decoded(name: impl Into<String>, size: Option<GridSize>, cells: CellArray) -> Self {
        Self {
            grid: size.unwrap_or_default(),
            explicit_size: size.is_some(),
            cells,
            ..Self::new(name)
        }
    }

    /// Replace the cell storage, including its encoding and compression.
    pub fn with_cells(mut self, cells: CellArray) -> Self {
        self.cells = cells;
        self
    }

    /// Copy the document's size into a layer that has none of its own.
    ///
    /// Empty storage is sized to the new grid; existing cells are kept as-is.
    pub(crate) fn inherit_size(&mut self, grid: GridSize) {
        if self.explicit_size {
            return;
        }
        self.grid = grid;
        if self.cells.is_empty() {
            self.cells.resize(grid.cell_count());
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width
    }

    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Whether the layer carries its own `width`/`height` rather than the map's.
    pub fn has_explicit_size(&self) -> bool {
        self.explicit_size
    }

    pub fn cell_array(&self) -> &CellArray {
        &self.cells
    }

    pub fn cell_array_mut(&mut self) -> &mut CellArray {
        &mut self.cells
    }

    /// Raw packed value at `(x, y)`, or the default tile code when outside the grid.
    pub fn raw_at(&self, x: i32, y: i32) -> u32 {
        match self.grid.index(x, y) {
            Some(index) => self.cells.get(index),
            None => self.cells.default_code(),
        }
    }

    /// Tile code and transform flags at `(x, y)`.
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        Cell::from_raw(self.raw_at(x, y))
    }

    /// Store a raw packed value. Returns `false` when `(x, y)` is outside the grid.
    pub fn set_cell(&mut self, x: i32, y: i32, raw: u32) -> bool {
        match self.grid.index(x, y) {
            Some(index) => self.cells.set(index, raw),
            None => false,
        }
    }

    pub fn default_tile_code(&self) -> u32 {
        self.cells.default_code()
    }

    pub fn set_default_tile_code(&mut self, code: u32) {
        self.cells.set_default_code(code);
    }

    /// Every grid position with its decoded cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, Cell)> + '_ {
        let width = self.grid.width;
        (0..self.grid.height).flat_map(move |y| {
            (0..width).map(move |x| (x, y, self.cell_at(x as i32, y as i32)))
        })
    }
}

impl Named for TileLayer {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Free-form objects placed in map space (`<objectgroup>`).
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLayer {
    pub name: String,

    /// Normalized to `0.0..=1.0`
    pub opacity: f32,

    pub objects: Vec<TiledObject>,

    pub properties: Properties,

    grid: GridSize,
}

impl ObjectLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            objects: Vec::new(),
            properties: Properties::new(),
            grid: GridSize::default(),
        }
    }

    pub fn with_object(mut self, object: TiledObject) -> Self {
        self.objects.push(object);
        self
    }

    pub(crate) fn inherit_size(&mut self, grid: GridSize) {
        self.grid = grid;
    }

    /// Map width in cells.
    pub fn width(&self) -> u32 {
        self.grid.width
    }

    /// Map height in cells.
    pub fn height(&self) -> u32 {
        self.grid.height
    }

    /// First object called `name`. Object names are not unique.
    pub fn object(&self, name: &str) -> Option<&TiledObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn objects_of_type<'a>(
        &'a self,
        object_type: &'a str,
    ) -> impl Iterator<Item = &'a TiledObject> + 'a {
        self.objects
            .iter()
            .filter(move |object| object.object_type == object_type)
    }
}

impl Named for ObjectLayer {
    fn name(&self) -> &str {
        &self.name
    }
}
