//! `<layer>` elements and their `<data>` payload.

use std::io::Read;

use tiledmap_core::cells::{CellArray, Compression, Encoding};
use tiledmap_core::components::{GridSize, TileLayer};
use tiledmap_core::error::{MapError, Result};
use tiledmap_core::properties::Properties;
use tracing::{debug, warn};

use super::properties::read_properties;
use super::{Attrs, LoadContext, XmlCursor};

pub(crate) fn read_tile_layer<R: Read>(
    cursor: &mut XmlCursor<R>,
    attrs: Attrs,
    context: &LoadContext,
) -> Result<TileLayer> {
    let name = attrs.required_str("name")?;
    let opacity = context.opacity(&attrs)?;

    let explicit = match (attrs.optional::<u32>("width")?, attrs.optional::<u32>("height")?) {
        (Some(width), Some(height)) => Some(GridSize::new(width, height)),
        (None, None) => None,
        _ => {
            warn!("Layer '{name}' sets only one of width/height, using the map size");
            None
        }
    };
    let grid = explicit.unwrap_or(context.grid);
    check_grid_bytes(&name, grid, context.max_decompressed_bytes)?;

    let mut cells: Option<CellArray> = None;
    let mut properties = Properties::new();
    cursor.children("layer", |cursor, child, attrs| match child {
        "data" => {
            if cells.is_some() {
                return Err(MapError::malformed(format!(
                    "layer '{name}' has more than one <data> element"
                )));
            }
            cells = Some(read_data(cursor, attrs, grid, context)?);
            Ok(())
        }
        "properties" => read_properties(cursor, &mut properties),
        other => cursor.skip_unknown("layer", other),
    })?;

    let cells = cells.ok_or_else(|| {
        MapError::malformed(format!("layer '{name}' has no <data> element"))
    })?;
    debug!(
        "Loaded layer '{name}' ({} cells, {} / {})",
        cells.len(),
        cells.encoding(),
        cells.compression()
    );

    let mut layer = TileLayer::from_decoded(name, explicit, cells);
    layer.opacity = opacity;
    layer.properties = properties;
    Ok(layer)
}

/// A grid whose decoded cells would not fit in `max_bytes` is rejected before
/// any payload is read. A grid too large to address is always rejected.
fn check_grid_bytes(name: &str, grid: GridSize, max_bytes: Option<usize>) -> Result<()> {
    let bytes = grid.cell_count().checked_mul(4);
    match (bytes, max_bytes) {
        (Some(bytes), Some(limit)) if bytes > limit => {
            warn!(
                "Layer '{name}' is {}x{} ({bytes} bytes), over the {limit} byte limit",
                grid.width, grid.height
            );
            Err(MapError::PayloadTooLarge { limit })
        }
        (None, limit) => {
            warn!(
                "Layer '{name}' is {}x{}, too large to address",
                grid.width, grid.height
            );
            Err(MapError::PayloadTooLarge {
                limit: limit.unwrap_or(usize::MAX),
            })
        }
        _ => Ok(()),
    }
}

fn read_data<R: Read>(
    cursor: &mut XmlCursor<R>,
    attrs: Attrs,
    grid: GridSize,
    context: &LoadContext,
) -> Result<CellArray> {
    let encoding = Encoding::from_attr(attrs.get("encoding"))?;
    let compression = Compression::from_attr(attrs.get("compression"))?;

    match encoding {
        Encoding::Base64 => CellArray::decode(
            cursor.text("data")?.as_bytes(),
            encoding,
            compression,
            grid.cell_count(),
            context.max_decompressed_bytes,
        ),
        Encoding::Xml => {
            if compression != Compression::None {
                warn!("Ignoring {compression} compression on plain XML layer data");
            }
            let mut ids: Vec<u32> = Vec::new();
            cursor.children("data", |cursor, child, attrs| match child {
                "tile" => {
                    // An empty <tile/> is an empty cell
                    ids.push(attrs.optional("gid")?.unwrap_or(0));
                    cursor.skip()
                }
                other => cursor.skip_unknown("data", other),
            })?;
            Ok(CellArray::from_tile_ids(ids, grid.cell_count()))
        }
    }
}
