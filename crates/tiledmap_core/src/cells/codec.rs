//! Layer data pipeline.
//!
//! Decoding runs text framing → decompression → fixed-width cell decoding:
//!
//! 1. plain XML: the payload is a list of numeric tile ids, one per cell
//! 2. base64: the trimmed text is base64-decoded to bytes
//! 3. the bytes are inflated according to the [`Compression`]
//! 4. every 4 bytes become one little-endian `u32`; a trailing partial word is dropped
//!
//! Encoding runs the same steps backwards and is only defined for base64.

use std::io::{Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use flate2::Compression as Level;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use tracing::{trace, warn};

use super::{CellArray, Compression, Encoding};
use crate::error::{MapError, Result};

const CELL_BYTES: usize = 4;

impl CellArray {
    /// Decode a `<data>` payload into `cell_count` cells.
    ///
    /// # Arguments
    /// * `raw` - Text content of the data element. For [`Encoding::Xml`] this is
    ///   a whitespace or comma separated list of tile ids.
    /// * `encoding`, `compression` - Parsed `<data>` attributes
    /// * `cell_count` - Grid size of the owning layer (width × height)
    /// * `max_bytes` - Ceiling for the decompressed payload, see
    ///   [`CodecConfig`](crate::config::CodecConfig)
    ///
    /// Extra cells beyond `cell_count` are dropped; a short payload leaves the
    /// remaining cells reading as the default code.
    pub fn decode(
        raw: &[u8],
        encoding: Encoding,
        compression: Compression,
        cell_count: usize,
        max_bytes: Option<usize>,
    ) -> Result<CellArray> {
        match encoding {
            Encoding::Xml => {
                if compression != Compression::None {
                    warn!("Ignoring {compression} compression on plain XML layer data");
                }
                Ok(CellArray::from_tile_ids(parse_tile_ids(raw)?, cell_count))
            }
            Encoding::Base64 => {
                let packed = BASE64
                    .decode(raw.trim_ascii())
                    .map_err(|e| MapError::malformed(format!("invalid base64 layer data: {e}")))?;
                let bytes = decompress(&packed, compression, max_bytes)?;
                let cells = fit_to_grid(bytes_to_cells(&bytes), cell_count);
                Ok(CellArray::from_cells(cells).with_codec(encoding, compression))
            }
        }
    }

    /// Cells of a plain XML `<data>` block whose `<tile>` ids are already parsed.
    ///
    /// Applies the same grid fitting as [`CellArray::decode`].
    pub fn from_tile_ids(ids: Vec<u32>, cell_count: usize) -> CellArray {
        CellArray::from_cells(fit_to_grid(ids, cell_count))
            .with_codec(Encoding::Xml, Compression::None)
    }

    /// Encode the cells as the text payload of a `<data>` element, using the
    /// array's own encoding and compression.
    ///
    /// Plain XML has no text payload (the writer emits `<tile>` children), so it
    /// fails with [`MapError::UnimplementedCodec`].
    pub fn encode(&self) -> Result<String> {
        if self.encoding != Encoding::Base64 {
            return Err(MapError::UnimplementedCodec {
                encoding: self.encoding,
                compression: self.compression,
            });
        }

        let bytes = cells_to_bytes(self.as_slice());
        let packed = compress(&bytes, self.compression)?;
        trace!(
            "Encoded {} cells into {} {} bytes",
            self.len(),
            packed.len(),
            self.compression
        );
        Ok(BASE64.encode(packed))
    }
}

fn fit_to_grid(mut cells: Vec<u32>, cell_count: usize) -> Vec<u32> {
    if cells.len() > cell_count {
        warn!(
            "Layer data holds {} cells but the grid has {}, dropping the rest",
            cells.len(),
            cell_count
        );
        cells.truncate(cell_count);
    } else if cells.len() < cell_count {
        warn!(
            "Layer data holds {} cells but the grid has {}, missing cells read as default",
            cells.len(),
            cell_count
        );
    }
    cells
}

fn parse_tile_ids(raw: &[u8]) -> Result<Vec<u32>> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| MapError::malformed(format!("layer data is not UTF-8: {e}")))?;
    text.split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u32>()
                .map_err(|_| MapError::malformed(format!("invalid tile id {token:?}")))
        })
        .collect()
}

fn decompress(packed: &[u8], compression: Compression, max_bytes: Option<usize>) -> Result<Vec<u8>> {
    match compression {
        Compression::None => {
            if let Some(limit) = max_bytes
                && packed.len() > limit
            {
                return Err(MapError::PayloadTooLarge { limit });
            }
            Ok(packed.to_vec())
        }
        Compression::Gzip => read_limited(GzDecoder::new(packed), compression, max_bytes),
        Compression::Zlib => read_limited(ZlibDecoder::new(packed), compression, max_bytes),
    }
}

/// Inflate at most `max_bytes + 1` bytes so an oversized payload is detected
/// without materializing it.
fn read_limited(
    mut decoder: impl Read,
    compression: Compression,
    max_bytes: Option<usize>,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let inflated = match max_bytes {
        Some(limit) => decoder.take(limit as u64 + 1).read_to_end(&mut out),
        None => decoder.read_to_end(&mut out),
    };
    inflated.map_err(|e| {
        MapError::malformed(format!("failed to inflate {compression} layer data: {e}"))
    })?;

    if let Some(limit) = max_bytes
        && out.len() > limit
    {
        return Err(MapError::PayloadTooLarge { limit });
    }
    Ok(out)
}

fn compress(bytes: &[u8], compression: Compression) -> Result<Vec<u8>> {
    let packed = match compression {
        Compression::None => bytes.to_vec(),
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Level::default());
            encoder.write_all(bytes)?;
            encoder.finish()?
        }
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Level::default());
            encoder.write_all(bytes)?;
            encoder.finish()?
        }
    };
    Ok(packed)
}

fn bytes_to_cells(bytes: &[u8]) -> Vec<u32> {
    let chunks = bytes.chunks_exact(CELL_BYTES);
    if !chunks.remainder().is_empty() {
        trace!(
            "Discarding {} trailing byte(s) of layer data",
            chunks.remainder().len()
        );
    }
    chunks
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect()
}

fn cells_to_bytes(cells: &[u32]) -> Vec<u8> {
    cells.iter().flat_map(|cell| cell.to_le_bytes()).collect()
}
