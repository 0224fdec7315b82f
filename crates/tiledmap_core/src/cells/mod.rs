//! Tile layer cell storage and its on-wire configuration.
//!
//! A [`CellArray`] holds one raw `u32` per grid position (row-major,
//! `index = x + y * width`) together with the encoding and compression it is
//! written with. See [`codec`] for the byte-level pipeline and [`transform`]
//! for how each value splits into a tile code and flip flags.

pub mod codec;
pub mod transform;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

pub use transform::{Cell, TileTransform, get_code, get_transform};

/// Text framing of a `<data>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// One `<tile gid=".."/>` child per cell.
    Xml,
    /// Base64 text holding little-endian `u32`s, optionally compressed.
    #[default]
    Base64,
}

impl Encoding {
    /// Parse the `encoding` attribute. Absent or empty means plain XML.
    pub fn from_attr(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("") => Ok(Encoding::Xml),
            Some("base64") => Ok(Encoding::Base64),
            Some(other) => Err(MapError::UnrecognizedEncoding(other.to_string())),
        }
    }

    /// Attribute value to write, `None` when the attribute is omitted.
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Encoding::Xml => None,
            Encoding::Base64 => Some("base64"),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Xml => f.write_str("xml"),
            Encoding::Base64 => f.write_str("base64"),
        }
    }
}

/// Compression applied to the binary payload before base64 framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    #[default]
    Gzip,
    Zlib,
}

impl Compression {
    /// Parse the `compression` attribute. Absent or empty means no compression.
    pub fn from_attr(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("") => Ok(Compression::None),
            Some("gzip") => Ok(Compression::Gzip),
            Some("zlib") => Ok(Compression::Zlib),
            Some(other) => Err(MapError::UnrecognizedCompression(other.to_string())),
        }
    }

    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some("gzip"),
            Compression::Zlib => Some("zlib"),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_attr().unwrap_or("none"))
    }
}

/// Raw cell values of one tile layer.
///
/// Reads past the end return `default_code` rather than panicking, so a layer
/// whose payload was shorter than its grid still answers every query.
#[derive(Debug, Clone, Default)]
pub struct CellArray {
    cells: Vec<u32>,
    default_code: u32,
    encoding: Encoding,
    compression: Compression,
}

// `default_code` is a read policy, not document content.
impl PartialEq for CellArray {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
            && self.encoding == other.encoding
            && self.compression == other.compression
    }
}

impl CellArray {
    /// `len` empty cells, written as gzip-compressed base64.
    pub fn new(len: usize) -> Self {
        Self::from_cells(vec![0; len])
    }

    pub fn from_cells(cells: Vec<u32>) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    /// Builder-style override of the on-wire codec.
    pub fn with_codec(mut self, encoding: Encoding, compression: Compression) -> Self {
        self.set_codec(encoding, compression);
        self
    }

    pub fn set_codec(&mut self, encoding: Encoding, compression: Compression) {
        self.encoding = encoding;
        self.compression = compression;
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn default_code(&self) -> u32 {
        self.default_code
    }

    pub fn set_default_code(&mut self, code: u32) {
        self.default_code = code;
    }

    /// Raw value at `index`, or the default code when out of range.
    pub fn get(&self, index: usize) -> u32 {
        self.cells.get(index).copied().unwrap_or(self.default_code)
    }

    /// Overwrite the raw value at `index`. Returns `false` when out of range.
    pub fn set(&mut self, index: usize, raw: u32) -> bool {
        match self.cells.get_mut(index) {
            Some(slot) => {
                *slot = raw;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Grow or shrink to `len` cells, padding with zeros.
    pub fn resize(&mut self, len: usize) {
        self.cells.resize(len, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_attr_parsing() {
        assert_eq!(Encoding::from_attr(None).unwrap(), Encoding::Xml);
        assert_eq!(Encoding::from_attr(Some("")).unwrap(), Encoding::Xml);
        assert_eq!(Encoding::from_attr(Some("base64")).unwrap(), Encoding::Base64);
        assert!(matches!(
            Encoding::from_attr(Some("csv")),
            Err(MapError::UnrecognizedEncoding(ref e)) if e == "csv"
        ));
    }

    #[test]
    fn test_compression_attr_parsing() {
        assert_eq!(Compression::from_attr(None).unwrap(), Compression::None);
        assert_eq!(Compression::from_attr(Some("gzip")).unwrap(), Compression::Gzip);
        assert_eq!(Compression::from_attr(Some("zlib")).unwrap(), Compression::Zlib);
        assert!(matches!(
            Compression::from_attr(Some("zstd")),
            Err(MapError::UnrecognizedCompression(_))
        ));
        assert_eq!(Compression::None.to_string(), "none");
    }

    #[test]
    fn test_out_of_range_reads_default() {
        let mut cells = CellArray::from_cells(vec![1, 2]);
        cells.set_default_code(99);

        assert_eq!(cells.get(1), 2);
        assert_eq!(cells.get(2), 99);
        assert!(!cells.set(5, 1));
        assert!(cells.set(0, 7));
        assert_eq!(cells.as_slice(), &[7, 2]);
    }

    #[test]
    fn test_equality_ignores_default_code() {
        let a = CellArray::from_cells(vec![1, 2, 3]);
        let mut b = a.clone();
        b.set_default_code(5);
        assert_eq!(a, b);

        let c = a.clone().with_codec(Encoding::Base64, Compression::Zlib);
        assert_ne!(a, c);
    }
}
