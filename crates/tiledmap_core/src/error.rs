//! Error type shared by the document model, the cell codec and the TMX loaders.

use thiserror::Error;

use crate::cells::{Compression, Encoding};

/// Result alias used throughout `tiledmap`.
pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// Everything that can go wrong while building, loading or saving a map document.
///
/// Lookup misses are normally reported as `Option::None`; [`MapError::NotFound`]
/// exists for callers that want to turn a miss into an error with `ok_or_else`.
#[derive(Debug, Error)]
pub enum MapError {
    /// A required attribute is missing or unparseable, or the markup itself is broken.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Unrecognized orientation: {0:?}")]
    UnrecognizedOrientation(String),

    #[error("Unrecognized layer data encoding: {0:?}")]
    UnrecognizedEncoding(String),

    #[error("Unrecognized layer data compression: {0:?}")]
    UnrecognizedCompression(String),

    /// The encoding/compression pair is valid but no writer exists for it.
    #[error("No codec implemented for {encoding} encoding with {compression} compression")]
    UnimplementedCodec {
        encoding: Encoding,
        compression: Compression,
    },

    #[error("Malformed point list: {0:?}")]
    MalformedPointList(String),

    /// A name is already taken inside a keyed collection.
    #[error("Duplicate key: {0:?}")]
    DuplicateKey(String),

    #[error("Decompressed layer data exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    /// Shorthand for a [`MapError::MalformedDocument`] with a formatted reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        MapError::MalformedDocument(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_width(value: &str) -> Result<u32, std::num::ParseIntError> {
        value.parse()
    }

    #[test]
    fn test_result_alias_takes_other_error_types() {
        assert_eq!(parse_width("12"), Ok(12));
        assert!(parse_width("wide").is_err());

        let missing: Result<()> = Err(MapError::NotFound("tile layer 'sky'".into()));
        assert_eq!(
            missing.unwrap_err().to_string(),
            "Not found: tile layer 'sky'"
        );
    }
}
