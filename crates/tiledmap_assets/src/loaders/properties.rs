//! `<properties>` blocks.

use std::io::Read;

use tiledmap_core::error::Result;
use tiledmap_core::properties::Properties;

use super::XmlCursor;

/// Read the `<property>` children of a `<properties>` element into `properties`.
///
/// A property without a `value` attribute takes its text content, which is how
/// Tiled stores multi-line strings. A name already present, whether from this
/// block or an earlier one on the same element, is a
/// [`MapError::DuplicateKey`](tiledmap_core::MapError::DuplicateKey).
pub(crate) fn read_properties<R: Read>(
    cursor: &mut XmlCursor<R>,
    properties: &mut Properties,
) -> Result<()> {
    cursor.children("properties", |cursor, child, attrs| match child {
        "property" => {
            let name = attrs.required_str("name")?;
            let value = match attrs.get("value") {
                Some(value) => {
                    let value = value.to_string();
                    cursor.skip()?;
                    value
                }
                None => cursor.text("property")?,
            };
            properties.insert(name, value)
        }
        other => cursor.skip_unknown("properties", other),
    })
}
