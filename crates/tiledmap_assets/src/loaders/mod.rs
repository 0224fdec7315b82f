//! TMX loaders.
//!
//! Every loader is handed the cursor right after its element's start tag and
//! must leave it right after the matching end tag. Children a loader does not
//! know are skipped whole, so newer Tiled features never break a load.

pub mod layer;
pub mod map;
pub mod object;
pub mod properties;
pub mod tileset;

use std::io::Read;
use std::str::FromStr;

use tiledmap_core::components::GridSize;
use tiledmap_core::config::OpacityScale;
use tiledmap_core::error::{MapError, Result};
use tracing::{trace, warn};
use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, XmlEvent};

/// Map-level settings every layer loader needs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoadContext {
    /// Map grid, used by layers without their own size
    pub grid: GridSize,
    pub opacity: OpacityScale,
    pub max_decompressed_bytes: Option<usize>,
}

impl LoadContext {
    pub(crate) fn opacity(&self, attrs: &Attrs) -> Result<f32> {
        Ok(attrs
            .optional::<f64>("opacity")?
            .map_or(1.0, |raw| self.opacity.normalize(raw)))
    }
}

/// Streaming position inside a TMX document.
pub(crate) struct XmlCursor<R: Read> {
    parser: EventReader<R>,
}

impl<R: Read> XmlCursor<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            parser: EventReader::new(reader),
        }
    }

    fn next_event(&mut self) -> Result<XmlEvent> {
        self.parser
            .next()
            .map_err(|e| MapError::malformed(format!("invalid XML: {e}")))
    }

    /// Advance to the root element and return its name and attributes.
    pub(crate) fn root(&mut self) -> Result<(String, Attrs)> {
        loop {
            match self.next_event()? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    let attrs = Attrs::new(&name.local_name, attributes);
                    return Ok((name.local_name, attrs));
                }
                XmlEvent::EndDocument => {
                    return Err(MapError::malformed("document has no root element"));
                }
                _ => {}
            }
        }
    }

    /// Visit the child elements of `parent` until its end tag.
    ///
    /// `visit` receives the child's name and attributes and must consume the
    /// child through its own end tag.
    pub(crate) fn children(
        &mut self,
        parent: &str,
        mut visit: impl FnMut(&mut Self, &str, Attrs) -> Result<()>,
    ) -> Result<()> {
        loop {
            match self.next_event()? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    trace!("<{parent}> child <{}>", name.local_name);
                    let attrs = Attrs::new(&name.local_name, attributes);
                    visit(self, &name.local_name, attrs)?;
                }
                // The parser guarantees tags are balanced, so this is `parent`'s end
                XmlEvent::EndElement { .. } => return Ok(()),
                XmlEvent::EndDocument => {
                    return Err(MapError::malformed(format!(
                        "document ended inside <{parent}>"
                    )));
                }
                _ => {}
            }
        }
    }

    /// Concatenated text content of the current element. Nested elements are skipped.
    pub(crate) fn text(&mut self, parent: &str) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next_event()? {
                XmlEvent::Characters(s) | XmlEvent::CData(s) | XmlEvent::Whitespace(s) => {
                    text.push_str(&s);
                }
                XmlEvent::StartElement { name, .. } => {
                    self.skip_unknown(parent, &name.local_name)?;
                }
                XmlEvent::EndElement { .. } => return Ok(text),
                XmlEvent::EndDocument => {
                    return Err(MapError::malformed(format!(
                        "document ended inside <{parent}>"
                    )));
                }
                _ => {}
            }
        }
    }

    /// Consume the rest of the current element, descendants included.
    pub(crate) fn skip(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_event()? {
                XmlEvent::StartElement { .. } => depth += 1,
                XmlEvent::EndElement { .. } => depth -= 1,
                XmlEvent::EndDocument => {
                    return Err(MapError::malformed("document ended inside an element"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// [`XmlCursor::skip`] for an element the loaders do not model.
    pub(crate) fn skip_unknown(&mut self, parent: &str, child: &str) -> Result<()> {
        warn!("Skipping unsupported <{child}> inside <{parent}>");
        self.skip()
    }
}

/// Attributes of one element with typed, error-reporting accessors.
pub(crate) struct Attrs {
    element: String,
    attributes: Vec<OwnedAttribute>,
}

impl Attrs {
    fn new(element: &str, attributes: Vec<OwnedAttribute>) -> Self {
        Self {
            element: element.to_string(),
            attributes,
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.local_name == name)
            .map(|attr| attr.value.as_str())
    }

    pub(crate) fn required_str(&self, name: &str) -> Result<String> {
        self.get(name).map(str::to_string).ok_or_else(|| {
            MapError::malformed(format!(
                "<{}> is missing required attribute '{name}'",
                self.element
            ))
        })
    }

    pub(crate) fn required<T: FromStr>(&self, name: &str) -> Result<T> {
        let value = self.required_str(name)?;
        self.parse(name, &value)
    }

    /// `Ok(None)` when absent, an error when present but unparseable.
    pub(crate) fn optional<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.get(name)
            .map(|value| self.parse(name, value))
            .transpose()
    }

    /// Tolerant read: an unparseable value is logged and treated as absent.
    /// `-1` is the conventional "unset" marker and is dropped silently.
    pub(crate) fn lenient<T: FromStr>(&self, name: &str) -> Option<T> {
        let value = self.get(name)?.trim();
        if value == "-1" {
            return None;
        }
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!(
                    "Ignoring unparseable '{name}' = {value:?} on <{}>",
                    self.element
                );
                None
            }
        }
    }

    fn parse<T: FromStr>(&self, name: &str, value: &str) -> Result<T> {
        value.trim().parse().map_err(|_| {
            MapError::malformed(format!(
                "<{}> attribute '{name}' has invalid value {value:?}",
                self.element
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(xml: &str) -> XmlCursor<&[u8]> {
        XmlCursor::new(xml.as_bytes())
    }

    #[test]
    fn test_attr_accessors() {
        let mut cursor = cursor(r#"<map width="10" bad="x" gid="-1" rot="1.5"/>"#);
        let (name, attrs) = cursor.root().unwrap();

        assert_eq!(name, "map");
        assert_eq!(attrs.required::<u32>("width").unwrap(), 10);
        assert!(matches!(
            attrs.required::<u32>("height"),
            Err(MapError::MalformedDocument(_))
        ));
        assert!(attrs.optional::<u32>("bad").is_err());
        assert_eq!(attrs.optional::<u32>("missing").unwrap(), None);
        assert_eq!(attrs.lenient::<u32>("gid"), None);
        assert_eq!(attrs.lenient::<u32>("bad"), None);
        assert_eq!(attrs.optional::<f32>("rot").unwrap(), Some(1.5));
    }

    #[test]
    fn test_children_skip_nested_unknowns() {
        let mut cursor = cursor(
            r#"<root><a/><unknown><deep><deeper/></deep></unknown><b>text</b></root>"#,
        );
        cursor.root().unwrap();

        let mut seen = Vec::new();
        let mut text = String::new();
        cursor
            .children("root", |c, child, _| {
                seen.push(child.to_string());
                match child {
                    "b" => {
                        text = c.text("b")?;
                        Ok(())
                    }
                    _ => c.skip(),
                }
            })
            .unwrap();

        assert_eq!(seen, vec!["a", "unknown", "b"]);
        assert_eq!(text, "text");
    }

    #[test]
    fn test_broken_markup_is_malformed() {
        let mut cursor = cursor("<root><a></root>");
        cursor.root().unwrap();
        let result = cursor.children("root", |c, _, _| c.skip());
        assert!(matches!(result, Err(MapError::MalformedDocument(_))));
    }
}
