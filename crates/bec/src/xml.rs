//! A small owned element tree for BEC documents.
//!
//! BEC files only use element nesting and text content, so attributes,
//! comments and processing instructions are dropped on read. Child lookups
//! are case-insensitive.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::BecError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_owned(), ..Self::default() }
    }

    pub fn with_text(name: &str, text: impl Into<String>) -> Self {
        Self { name: name.to_owned(), text: text.into(), children: Vec::new() }
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append a text-only child.
    pub fn push_text(&mut self, name: &str, text: impl Into<String>) {
        self.children.push(Element::with_text(name, text));
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(name))
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.is(name))
    }

    /// Trimmed text of the first `name` child, or `None` when absent or blank.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.first_child(name)
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
    }

    /// Numeric text of the first `name` child.
    ///
    /// # Errors
    /// [`BecError::InvalidNumber`] if the text is not a number.
    pub fn child_f64(&self, name: &str) -> Result<Option<f64>, BecError> {
        let Some(text) = self.child_text(name) else {
            return Ok(None);
        };
        text.parse::<f64>().map(Some).map_err(|_| BecError::InvalidNumber {
            element: self.name.clone(),
            child: name.to_owned(),
            value: text.to_owned(),
        })
    }

    /// Every element called `name` below this one, depth first in document
    /// order.
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.is(name) {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Parse a document and return its root element.
    ///
    /// # Errors
    /// [`BecError::Xml`] for malformed XML, an unclosed element, a missing
    /// root or more than one root.
    pub fn parse(text: &str) -> Result<Element, BecError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| BecError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;
            match event {
                Event::Start(start) => {
                    stack.push(Element::new(&String::from_utf8_lossy(start.name().as_ref())));
                }
                Event::Empty(start) => {
                    let element = Element::new(&String::from_utf8_lossy(start.name().as_ref()));
                    close(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| BecError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| BecError::Xml("closing tag without an open element".into()))?;
                    close(element, &mut stack, &mut root)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(BecError::Xml(format!("element <{}> is never closed", open.name)));
        }
        root.ok_or_else(|| BecError::Xml("document has no root element".into()))
    }

    // -----------------------------------------------------------------------
    // Writing
    // -----------------------------------------------------------------------

    /// Serialize as an indented UTF-8 document with an XML declaration.
    ///
    /// # Errors
    /// [`BecError::Xml`] if the writer fails.
    pub fn to_xml(&self) -> Result<String, BecError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| BecError::Xml(e.to_string()))?;
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|e| BecError::Xml(e.to_string()))
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), BecError> {
        let name = self.name.as_str();
        if self.children.is_empty() && self.text.is_empty() {
            return writer
                .write_event(Event::Empty(BytesStart::new(name)))
                .map_err(|e| BecError::Xml(e.to_string()));
        }
        writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(|e| BecError::Xml(e.to_string()))?;
        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(|e| BecError::Xml(e.to_string()))?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(|e| BecError::Xml(e.to_string()))
    }
}

/// Hand a finished element to its parent, or make it the root.
fn close(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<(), BecError> {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(BecError::Xml(format!(
                "second root element <{}> after the document root",
                element.name
            )))
        }
    }
    Ok(())
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<SDDXML>
  <Proj>
    <Name>Small Office</Name>
    <Bldg>
      <ThrmlZn><Name>Core</Name><Mult>2</Mult></ThrmlZn>
      <ThrmlZn><Name>North &amp; East</Name></ThrmlZn>
      <AirSys>
        <Name>RTU-1</Name>
        <AirSeg><Type>Supply</Type><Fan index="0"><Name>Fan</Name></Fan></AirSeg>
      </AirSys>
    </Bldg>
  </Proj>
</SDDXML>
"#;

    #[test]
    fn parses_nesting_text_and_entities() {
        let root = Element::parse(SAMPLE).unwrap();
        assert_eq!(root.name, "SDDXML");
        let proj = root.first_child("proj").unwrap();
        assert_eq!(proj.child_text("Name"), Some("Small Office"));

        let zones = root.descendants("ThrmlZn");
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].child_f64("Mult").unwrap(), Some(2.0));
        assert_eq!(zones[1].child_text("Name"), Some("North & East"));
        assert_eq!(zones[1].child_f64("Mult").unwrap(), None);
    }

    #[test]
    fn descendants_walk_depth_first() {
        let root = Element::parse(SAMPLE).unwrap();
        let names: Vec<&str> = root
            .descendants("name")
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(names, vec!["Small Office", "Core", "North & East", "RTU-1", "Fan"]);
    }

    #[test]
    fn bad_number_is_reported_with_its_element() {
        let el = Element::parse("<Fan><TotEff>high</TotEff></Fan>").unwrap();
        let err = el.child_f64("TotEff").unwrap_err();
        assert!(matches!(err, BecError::InvalidNumber { ref element, ref value, .. }
            if element == "Fan" && value == "high"));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(Element::parse("<A><B></A>"), Err(BecError::Xml(_))));
        assert!(matches!(Element::parse("<A><B>"), Err(BecError::Xml(_))));
        assert!(matches!(Element::parse(""), Err(BecError::Xml(_))));
        assert!(matches!(Element::parse("<A/><B/>"), Err(BecError::Xml(_))));
    }

    #[test]
    fn written_document_parses_back() {
        let mut root = Element::new("BECInput");
        let mut zone = Element::new("ThrmlZn");
        zone.push_text("Name", "Zone <1>");
        zone.push_text("Mult", "3");
        root.push(zone);
        root.push(Element::new("AirSys"));

        let text = root.to_xml().unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<AirSys/>"));
        assert_eq!(Element::parse(&text).unwrap(), root);
    }
}
