//! Owned SVG document tree.
//!
//! A small DOM built on `quick-xml`: each element owns its children, and
//! attribute order, text, CDATA, comments and the XML declaration survive a
//! parse/serialize cycle.

use std::{fs, io, path::Path};

use quick_xml::{
    Reader, Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use thiserror::Error;

/// SVG parsing and serialization errors.
#[derive(Debug, Error)]
pub enum SvgError {
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for SVG operations.
pub type Result<T> = std::result::Result<T, SvgError>;

/// The `<?xml ...?>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A parsed SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    declaration: Option<Declaration>,
    root: Element,
}

/// An element with ordered attributes and owned children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

/// A child node of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

impl SvgDocument {
    /// Parse a document from a string.
    pub fn parse(source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().check_end_names = true;

        let mut declaration = None;
        let mut root: Option<Element> = None;
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| malformed(format!("{e} at byte {}", reader.error_position())))?;

            match event {
                Event::Eof => break,
                Event::Decl(decl) => {
                    declaration = Some(read_declaration(&decl)?);
                }
                Event::Start(start) => {
                    stack.push(read_element(&start)?);
                }
                Event::Empty(empty) => {
                    let element = read_element(&empty)?;
                    attach(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("closing tag without matching opening tag"))?;
                    attach(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    let content = text.unescape().map_err(|e| malformed(e.to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(content.into_owned())),
                        None if content.trim().is_empty() => {}
                        None => return Err(malformed("text content outside the root element")),
                    }
                }
                Event::CData(cdata) => {
                    let content = String::from_utf8_lossy(&cdata).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::CData(content));
                    }
                }
                Event::Comment(comment) => {
                    let content = String::from_utf8_lossy(&comment).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Comment(content));
                    }
                }
                // Processing instructions and DOCTYPE carry nothing a glyph needs.
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(malformed(format!("unclosed element <{}>", open.name)));
        }

        let root = root.ok_or_else(|| malformed("document has no root element"))?;
        Ok(Self { declaration, root })
    }

    /// Read and parse a document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The root element, mutably.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// The XML declaration, if the source had one.
    #[must_use]
    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    /// Serialize the document.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        if let Some(decl) = &self.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new(
                    &decl.version,
                    decl.encoding.as_deref(),
                    decl.standalone.as_deref(),
                )))
                .map_err(write_error)?;
        }
        self.root.write_to(&mut writer)?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| SvgError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Serialize the document to a file.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_xml()?)?;
        Ok(())
    }
}

impl Element {
    /// Create an element without attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder-style child element append.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Qualified tag name, e.g. `svg` or `svg:defs`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name without namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Remove an attribute and return its value.
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(index).1)
    }

    /// All child nodes.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Child elements, mutably.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Concatenated text and CDATA of the direct children.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Visit this element and every descendant in pre-order.
    pub fn walk(&self, visit: &mut impl FnMut(&Element)) {
        visit(self);
        for child in self.child_elements() {
            child.walk(visit);
        }
    }

    fn write_to<W: io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(write_error)?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(write_error)?;
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_to(writer)?,
                Node::Text(text) => writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(write_error)?,
                Node::CData(content) => writer
                    .write_event(Event::CData(BytesCData::new(content.as_str())))
                    .map_err(write_error)?,
                Node::Comment(comment) => writer
                    .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))
                    .map_err(write_error)?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(write_error)?;
        Ok(())
    }
}

fn malformed(message: impl Into<String>) -> SvgError {
    SvgError::Malformed(message.into())
}

fn write_error(e: impl std::fmt::Display) -> SvgError {
    SvgError::Io(io::Error::other(e.to_string()))
}

fn read_element(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn read_declaration(decl: &BytesDecl<'_>) -> Result<Declaration> {
    let version = decl.version().map_err(|e| malformed(e.to_string()))?;
    let encoding = decl
        .encoding()
        .transpose()
        .map_err(|e| malformed(e.to_string()))?;
    let standalone = decl
        .standalone()
        .transpose()
        .map_err(|e| malformed(e.to_string()))?;

    Ok(Declaration {
        version: String::from_utf8_lossy(&version).into_owned(),
        encoding: encoding.map(|e| String::from_utf8_lossy(&e).into_owned()),
        standalone: standalone.map(|s| String::from_utf8_lossy(&s).into_owned()),
    })
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(malformed(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}
