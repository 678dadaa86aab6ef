//! Owned XML tree for structural rewriting of package parts.
//!
//! Parts are parsed once with quick-xml's pull reader into an owned tree,
//! rewritten through element and attribute accessors, then serialized back.
//! Character data is kept exactly as read (entity references included) and
//! attribute values are stored in their escaped form, so a part that is
//! parsed and written without changes comes back byte-for-byte equivalent
//! apart from empty-element normalization (`<a></a>` becomes `<a/>`).

use super::escape::{escape_xml, unescape_xml};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;
use std::borrow::Cow;
use thiserror::Error;

/// Errors raised while parsing an XML part.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("end tag </{0}> has no matching start tag")]
    UnexpectedEnd(String),

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("element <{0}> found after the root element")]
    MultipleRoots(String),
}

/// A node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data, escaped as it appears in the source.
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    /// Content of `<?xml ...?>` without the delimiters.
    Declaration(String),
    DocType(String),
}

impl XmlNode {
    /// The element behind this node, if it is one.
    #[inline]
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Whether this node is an element with the given qualified name.
    #[inline]
    pub fn is_element(&self, name: &str) -> bool {
        matches!(self, XmlNode::Element(el) if el.name == name)
    }

    fn write_to(&self, out: &mut String) {
        match self {
            XmlNode::Element(el) => el.write_to(out),
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            },
            XmlNode::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            },
            XmlNode::ProcessingInstruction(pi) | XmlNode::Declaration(pi) => {
                out.push_str("<?");
                out.push_str(pi);
                out.push_str("?>");
            },
            XmlNode::DocType(doctype) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(doctype);
                out.push('>');
            },
        }
    }
}

impl From<XmlElement> for XmlNode {
    fn from(el: XmlElement) -> Self {
        XmlNode::Element(el)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct XmlAttribute {
    name: String,
    /// Escaped value, without the surrounding quotes
    raw_value: String,
}

/// An element with its qualified name, attributes and children.
///
/// Names are compared as written (`w:style`, `Relationship`); no namespace
/// resolution takes place, which matches how OOXML parts are addressed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attributes: SmallVec<[XmlAttribute; 4]>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: SmallVec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`push_child`](Self::push_child).
    pub fn with_child(mut self, child: impl Into<XmlNode>) -> Self {
        self.push_child(child);
        self
    }

    /// The qualified name, e.g. `w:style`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get an attribute value, unescaped.
    pub fn attr(&self, name: &str) -> Option<Cow<'_, str>> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| unescape_xml(&a.raw_value))
    }

    #[inline]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Set an attribute, replacing an existing value in place or appending.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let raw_value = escape_xml(value).into_owned();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.raw_value = raw_value,
            None => self.attributes.push(XmlAttribute {
                name: name.to_string(),
                raw_value,
            }),
        }
    }

    /// Iterate over `(name, unescaped value)` pairs in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        self.attributes
            .iter()
            .map(|a| (a.name.as_str(), unescape_xml(&a.raw_value)))
    }

    /// Rewrite attribute values in place.
    ///
    /// `f` receives each attribute's name and unescaped value and returns the
    /// replacement, or `None` to keep it. Returns the number of rewrites.
    pub fn rewrite_attrs<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&str, &str) -> Option<String>,
    {
        let mut rewritten = 0;
        for attr in self.attributes.iter_mut() {
            let replacement = f(&attr.name, &unescape_xml(&attr.raw_value));
            if let Some(value) = replacement {
                attr.raw_value = escape_xml(&value).into_owned();
                rewritten += 1;
            }
        }
        rewritten
    }

    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    /// Replace all children.
    #[inline]
    pub fn set_children(&mut self, children: Vec<XmlNode>) {
        self.children = children;
    }

    /// Detach and return all children.
    #[inline]
    pub fn take_children(&mut self) -> Vec<XmlNode> {
        std::mem::take(&mut self.children)
    }

    #[inline]
    pub fn push_child(&mut self, child: impl Into<XmlNode>) {
        self.children.push(child.into());
    }

    /// Iterate over direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(XmlNode::as_element_mut)
    }

    /// First direct child element with the given name.
    pub fn first_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|el| el.name == name)
    }

    pub fn first_child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.child_elements_mut().find(|el| el.name == name)
    }

    /// All descendant elements named `name`, in document order.
    ///
    /// The element itself is not included, mirroring DOM `getElementsByTagName`.
    pub fn find_all(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        for child in self.child_elements() {
            if child.name == name {
                found.push(child);
            }
            child.collect_named(name, found);
        }
    }

    /// Call `f` on every descendant element named `name`, in document order.
    pub fn for_each_mut<F>(&mut self, name: &str, f: &mut F)
    where
        F: FnMut(&mut XmlElement),
    {
        for child in self.child_elements_mut() {
            if child.name == name {
                f(child);
            }
            child.for_each_mut(name, f);
        }
    }

    /// Call `f` on every descendant element, in document order.
    pub fn visit_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut XmlElement),
    {
        for child in self.child_elements_mut() {
            f(child);
            child.visit_mut(f);
        }
    }

    /// Copy of this element with its attributes but no children.
    pub fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        }
    }

    /// Serialize this element and its subtree.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(256);
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attr in &self.attributes {
            out.push(' ');
            out.push_str(&attr.name);
            out.push_str("=\"");
            // Values read from single-quoted attributes may carry a bare quote
            if attr.raw_value.contains('"') {
                out.push_str(&attr.raw_value.replace('"', "&quot;"));
            } else {
                out.push_str(&attr.raw_value);
            }
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut attributes = SmallVec::new();
        for attr in start.attributes() {
            let attr = attr?;
            attributes.push(XmlAttribute {
                name: std::str::from_utf8(attr.key.as_ref())?.to_string(),
                raw_value: std::str::from_utf8(&attr.value)?.to_string(),
            });
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }
}

/// A parsed XML part: prolog, root element and trailing misc nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    prolog: Vec<XmlNode>,
    root: XmlElement,
    epilog: Vec<XmlNode>,
}

impl XmlDocument {
    /// Standard declaration written into parts created from scratch.
    pub const DECLARATION: &'static str = r#"xml version="1.0" encoding="UTF-8" standalone="yes""#;

    /// Wrap a root element with the standard OOXML declaration.
    pub fn new(root: XmlElement) -> Self {
        Self {
            prolog: vec![
                XmlNode::Declaration(Self::DECLARATION.to_string()),
                XmlNode::Text("\r\n".to_string()),
            ],
            root,
            epilog: Vec::new(),
        }
    }

    /// Parse a complete XML document.
    pub fn parse(xml: &[u8]) -> Result<Self, XmlError> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut builder = TreeBuilder::default();
        let mut buf = Vec::with_capacity(1024);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => builder.open(XmlElement::from_start(&e)?),
                Ok(Event::Empty(e)) => builder.attach(XmlElement::from_start(&e)?.into())?,
                Ok(Event::End(e)) => builder.close(e.name().as_ref())?,
                Ok(Event::Text(e)) => builder.text(std::str::from_utf8(&e)?),
                Ok(Event::GeneralRef(e)) => {
                    let entity = std::str::from_utf8(&e)?;
                    builder.text(&format!("&{};", entity));
                },
                Ok(Event::CData(e)) => {
                    builder.attach(XmlNode::CData(std::str::from_utf8(&e)?.to_string()))?
                },
                Ok(Event::Comment(e)) => {
                    builder.attach(XmlNode::Comment(std::str::from_utf8(&e)?.to_string()))?
                },
                Ok(Event::PI(e)) => builder.attach(XmlNode::ProcessingInstruction(
                    std::str::from_utf8(&e)?.to_string(),
                ))?,
                Ok(Event::Decl(e)) => {
                    builder.attach(XmlNode::Declaration(std::str::from_utf8(&e)?.to_string()))?
                },
                Ok(Event::DocType(e)) => {
                    builder.attach(XmlNode::DocType(std::str::from_utf8(&e)?.to_string()))?
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(XmlError::Syntax {
                        position: reader.error_position() as u64,
                        message: e.to_string(),
                    });
                },
            }
            buf.clear();
        }

        builder.finish()
    }

    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Serialize the whole document, prolog included.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(4096);
        for node in &self.prolog {
            node.write_to(&mut out);
        }
        self.root.write_to(&mut out);
        for node in &self.epilog {
            node.write_to(&mut out);
        }
        out
    }

    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml().into_bytes()
    }
}

/// Stack-based assembly of the tree from pull-parser events.
#[derive(Default)]
struct TreeBuilder {
    prolog: Vec<XmlNode>,
    root: Option<XmlElement>,
    epilog: Vec<XmlNode>,
    open: Vec<XmlElement>,
}

impl TreeBuilder {
    fn open(&mut self, el: XmlElement) {
        self.open.push(el);
    }

    fn close(&mut self, name: &[u8]) -> Result<(), XmlError> {
        let el = self
            .open
            .pop()
            .ok_or_else(|| XmlError::UnexpectedEnd(String::from_utf8_lossy(name).into_owned()))?;
        self.attach(el.into())
    }

    fn text(&mut self, text: &str) {
        let siblings = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None if self.root.is_none() => &mut self.prolog,
            None => &mut self.epilog,
        };
        // Text split around entity references is joined back into one node
        if let Some(XmlNode::Text(prev)) = siblings.last_mut() {
            prev.push_str(text);
        } else {
            siblings.push(XmlNode::Text(text.to_string()));
        }
    }

    fn attach(&mut self, node: XmlNode) -> Result<(), XmlError> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match node {
            XmlNode::Element(el) if self.root.is_none() => self.root = Some(el),
            XmlNode::Element(el) => return Err(XmlError::MultipleRoots(el.name)),
            other if self.root.is_none() => self.prolog.push(other),
            other => self.epilog.push(other),
        }
        Ok(())
    }

    fn finish(self) -> Result<XmlDocument, XmlError> {
        if let Some(unclosed) = self.open.last() {
            return Err(XmlError::Unclosed(unclosed.name.clone()));
        }
        Ok(XmlDocument {
            prolog: self.prolog,
            root: self.root.ok_or(XmlError::NoRoot)?,
            epilog: self.epilog,
        })
    }
}
