//! XML collaborator: an owned element tree over quick-xml plus escaping helpers.

pub mod dom;
mod escape;

pub use dom::{XmlDocument, XmlElement, XmlError, XmlNode};
pub use escape::{escape_xml, unescape_xml};
