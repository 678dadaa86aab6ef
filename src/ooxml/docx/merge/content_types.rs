//! Merging of `[Content_Types].xml` declarations.
//!
//! Every source contributes its `Default` and `Override` declarations. A
//! declaration is identified by its content type plus its key: the part name
//! for overrides, the extension for defaults, `EMPTY` when neither is present.
//! The first declaration seen for a pair wins.

use std::collections::HashSet;

use log::{debug, trace};

use crate::common::xml::{XmlDocument, XmlElement};

/// Key used for declarations that carry neither a part name nor an extension
const EMPTY_KEY: &str = "EMPTY";

/// Accumulates content type declarations across packages.
#[derive(Debug, Default)]
pub struct ContentTypeMerger {
    /// Declarations in first-seen order
    declarations: Vec<XmlElement>,
    /// `(content type, key)` pairs already registered
    seen: HashSet<(String, String)>,
}

impl ContentTypeMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the declarations of one source's content types part.
    pub fn merge(&mut self, content_types: &XmlDocument) {
        let before = self.declarations.len();
        for declaration in content_types.root().child_elements() {
            self.register(declaration);
        }
        debug!(
            "Content types: {} new declarations ({} total)",
            self.declarations.len() - before,
            self.declarations.len()
        );
    }

    /// Add an `Override` for `partname` unless an identical one exists.
    pub fn ensure_override(&mut self, partname: &str, content_type: &str) {
        let declaration = XmlElement::new("Override")
            .with_attr("PartName", partname)
            .with_attr("ContentType", content_type);
        self.register(&declaration);
    }

    fn register(&mut self, declaration: &XmlElement) {
        let content_type = declaration.attr("ContentType").unwrap_or_default();
        let key = declaration
            .attr("PartName")
            .or_else(|| declaration.attr("Extension"))
            .unwrap_or(EMPTY_KEY.into());

        let entry = (content_type.into_owned(), key.into_owned());
        if self.seen.contains(&entry) {
            trace!("Content type {} for {} already declared", entry.0, entry.1);
            return;
        }
        self.seen.insert(entry);
        self.declarations.push(declaration.clone());
    }

    /// Number of distinct declarations registered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Replace the declarations in `target` with the merged set.
    ///
    /// The root element and its namespace declarations are kept.
    pub fn generate(&self, target: &mut XmlDocument) {
        target
            .root_mut()
            .set_children(self.declarations.iter().cloned().map(Into::into).collect());
    }
}
