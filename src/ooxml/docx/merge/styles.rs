//! Renaming of style definitions.
//!
//! Style ids are only unique within one package: two sources can both define
//! `Heading1` with different formatting. Every style of source `i` is renamed
//! to `<id>_<i>`, together with the references between styles of the same
//! source and the style references in that source's body.

use std::collections::HashMap;

use log::{debug, trace};

use crate::common::xml::{XmlDocument, XmlElement, XmlNode};
use crate::ooxml::docx::merge::ids::{W_VAL, concatenated, is_no_numbering, suffixed};
use crate::ooxml::docx::package::WordPackage;

const STYLE: &str = "w:style";
const STYLE_ID: &str = "w:styleId";
/// References from one style definition to another
const STYLE_CASCADE: [&str; 3] = ["w:basedOn", "w:next", "w:link"];
/// Body elements that name a style
const BODY_STYLE_REFERENCES: [&str; 3] = ["w:pStyle", "w:rStyle", "w:tblStyle"];

/// Collects renamed style definitions from every source.
#[derive(Debug, Default)]
pub struct StyleRemapper {
    styles: Vec<XmlElement>,
}

impl StyleRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename one source's styles and take them into the merger.
    ///
    /// The source's body is rewritten to use the new ids. Non-style children
    /// of the styles root (`w:docDefaults`, `w:latentStyles`) stay in the
    /// source.
    pub fn prepare(&mut self, package: &mut WordPackage) -> usize {
        let index = package.index();
        let root = package.styles.root_mut();
        let mut renamed: HashMap<String, String> = HashMap::new();
        let mut kept = Vec::new();

        for node in root.take_children() {
            match node {
                XmlNode::Element(mut style) if style.name() == STYLE => {
                    if let Some((old_id, new_id)) = rename_style(&mut style, index) {
                        renamed.insert(old_id, new_id);
                    }
                    self.styles.push(style);
                },
                other => kept.push(other),
            }
        }
        root.set_children(kept);

        let mut rewritten = 0;
        if !renamed.is_empty() {
            package.document.root_mut().visit_mut(&mut |element| {
                if !BODY_STYLE_REFERENCES.contains(&element.name()) {
                    return;
                }
                let replacement = element
                    .attr(W_VAL)
                    .and_then(|value| renamed.get(value.as_ref()).cloned());
                if let Some(new_id) = replacement {
                    element.set_attr(W_VAL, &new_id);
                    rewritten += 1;
                }
            });
        }

        debug!(
            "Source {}: renamed {} styles, {} body references",
            index,
            renamed.len(),
            rewritten
        );
        renamed.len()
    }

    /// Number of style definitions collected so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Append all collected styles to the output's styles part.
    pub fn generate(self, output: &mut XmlDocument) {
        let root = output.root_mut();
        for style in self.styles {
            root.push_child(style);
        }
    }
}

/// Rename a style and its internal references; returns `(old, new)` ids.
fn rename_style(style: &mut XmlElement, index: usize) -> Option<(String, String)> {
    for reference in style.child_elements_mut() {
        if STYLE_CASCADE.contains(&reference.name())
            && let Some(value) = reference.attr(W_VAL).map(|v| v.into_owned())
        {
            reference.set_attr(W_VAL, &suffixed(&value, index));
        }
    }
    style.for_each_mut("w:numId", &mut |reference| {
        if let Some(value) = reference.attr(W_VAL).map(|v| v.into_owned())
            && !is_no_numbering(&value)
        {
            reference.set_attr(W_VAL, &concatenated(&value, index));
        }
    });

    let old_id = style.attr(STYLE_ID)?.into_owned();
    let new_id = suffixed(&old_id, index);
    trace!("style {} -> {}", old_id, new_id);
    style.set_attr(STYLE_ID, &new_id);
    Some((old_id, new_id))
}
