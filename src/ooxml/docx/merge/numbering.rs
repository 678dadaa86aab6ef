//! Renumbering of list definitions.
//!
//! WordprocessingML lists are defined in two levels: `w:abstractNum` holds
//! the formatting and `w:num` instances point at one of them. Both ids are
//! decimal numbers that are only unique within one package, so every source
//! appends its index to them. Style links inside abstract definitions follow
//! the style renaming (`_<index>`), and list references in the source's body
//! follow the concrete renumbering.

use std::collections::HashSet;

use log::{debug, trace};

use crate::common::xml::{XmlDocument, XmlElement, XmlNode};
use crate::ooxml::docx::merge::ids::{W_VAL, concatenated, is_no_numbering, suffixed};
use crate::ooxml::docx::package::WordPackage;
use crate::ooxml::opc::constants::namespace;

const ABSTRACT_NUM: &str = "w:abstractNum";
const NUM: &str = "w:num";
const ABSTRACT_NUM_ID: &str = "w:abstractNumId";
const NUM_ID: &str = "w:numId";
/// Style references nested in abstract definitions
const STYLE_LINKS: [&str; 3] = ["w:pStyle", "w:numStyleLink", "w:styleLink"];
/// Children that follow all definitions in the schema
const TRAILING: &str = "w:numIdMacAtCleanup";

/// Collects renumbered list definitions from every source.
#[derive(Debug, Default)]
pub struct NumberingRemapper {
    abstract_nums: Vec<XmlElement>,
    nums: Vec<XmlElement>,
    /// Root of the first numbering part seen, used when the output has none
    template: Option<XmlElement>,
}

impl NumberingRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renumber one source's definitions and take them into the merger.
    ///
    /// The source's body is rewritten to use the new `w:numId` values. A
    /// source without a numbering part contributes nothing.
    pub fn prepare(&mut self, package: &mut WordPackage) -> usize {
        let index = package.index();
        let Some(numbering) = package.numbering.as_mut() else {
            debug!("Source {}: no numbering part", index);
            return 0;
        };

        let root = numbering.root_mut();
        let mut renumbered = HashSet::new();
        let mut kept = Vec::new();
        let before = self.abstract_nums.len() + self.nums.len();

        for node in root.take_children() {
            match node {
                XmlNode::Element(mut element) if element.name() == ABSTRACT_NUM => {
                    remap_abstract_num(&mut element, index);
                    self.abstract_nums.push(element);
                },
                XmlNode::Element(mut element) if element.name() == NUM => {
                    if let Some(old_id) = remap_num(&mut element, index) {
                        renumbered.insert(old_id);
                    }
                    self.nums.push(element);
                },
                other => kept.push(other),
            }
        }
        root.set_children(kept);
        if self.template.is_none() {
            self.template = Some(root.shallow_clone());
        }

        let mut rewritten = 0;
        package
            .document
            .root_mut()
            .for_each_mut(NUM_ID, &mut |element| {
                let Some(value) = element.attr(W_VAL).map(|v| v.into_owned()) else {
                    return;
                };
                if !is_no_numbering(&value) && renumbered.contains(&value) {
                    element.set_attr(W_VAL, &concatenated(&value, index));
                    rewritten += 1;
                }
            });

        let added = self.abstract_nums.len() + self.nums.len() - before;
        debug!(
            "Source {}: renumbered {} list definitions, {} body references",
            index, added, rewritten
        );
        added
    }

    /// Whether any source contributed definitions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.abstract_nums.is_empty() && self.nums.is_empty()
    }

    /// Write all definitions into the output's numbering part.
    ///
    /// Abstract definitions come first, then concrete ones, each in source
    /// order. Returns `true` when the numbering part had to be created.
    pub fn generate(self, output: &mut WordPackage) -> bool {
        if output.numbering.is_none() && self.is_empty() {
            return false;
        }

        let created = output.numbering.is_none();
        let template = self.template;
        let numbering = output.numbering.get_or_insert_with(|| {
            XmlDocument::new(template.unwrap_or_else(|| {
                XmlElement::new("w:numbering").with_attr("xmlns:w", namespace::WML_MAIN)
            }))
        });

        let root = numbering.root_mut();
        let (trailing, mut children): (Vec<XmlNode>, Vec<XmlNode>) = root
            .take_children()
            .into_iter()
            .partition(|node| node.is_element(TRAILING));
        children.extend(self.abstract_nums.into_iter().map(XmlNode::from));
        children.extend(self.nums.into_iter().map(XmlNode::from));
        children.extend(trailing);
        root.set_children(children);

        if created {
            debug!("Created numbering part for the merged package");
        }
        created
    }
}

fn remap_abstract_num(element: &mut XmlElement, index: usize) {
    if let Some(id) = element.attr(ABSTRACT_NUM_ID).map(|v| v.into_owned()) {
        let new_id = concatenated(&id, index);
        trace!("abstractNum {} -> {}", id, new_id);
        element.set_attr(ABSTRACT_NUM_ID, &new_id);
    }
    element.visit_mut(&mut |nested| {
        if STYLE_LINKS.contains(&nested.name())
            && let Some(value) = nested.attr(W_VAL).map(|v| v.into_owned())
        {
            nested.set_attr(W_VAL, &suffixed(&value, index));
        }
    });
}

/// Renumber a `w:num` and the abstract definition it points at; returns the old id.
fn remap_num(element: &mut XmlElement, index: usize) -> Option<String> {
    let old_id = element.attr(NUM_ID).map(|v| v.into_owned());
    if let Some(id) = &old_id {
        let new_id = concatenated(id, index);
        trace!("num {} -> {}", id, new_id);
        element.set_attr(NUM_ID, &new_id);
    }
    element.for_each_mut(ABSTRACT_NUM_ID, &mut |reference| {
        if let Some(value) = reference.attr(W_VAL).map(|v| v.into_owned()) {
            reference.set_attr(W_VAL, &concatenated(&value, index));
        }
    });
    old_id
}
