//! Merging of the main document's relationships.
//!
//! Relationships are keyed by their `Id`. The first source to use an id owns
//! it; a later relationship with the same id is dropped, not renamed. Media
//! relationships never collide because the media remapper renames them first.

use std::collections::HashMap;

use log::{debug, trace};

use crate::common::xml::{XmlDocument, XmlElement};
use crate::ooxml::opc::rel::{self, Relationship};

/// Accumulates relationship elements across packages, keyed by id.
#[derive(Debug, Default)]
pub struct RelationshipMerger {
    /// Relationship elements in first-seen order
    entries: Vec<XmlElement>,
    /// Id to position in `entries`
    by_id: HashMap<String, usize>,
}

impl RelationshipMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the relationships of one source's `document.xml.rels`.
    ///
    /// Returns the number of relationships dropped because their id was
    /// already taken.
    pub fn merge(&mut self, rels: &XmlDocument, index: usize) -> usize {
        let mut dropped = 0;
        for element in rels.root().child_elements() {
            let Some(relationship) = Relationship::from_element(element) else {
                continue;
            };
            let r_id = relationship.r_id();
            if self.by_id.contains_key(r_id.as_ref()) {
                trace!(
                    "Source {}: relationship {} -> {} shadowed by an earlier source",
                    index,
                    r_id,
                    relationship.target_ref()
                );
                dropped += 1;
                continue;
            }
            self.by_id.insert(r_id.into_owned(), self.entries.len());
            self.entries.push(element.clone());
        }
        if dropped > 0 {
            debug!(
                "Source {}: dropped {} relationships with colliding ids",
                index, dropped
            );
        }
        dropped
    }

    /// Id of the first relationship of `reltype`, adding one to `target_ref`
    /// with a fresh `rIdN` when none exists.
    pub fn ensure(&mut self, reltype: &str, target_ref: &str) -> String {
        let existing = self
            .entries
            .iter()
            .filter_map(Relationship::from_element)
            .find(|relationship| relationship.reltype() == reltype)
            .map(|relationship| relationship.r_id().into_owned());
        if let Some(r_id) = existing {
            return r_id;
        }

        let r_id = rel::next_r_id(self.by_id.keys().map(String::as_str));
        debug!("Adding relationship {} -> {}", r_id, target_ref);
        self.by_id.insert(r_id.clone(), self.entries.len());
        self.entries
            .push(rel::new_relationship(&r_id, reltype, target_ref));
        r_id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the relationships in `target` with the merged set.
    pub fn generate(&self, target: &mut XmlDocument) {
        target
            .root_mut()
            .set_children(self.entries.iter().cloned().map(Into::into).collect());
    }
}
