use crate::common::xml::XmlElement;
use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::packuri::PackURI;
/// Relationship-related objects for OPC packages.
///
/// Relationships live as `<Relationship>` elements inside a `.rels` part.
/// The merge engine mutates those elements directly, so this module offers a
/// read view over one element plus the id allocator used when a relationship
/// has to be created.
use std::borrow::Cow;

/// Name of a relationship element inside a `.rels` part
pub const RELATIONSHIP_TAG: &str = "Relationship";

/// A read-only view of a single relationship from a source part to a target.
///
/// Identified by an rId (relationship ID). Can be either internal (pointing
/// to another part) or external (pointing to an external URL).
#[derive(Debug, Clone, Copy)]
pub struct Relationship<'a> {
    element: &'a XmlElement,
}

impl<'a> Relationship<'a> {
    /// Wrap a `<Relationship>` element.
    ///
    /// Returns `None` for any other element.
    pub fn from_element(element: &'a XmlElement) -> Option<Self> {
        (element.name() == RELATIONSHIP_TAG).then_some(Self { element })
    }

    /// Get the relationship ID, or an empty string when the attribute is absent.
    #[inline]
    pub fn r_id(&self) -> Cow<'a, str> {
        self.element.attr("Id").unwrap_or_default()
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> Cow<'a, str> {
        self.element.attr("Type").unwrap_or_default()
    }

    /// Get the target reference.
    ///
    /// For internal relationships, this is a relative part reference.
    /// For external relationships, this is an absolute URL.
    #[inline]
    pub fn target_ref(&self) -> Cow<'a, str> {
        self.element.attr("Target").unwrap_or_default()
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.element
            .attr("TargetMode")
            .is_some_and(|mode| mode == target_mode::EXTERNAL)
    }

    /// Resolve the target against `base_uri`, the directory of the source part.
    ///
    /// Returns `None` for external relationships and unresolvable targets.
    pub fn target_partname(&self, base_uri: &str) -> Option<PackURI> {
        let target = self.target_ref();
        if self.is_external() || target.is_empty() {
            return None;
        }
        Some(PackURI::from_rel_ref(base_uri, &target))
    }
}

/// Build a new internal `<Relationship>` element.
pub fn new_relationship(r_id: &str, reltype: &str, target_ref: &str) -> XmlElement {
    XmlElement::new(RELATIONSHIP_TAG)
        .with_attr("Id", r_id)
        .with_attr("Type", reltype)
        .with_attr("Target", target_ref)
}

/// Get the next available relationship ID.
///
/// Fills the first gap in the `rId1, rId2, ...` sequence, or uses the
/// number after the highest one. Ids not of the `rIdN` form are ignored.
pub fn next_r_id<'i>(existing: impl IntoIterator<Item = &'i str>) -> String {
    let mut used_numbers: Vec<u32> = existing
        .into_iter()
        .filter_map(|r_id| {
            let digits = r_id.strip_prefix("rId")?;
            atoi_simd::parse::<u32, false, false>(digits.as_bytes()).ok()
        })
        .collect();

    used_numbers.sort_unstable();

    let mut next_num = 1u32;
    for &num in &used_numbers {
        match num.cmp(&next_num) {
            std::cmp::Ordering::Equal => next_num += 1,
            std::cmp::Ordering::Greater => break,
            std::cmp::Ordering::Less => {},
        }
    }

    format!("rId{}", next_num)
}
