//! Concatenation of document bodies.

use log::{debug, trace};

use crate::common::xml::{XmlDocument, XmlElement, XmlNode};
use crate::ooxml::docx::package::WordPackage;

const BODY: &str = "w:body";
const SECTION_PROPERTIES: &str = "w:sectPr";
const IGNORABLE: &str = "mc:Ignorable";

/// Collects body fragments and the namespaces they need.
#[derive(Debug)]
pub struct BodySplicer {
    page_break: bool,
    /// Body content of each source, section properties removed
    fragments: Vec<Vec<XmlNode>>,
    /// Body-level section properties of the first source
    section_properties: Option<XmlElement>,
    /// `xmlns` declarations in first-seen order
    namespaces: Vec<(String, String)>,
    /// Prefixes listed in `mc:Ignorable`, in first-seen order
    ignorable: Vec<String>,
}

impl BodySplicer {
    pub fn new(page_break: bool) -> Self {
        Self {
            page_break,
            fragments: Vec::new(),
            section_properties: None,
            namespaces: Vec::new(),
            ignorable: Vec::new(),
        }
    }

    /// Move one source's body content into the splicer.
    ///
    /// Only a `w:sectPr` that is the last element of the body counts as the
    /// body's section properties; the first source's is kept for the output.
    pub fn extract(&mut self, package: &mut WordPackage) {
        let index = package.index();
        let root = package.document.root_mut();
        self.collect_namespaces(root, index);

        let Some(body) = root.first_child_mut(BODY) else {
            debug!("Source {}: document has no body", index);
            self.fragments.push(Vec::new());
            return;
        };

        let mut content = body.take_children();
        let last_element = content.iter().rposition(|node| node.as_element().is_some());
        if let Some(pos) = last_element
            && content[pos].is_element(SECTION_PROPERTIES)
        {
            // Whitespace after the section properties goes with them
            let tail = content.split_off(pos);
            if self.fragments.is_empty()
                && let Some(XmlNode::Element(section)) = tail.into_iter().next()
            {
                self.section_properties = Some(section);
            }
        }

        debug!("Source {}: extracted {} body nodes", index, content.len());
        self.fragments.push(content);
    }

    fn collect_namespaces(&mut self, root: &XmlElement, index: usize) {
        for (name, value) in root.attributes() {
            if name == "xmlns" || name.starts_with("xmlns:") {
                match self.namespaces.iter().find(|(known, _)| known == name) {
                    Some((_, uri)) if uri != value.as_ref() => {
                        debug!(
                            "Source {}: {} is bound to {} elsewhere, keeping the first binding",
                            index, name, uri
                        );
                    },
                    Some(_) => {},
                    None => self.namespaces.push((name.to_string(), value.into_owned())),
                }
            } else if name == IGNORABLE {
                for prefix in value.split_whitespace() {
                    if !self.ignorable.iter().any(|known| known == prefix) {
                        self.ignorable.push(prefix.to_string());
                    }
                }
            }
        }
    }

    /// Write the concatenated body into the output document.
    pub fn generate(self, document: &mut XmlDocument) {
        let root = document.root_mut();
        for (name, uri) in &self.namespaces {
            if !root.has_attr(name) {
                trace!("Declaring {}=\"{}\" on the merged document", name, uri);
                root.set_attr(name, uri);
            }
        }
        if !self.ignorable.is_empty() {
            root.set_attr(IGNORABLE, &self.ignorable.join(" "));
        }

        let mut children: Vec<XmlNode> = Vec::new();
        let mut breaks = 0;
        for (i, fragment) in self.fragments.into_iter().enumerate() {
            if i > 0 && self.page_break {
                children.push(page_break_paragraph().into());
                breaks += 1;
            }
            children.extend(fragment);
        }
        if let Some(section) = self.section_properties {
            children.push(section.into());
        }
        debug!("Merged body has {} nodes, {} page breaks", children.len(), breaks);

        match root.first_child_mut(BODY) {
            Some(body) => body.set_children(children),
            None => {
                let mut body = XmlElement::new(BODY);
                body.set_children(children);
                root.push_child(body);
            },
        }
    }
}

/// `<w:p><w:r><w:br w:type="page"/></w:r></w:p>`
fn page_break_paragraph() -> XmlElement {
    XmlElement::new("w:p").with_child(
        XmlElement::new("w:r").with_child(XmlElement::new("w:br").with_attr("w:type", "page")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::merge::test_support::Fixture;

    const PAGE_BREAK: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;

    fn splice(bodies: &[&str], page_break: bool) -> (String, XmlDocument) {
        let mut splicer = BodySplicer::new(page_break);
        let mut base = None;
        for (i, body) in bodies.iter().enumerate() {
            let mut package = Fixture::new().body(body).package(i);
            splicer.extract(&mut package);
            base.get_or_insert(package);
        }
        let mut document = base.unwrap().document;
        splicer.generate(&mut document);
        let body = document.root().first_child(BODY).unwrap().to_xml();
        (body, document)
    }

    #[test]
    fn test_page_breaks_between_sources() {
        let (body, _) = splice(&["<w:p>a</w:p>", "<w:p>b</w:p>", "<w:p>c</w:p>"], true);
        assert_eq!(body.matches(PAGE_BREAK).count(), 2);
        let a = body.find("<w:p>a</w:p>").unwrap();
        let b = body.find("<w:p>b</w:p>").unwrap();
        let c = body.find("<w:p>c</w:p>").unwrap();
        assert!(a < b && b < c);
        assert!(body[a..b].contains(PAGE_BREAK));
        assert!(body[b..c].contains(PAGE_BREAK));
    }

    #[test]
    fn test_no_page_breaks() {
        let (body, _) = splice(&["<w:p>a</w:p>", "<w:p>b</w:p>"], false);
        assert_eq!(body.matches(PAGE_BREAK).count(), 0);
    }

    #[test]
    fn test_first_section_properties_kept_last() {
        let (body, _) = splice(
            &[
                r#"<w:p>a</w:p><w:sectPr><w:pgSz w:w="11906"/></w:sectPr>"#,
                r#"<w:p>b</w:p><w:sectPr><w:pgSz w:w="12240"/></w:sectPr>"#,
            ],
            false,
        );
        assert_eq!(body.matches("<w:sectPr>").count(), 1);
        assert!(body.ends_with(r#"<w:sectPr><w:pgSz w:w="11906"/></w:sectPr></w:body>"#));
    }

    #[test]
    fn test_paragraph_section_properties_stay() {
        let inner = r#"<w:p><w:pPr><w:sectPr><w:type w:val="nextPage"/></w:sectPr></w:pPr></w:p><w:p>b</w:p>"#;
        let (body, _) = splice(&[inner, "<w:p>c</w:p>"], false);
        assert!(body.contains(r#"<w:type w:val="nextPage"/>"#));
    }

    #[test]
    fn test_namespace_union() {
        let mut splicer = BodySplicer::new(true);
        let mut base = Fixture::new().package(0);
        let mut other = Fixture::new()
            .document_root_attrs(r#"xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" mc:Ignorable="w14""#)
            .package(1);
        splicer.extract(&mut base);
        splicer.extract(&mut other);
        splicer.generate(&mut base.document);

        let root = base.document.root();
        assert!(root.has_attr("xmlns:w"));
        assert!(root.has_attr("xmlns:w14"));
        assert!(root.has_attr("xmlns:mc"));
        assert_eq!(root.attr("mc:Ignorable").as_deref(), Some("w14"));
    }
}
