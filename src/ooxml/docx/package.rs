use crate::common::xml::XmlDocument;
/// Package implementation for Word documents.
use crate::ooxml::error::{MergeError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::partname;
use crate::ooxml::opc::phys_pkg::LoadOptions;

/// A Word (.docx) package with its merge-relevant parts parsed.
///
/// Wraps an OPC package and keeps the XML parts the merge engine rewrites
/// as owned trees. Mutations happen on the trees; [`WordPackage::store`]
/// serializes them back into the package.
///
/// # Examples
///
/// ```rust,no_run
/// use docx_merge::ooxml::docx::WordPackage;
/// use docx_merge::ooxml::opc::LoadOptions;
///
/// let bytes = std::fs::read("document.docx")?;
/// let pkg = WordPackage::open(0, &bytes, &LoadOptions::default())?;
/// println!("{} body children", pkg.document.root().children().len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct WordPackage {
    /// Position of this package in the merge order
    index: usize,

    /// The underlying OPC package
    opc: OpcPackage,

    /// `[Content_Types].xml`
    pub content_types: XmlDocument,

    /// `word/document.xml`
    pub document: XmlDocument,

    /// `word/_rels/document.xml.rels`
    pub document_rels: XmlDocument,

    /// `word/styles.xml`
    pub styles: XmlDocument,

    /// `word/numbering.xml`, which is optional in WordprocessingML
    pub numbering: Option<XmlDocument>,
}

impl WordPackage {
    /// Open a .docx package from memory.
    ///
    /// # Errors
    ///
    /// * [`MergeError::PackageLoad`] when the bytes are not a readable archive
    /// * [`MergeError::MissingPart`] when the document, styles, content types
    ///   or document relationships part is absent
    /// * [`MergeError::Parse`] when one of those parts is malformed XML
    pub fn open(index: usize, data: &[u8], options: &LoadOptions) -> Result<Self> {
        let opc = OpcPackage::from_bytes(data, options)
            .map_err(|source| MergeError::PackageLoad { index, source })?;
        Self::from_opc(index, opc)
    }

    /// Wrap an already loaded OPC package.
    pub fn from_opc(index: usize, opc: OpcPackage) -> Result<Self> {
        Ok(Self {
            content_types: required_part(&opc, index, partname::CONTENT_TYPES)?,
            document: required_part(&opc, index, partname::DOCUMENT)?,
            document_rels: required_part(&opc, index, partname::DOCUMENT_RELS)?,
            styles: required_part(&opc, index, partname::STYLES)?,
            numbering: optional_part(&opc, index, partname::NUMBERING)?,
            index,
            opc,
        })
    }

    /// Position of this package in the merge order.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn opc(&self) -> &OpcPackage {
        &self.opc
    }

    #[inline]
    pub fn opc_mut(&mut self) -> &mut OpcPackage {
        &mut self.opc
    }

    /// Serialize the parsed parts back into the package and return it.
    pub fn store(mut self) -> OpcPackage {
        self.opc
            .set_part(partname::CONTENT_TYPES, self.content_types.to_bytes());
        self.opc.set_part(partname::DOCUMENT, self.document.to_bytes());
        self.opc
            .set_part(partname::DOCUMENT_RELS, self.document_rels.to_bytes());
        self.opc.set_part(partname::STYLES, self.styles.to_bytes());
        if let Some(numbering) = &self.numbering {
            self.opc.set_part(partname::NUMBERING, numbering.to_bytes());
        }
        self.opc
    }
}

fn optional_part(opc: &OpcPackage, index: usize, name: &str) -> Result<Option<XmlDocument>> {
    opc.part(name)
        .map(|blob| {
            XmlDocument::parse(blob).map_err(|source| MergeError::Parse {
                index,
                part: name.to_string(),
                source,
            })
        })
        .transpose()
}

fn required_part(opc: &OpcPackage, index: usize, name: &str) -> Result<XmlDocument> {
    optional_part(opc, index, name)?.ok_or_else(|| MergeError::MissingPart {
        index,
        part: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT_TYPES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;
    const DOCUMENT: &[u8] = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#;
    const RELS: &[u8] = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#;
    const STYLES: &[u8] = br#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;

    fn opc_with(parts: &[(&str, &[u8])]) -> OpcPackage {
        let mut opc = OpcPackage::new();
        for (name, blob) in parts {
            opc.set_part(name, blob.to_vec());
        }
        opc
    }

    fn complete_parts() -> Vec<(&'static str, &'static [u8])> {
        vec![
            (partname::CONTENT_TYPES, CONTENT_TYPES),
            (partname::DOCUMENT, DOCUMENT),
            (partname::DOCUMENT_RELS, RELS),
            (partname::STYLES, STYLES),
        ]
    }

    #[test]
    fn test_numbering_is_optional() {
        let pkg = WordPackage::from_opc(3, opc_with(&complete_parts())).unwrap();
        assert_eq!(pkg.index(), 3);
        assert!(pkg.numbering.is_none());
        assert_eq!(pkg.document.root().name(), "w:document");
    }

    #[test]
    fn test_missing_styles() {
        let parts: Vec<_> = complete_parts()
            .into_iter()
            .filter(|(name, _)| *name != partname::STYLES)
            .collect();
        let result = WordPackage::from_opc(1, opc_with(&parts));
        assert!(matches!(
            result,
            Err(MergeError::MissingPart { index: 1, part }) if part == "word/styles.xml"
        ));
    }

    #[test]
    fn test_malformed_numbering() {
        let mut parts = complete_parts();
        parts.push((partname::NUMBERING, &b"<w:numbering><w:num></w:numbering>"[..]));
        let result = WordPackage::from_opc(0, opc_with(&parts));
        assert!(matches!(
            result,
            Err(MergeError::Parse { index: 0, part, .. }) if part == "word/numbering.xml"
        ));
    }

    #[test]
    fn test_not_a_package() {
        let result = WordPackage::open(2, b"PK but not really", &LoadOptions::default());
        assert!(matches!(result, Err(MergeError::PackageLoad { index: 2, .. })));
    }

    #[test]
    fn test_store_writes_back() {
        let mut pkg = WordPackage::from_opc(0, opc_with(&complete_parts())).unwrap();
        pkg.styles
            .root_mut()
            .push_child(crate::common::xml::XmlElement::new("w:style").with_attr("w:styleId", "A"));
        let opc = pkg.store();
        let styles = std::str::from_utf8(opc.part(partname::STYLES).unwrap()).unwrap();
        assert!(styles.contains(r#"<w:style w:styleId="A"/>"#));
        assert!(!opc.contains_part(partname::NUMBERING));
    }
}
