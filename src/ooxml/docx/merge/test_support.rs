//! In-memory `.docx` fixtures for unit tests.

use crate::ooxml::docx::package::WordPackage;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{namespace, partname};
use crate::ooxml::opc::phys_pkg::GenerateOptions;

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\r\n",
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Default Extension="png" ContentType="image/png"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    "</Types>"
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\r\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    "</Relationships>"
);

/// Builder for a minimal but complete Word package.
pub(crate) struct Fixture {
    root_attrs: String,
    body: String,
    styles: String,
    numbering: Option<String>,
    relationships: Vec<(String, String, String)>,
    extra_parts: Vec<(String, Vec<u8>)>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            root_attrs: String::new(),
            body: "<w:p><w:r><w:t>Hello</w:t></w:r></w:p>".to_string(),
            styles: String::new(),
            numbering: None,
            relationships: vec![(
                "rId1".to_string(),
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles"
                    .to_string(),
                "styles.xml".to_string(),
            )],
            extra_parts: Vec::new(),
        }
    }

    /// Inner XML of `w:body`.
    pub(crate) fn body(mut self, xml: &str) -> Self {
        self.body = xml.to_string();
        self
    }

    /// Extra attributes for the `w:document` root.
    pub(crate) fn document_root_attrs(mut self, attrs: &str) -> Self {
        self.root_attrs = attrs.to_string();
        self
    }

    /// Inner XML of `w:styles`.
    pub(crate) fn styles(mut self, xml: &str) -> Self {
        self.styles = xml.to_string();
        self
    }

    /// Inner XML of `w:numbering`; without it the package has no numbering part.
    pub(crate) fn numbering(mut self, xml: &str) -> Self {
        self.numbering = Some(xml.to_string());
        self
    }

    pub(crate) fn relationship(mut self, id: &str, reltype: &str, target: &str) -> Self {
        self.relationships
            .push((id.to_string(), reltype.to_string(), target.to_string()));
        self
    }

    pub(crate) fn media(self, membername: &str, blob: &[u8]) -> Self {
        self.part(membername, blob)
    }

    pub(crate) fn part(mut self, membername: &str, blob: &[u8]) -> Self {
        self.extra_parts.push((membername.to_string(), blob.to_vec()));
        self
    }

    pub(crate) fn opc(self) -> OpcPackage {
        let mut opc = OpcPackage::new();
        opc.set_part(partname::CONTENT_TYPES, CONTENT_TYPES.as_bytes().to_vec());
        opc.set_part("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec());
        opc.set_part(
            partname::DOCUMENT,
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" {}><w:body>{}</w:body></w:document>"#,
                namespace::WML_MAIN,
                self.root_attrs,
                self.body
            )
            .into_bytes(),
        );

        let mut rels = format!(r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS);
        for (id, reltype, target) in &self.relationships {
            rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                id, reltype, target
            ));
        }
        rels.push_str("</Relationships>");
        opc.set_part(partname::DOCUMENT_RELS, rels.into_bytes());

        opc.set_part(
            partname::STYLES,
            format!(r#"<w:styles xmlns:w="{}">{}</w:styles>"#, namespace::WML_MAIN, self.styles)
                .into_bytes(),
        );
        if let Some(numbering) = &self.numbering {
            opc.set_part(
                partname::NUMBERING,
                format!(
                    r#"<w:numbering xmlns:w="{}">{}</w:numbering>"#,
                    namespace::WML_MAIN,
                    numbering
                )
                .into_bytes(),
            );
        }
        for (name, blob) in self.extra_parts {
            opc.set_part(&name, blob);
        }
        opc
    }

    pub(crate) fn package(self, index: usize) -> WordPackage {
        WordPackage::from_opc(index, self.opc()).unwrap()
    }

    pub(crate) fn to_bytes(self) -> Vec<u8> {
        self.opc().generate(&GenerateOptions::default()).unwrap()
    }
}
