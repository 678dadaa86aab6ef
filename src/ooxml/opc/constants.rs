/// Constant values related to the Open Packaging Convention.
///
/// This module contains the content types, relationship types and well-known
/// partnames a WordprocessingML merge has to read, rewrite or create.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    pub const WML_NUMBERING: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
}

/// Relationship type URIs used in OPC packages
pub mod relationship_type {
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}

/// Open XML relationship target modes
pub mod target_mode {
    /// Internal relationship target mode (default)
    pub const INTERNAL: &str = "Internal";

    /// External relationship target mode (e.g., hyperlinks to external URLs)
    pub const EXTERNAL: &str = "External";
}

/// XML namespace URIs used when parts have to be created from scratch
pub mod namespace {
    /// OPC relationships namespace
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";

    /// WordprocessingML main namespace
    pub const WML_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
}

/// Zip membernames of the parts a Word merge touches
pub mod partname {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const DOCUMENT: &str = "word/document.xml";
    pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
    pub const STYLES: &str = "word/styles.xml";
    pub const NUMBERING: &str = "word/numbering.xml";
    /// Folder holding embedded images and other media
    pub const MEDIA_FOLDER: &str = "word/media/";
    /// Folder the document relationships resolve against
    pub const WORD_FOLDER: &str = "word/";
}
