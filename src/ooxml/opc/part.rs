//! Parts of an OPC package.
//!
//! A part is a named blob inside the package. The merge engine treats XML
//! parts and binary media the same way at this level; XML parts are parsed
//! on demand into [`XmlDocument`](crate::common::xml::XmlDocument)s by the
//! layers above.

use crate::ooxml::opc::packuri::PackURI;

/// A named blob inside an OPC package.
#[derive(Debug, Clone)]
pub struct Part {
    /// The partname (URI) of this part
    partname: PackURI,

    /// The raw content of this part, exactly as stored in the archive
    blob: Vec<u8>,
}

impl Part {
    /// Create a new part.
    pub fn new(partname: PackURI, blob: Vec<u8>) -> Self {
        Self { partname, blob }
    }

    /// Get the partname of this part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Get the binary content of this part.
    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Replace the content of this part.
    #[inline]
    pub fn set_blob(&mut self, blob: Vec<u8>) {
        self.blob = blob;
    }

    /// Consume the part and return its content.
    #[inline]
    pub fn into_blob(self) -> Vec<u8> {
        self.blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_part() {
        let partname = PackURI::from_membername("word/media/image1.png");
        let content = vec![0x89, 0x50, 0x4E, 0x47]; // PNG header
        let part = Part::new(partname, content.clone());

        assert_eq!(part.partname().membername(), "word/media/image1.png");
        assert_eq!(part.blob(), content.as_slice());
    }
}
