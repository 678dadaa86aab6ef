/// Objects that implement reading and writing OPC packages.
///
/// This module provides the main OpcPackage type, which represents an Open Packaging
/// Convention package in memory as an ordered registry of named parts. Parts keep
/// the order they had in the source archive, and new parts are appended, so a
/// package written back out looks like the one that was read.
use std::collections::HashMap;

use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::phys_pkg::{GenerateOptions, LoadOptions, PhysPkgReader, PhysPkgWriter};

/// Main API class for working with OPC packages.
///
/// Parts are addressed by their zip membername (`word/document.xml`), the
/// form used throughout the merge engine.
#[derive(Debug, Clone, Default)]
pub struct OpcPackage {
    /// All parts, in archive order
    parts: Vec<Part>,

    /// Membername to position in `parts`
    index: HashMap<String, usize>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an OPC package from an in-memory archive.
    ///
    /// # Example
    /// ```no_run
    /// use docx_merge::ooxml::opc::{LoadOptions, OpcPackage};
    ///
    /// let bytes = std::fs::read("document.docx").unwrap();
    /// let pkg = OpcPackage::from_bytes(&bytes, &LoadOptions::default()).unwrap();
    /// assert!(pkg.contains_part("word/document.xml"));
    /// ```
    pub fn from_bytes(data: &[u8], options: &LoadOptions) -> Result<Self> {
        let mut package = Self::new();
        for part in PhysPkgReader::read_parts(data, options)? {
            package.insert(part);
        }
        Ok(package)
    }

    fn insert(&mut self, part: Part) {
        let name = part.partname().membername().to_string();
        match self.index.get(&name) {
            // Duplicate entries are legal in a zip; the later one shadows
            Some(&pos) => self.parts[pos] = part,
            None => {
                self.index.insert(name, self.parts.len());
                self.parts.push(part);
            },
        }
    }

    /// Get the content of a part by membername.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.index.get(name).map(|&pos| self.parts[pos].blob())
    }

    /// Check whether a part exists.
    #[inline]
    pub fn contains_part(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Replace the content of a part, or append it when it does not exist yet.
    pub fn set_part(&mut self, name: &str, blob: Vec<u8>) {
        match self.index.get(name) {
            Some(&pos) => self.parts[pos].set_blob(blob),
            None => self.insert(Part::new(PackURI::from_membername(name), blob)),
        }
    }

    /// Remove a part, returning its content.
    pub fn remove_part(&mut self, name: &str) -> Option<Vec<u8>> {
        let pos = self.index.remove(name)?;
        let part = self.parts.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(part.into_blob())
    }

    /// Membernames of all parts under `prefix` (e.g. `word/media/`), in archive order.
    pub fn list_folder(&self, prefix: &str) -> Vec<String> {
        self.parts
            .iter()
            .map(|part| part.partname().membername())
            .filter(|name| name.starts_with(prefix) && name.len() > prefix.len())
            .map(str::to_string)
            .collect()
    }

    /// Membernames of all parts, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.partname().membername())
    }

    /// Number of parts in the package.
    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Serialize the package into a new archive.
    pub fn generate(&self, options: &GenerateOptions) -> Result<Vec<u8>> {
        let mut writer = PhysPkgWriter::new(options);
        for part in &self.parts {
            writer.write(part.partname(), part.blob())?;
        }
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_package() -> OpcPackage {
        let mut pkg = OpcPackage::new();
        pkg.set_part("[Content_Types].xml", b"<Types/>".to_vec());
        pkg.set_part("word/document.xml", b"<w:document/>".to_vec());
        pkg.set_part("word/media/image1.png", vec![1, 2, 3]);
        pkg.set_part("word/media/image2.png", vec![4, 5, 6]);
        pkg.set_part("word/styles.xml", b"<w:styles/>".to_vec());
        pkg
    }

    #[test]
    fn test_set_and_get() {
        let mut pkg = sample_package();
        assert_eq!(pkg.part("word/document.xml"), Some(&b"<w:document/>"[..]));
        assert!(pkg.part("word/numbering.xml").is_none());

        pkg.set_part("word/document.xml", b"<w:document><w:body/></w:document>".to_vec());
        assert_eq!(pkg.len(), 5);
        assert_eq!(
            pkg.part("word/document.xml"),
            Some(&b"<w:document><w:body/></w:document>"[..])
        );
    }

    #[test]
    fn test_list_folder() {
        let pkg = sample_package();
        assert_eq!(
            pkg.list_folder("word/media/"),
            ["word/media/image1.png", "word/media/image2.png"]
        );
        assert!(pkg.list_folder("word/embeddings/").is_empty());
    }

    #[test]
    fn test_remove_part_keeps_index() {
        let mut pkg = sample_package();
        assert_eq!(pkg.remove_part("word/media/image1.png"), Some(vec![1, 2, 3]));
        assert!(pkg.remove_part("word/media/image1.png").is_none());

        assert_eq!(pkg.part("word/media/image2.png"), Some(&[4, 5, 6][..]));
        assert_eq!(pkg.part("word/styles.xml"), Some(&b"<w:styles/>"[..]));
        let names: Vec<_> = pkg.part_names().collect();
        assert_eq!(
            names,
            ["[Content_Types].xml", "word/document.xml", "word/media/image2.png", "word/styles.xml"]
        );
    }

    #[test]
    fn test_generate_and_reload() {
        let pkg = sample_package();
        let bytes = pkg.generate(&GenerateOptions::default()).unwrap();

        let reloaded = OpcPackage::from_bytes(&bytes, &LoadOptions::default()).unwrap();
        let names: Vec<_> = reloaded.part_names().collect();
        let original: Vec<_> = pkg.part_names().collect();
        assert_eq!(names, original);
        assert_eq!(reloaded.part("word/media/image2.png"), Some(&[4, 5, 6][..]));
    }
}
