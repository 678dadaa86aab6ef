//! Renaming of media files so that every source's images survive the merge.
//!
//! Each file under `word/media/` gets the next global sequence number. Its
//! new name replaces the first digit of the file name with `_<sequence>`
//! (`image1.png` with sequence 3 becomes `image_3.png`), or inserts
//! `_<sequence>` before the extension when the name has no digit. The
//! document relationships pointing at the file are renamed to
//! `<id>_<sequence>` and retargeted, and the document body follows.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::common::xml::XmlDocument;
use crate::ooxml::docx::merge::ids::suffixed;
use crate::ooxml::docx::package::WordPackage;
use crate::ooxml::error::{MergeError, Result};
use crate::ooxml::opc::constants::partname;
use crate::ooxml::opc::rel::Relationship;
use crate::ooxml::opc::{OpcPackage, PackURI};

/// A media file scheduled for the merged package.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    /// Global sequence number, starting at 1
    pub sequence: usize,
    /// Source the file came from
    pub source_index: usize,
    /// Membername in the source, e.g. `word/media/image1.png`
    pub old_path: String,
    /// Relationship target in the output, e.g. `media/image_1.png`
    pub new_path: String,
    /// Original id of the document relationship that pointed at the file
    pub relationship_id: String,
    blob: Vec<u8>,
}

impl MediaAsset {
    /// Membername of the file in the merged package.
    pub fn output_membername(&self) -> String {
        format!("{}{}", partname::WORD_FOLDER, self.new_path)
    }
}

/// Assigns new names to media files and tracks them until output.
#[derive(Debug, Default)]
pub struct MediaRemapper {
    /// Last sequence number handed out
    sequence: usize,
    assets: Vec<MediaAsset>,
    /// New paths already assigned
    taken: HashSet<String>,
}

impl MediaRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the media of one source.
    ///
    /// Rewrites the source's document relationships and document body in
    /// place and takes the media bytes out of the source package. Media
    /// that only headers, footers or other parts refer to is left alone.
    ///
    /// # Errors
    ///
    /// [`MergeError::DanglingMediaReference`] when no relationship in the
    /// package points at a media file.
    pub fn prepare(&mut self, package: &mut WordPackage) -> Result<usize> {
        let index = package.index();
        let media = package.opc().list_folder(partname::MEDIA_FOLDER);
        if media.is_empty() {
            return Ok(0);
        }

        let targets = document_targets(&package.document_rels);
        let elsewhere = referenced_elsewhere(package.opc(), index)?;
        let mut renamed_ids: HashMap<String, String> = HashMap::new();
        let mut prepared = 0;

        for old_path in media {
            let positions = targets.get(&old_path).map(Vec::as_slice).unwrap_or_default();
            let shared = elsewhere.contains(&old_path);
            if positions.is_empty() {
                if !shared {
                    return Err(MergeError::DanglingMediaReference {
                        index,
                        media: old_path,
                    });
                }
                trace!(
                    "Source {}: {} is not used by the document body, leaving it",
                    index, old_path
                );
                continue;
            }

            let (sequence, new_path) = self.assign(&old_path);
            let mut relationship_id = String::new();
            for &pos in positions {
                let Some(element) = package.document_rels.root_mut().children_mut()[pos].as_element_mut()
                else {
                    continue;
                };
                let old_id = element.attr("Id").unwrap_or_default().into_owned();
                let new_id = suffixed(&old_id, sequence);
                trace!("Source {}: {} -> {} ({})", index, old_id, new_id, new_path);
                element.set_attr("Id", &new_id);
                element.set_attr("Target", &new_path);
                if relationship_id.is_empty() {
                    relationship_id = old_id.clone();
                }
                renamed_ids.insert(old_id, new_id);
            }

            // Parts outside the merge still need the original
            let blob = if shared {
                package.opc().part(&old_path).map(<[u8]>::to_vec)
            } else {
                package.opc_mut().remove_part(&old_path)
            };

            self.assets.push(MediaAsset {
                sequence,
                source_index: index,
                old_path,
                new_path,
                relationship_id,
                blob: blob.unwrap_or_default(),
            });
            prepared += 1;
        }

        let rewritten = rewrite_ids(&mut package.document, &renamed_ids);
        debug!(
            "Source {}: renamed {} media files, rewrote {} references",
            index, prepared, rewritten
        );
        Ok(prepared)
    }

    /// Pick the next free sequence number and the matching new path.
    fn assign(&mut self, old_path: &str) -> (usize, String) {
        let relative = old_path
            .strip_prefix(partname::WORD_FOLDER)
            .unwrap_or(old_path);
        let (dir, filename) = relative.rsplit_once('/').unwrap_or(("", relative));
        loop {
            self.sequence += 1;
            let renamed = renamed_file(filename, self.sequence);
            let new_path = if dir.is_empty() {
                renamed
            } else {
                format!("{}/{}", dir, renamed)
            };
            if self.taken.insert(new_path.clone()) {
                return (self.sequence, new_path);
            }
            debug!("Media name {} already taken, skipping sequence {}", new_path, self.sequence);
        }
    }

    /// Assets prepared so far, in sequence order.
    #[inline]
    pub fn assets(&self) -> &[MediaAsset] {
        &self.assets
    }

    /// Write every asset into the merged package.
    pub fn generate(self, output: &mut OpcPackage) {
        for asset in self.assets {
            let membername = asset.output_membername();
            trace!(
                "Copying {} from source {} to {}",
                asset.old_path, asset.source_index, membername
            );
            output.set_part(&membername, asset.blob);
        }
    }
}

/// Replace the first digit of `filename` with `_<sequence>`.
fn renamed_file(filename: &str, sequence: usize) -> String {
    if let Some(pos) = filename.find(|c: char| c.is_ascii_digit()) {
        return format!("{}{}", suffixed(&filename[..pos], sequence), &filename[pos + 1..]);
    }
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!("{}{}", suffixed(&filename[..dot], sequence), &filename[dot..]),
        _ => suffixed(filename, sequence),
    }
}

/// Membernames targeted by the document relationships, with the positions of
/// the relationship elements among the root's children.
fn document_targets(rels: &XmlDocument) -> HashMap<String, Vec<usize>> {
    let base_uri = PackURI::from_membername(partname::DOCUMENT);
    let mut targets: HashMap<String, Vec<usize>> = HashMap::new();
    for (pos, node) in rels.root().children().iter().enumerate() {
        let Some(relationship) = node.as_element().and_then(Relationship::from_element) else {
            continue;
        };
        if let Some(target) = relationship.target_partname(base_uri.base_uri()) {
            targets
                .entry(target.membername().to_string())
                .or_default()
                .push(pos);
        }
    }
    targets
}

/// Membernames targeted by any `.rels` part other than the document's.
fn referenced_elsewhere(opc: &OpcPackage, index: usize) -> Result<HashSet<String>> {
    let mut targets = HashSet::new();
    let rels_parts: Vec<&str> = opc
        .part_names()
        .filter(|name| name.ends_with(".rels") && *name != partname::DOCUMENT_RELS)
        .collect();

    for name in rels_parts {
        let Some((dir, _)) = name.rsplit_once("_rels/") else {
            continue;
        };
        let base_uri = format!("/{}", dir.trim_end_matches('/'));
        let Some(blob) = opc.part(name) else {
            continue;
        };
        let rels = XmlDocument::parse(blob).map_err(|source| MergeError::Parse {
            index,
            part: name.to_string(),
            source,
        })?;
        for element in rels.root().child_elements() {
            if let Some(target) =
                Relationship::from_element(element).and_then(|rel| rel.target_partname(&base_uri))
            {
                targets.insert(target.membername().to_string());
            }
        }
    }
    Ok(targets)
}

/// Rewrite every attribute value equal to a renamed id.
fn rewrite_ids(document: &mut XmlDocument, renamed: &HashMap<String, String>) -> usize {
    if renamed.is_empty() {
        return 0;
    }
    let mut rewritten = 0;
    document.root_mut().visit_mut(&mut |element| {
        rewritten += element.rewrite_attrs(|_, value| renamed.get(value).cloned());
    });
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::merge::test_support::Fixture;

    #[test]
    fn test_renamed_file() {
        assert_eq!(renamed_file("image1.png", 1), "image_1.png");
        assert_eq!(renamed_file("image12.jpeg", 3), "image_32.jpeg");
        assert_eq!(renamed_file("logo.png", 4), "logo_4.png");
        assert_eq!(renamed_file("README", 5), "README_5");
    }

    #[test]
    fn test_prepare_renames_relationships_and_body() {
        let mut package = Fixture::new()
            .body(r#"<w:p><w:r><w:drawing><a:blip r:embed="rId5"/></w:drawing></w:r></w:p>"#)
            .relationship("rId5", "image", "media/image1.png")
            .media("word/media/image1.png", b"png-bytes")
            .package(0);

        let mut remapper = MediaRemapper::new();
        assert_eq!(remapper.prepare(&mut package).unwrap(), 1);

        let asset = &remapper.assets()[0];
        assert_eq!(asset.sequence, 1);
        assert_eq!(asset.new_path, "media/image_1.png");
        assert_eq!(asset.relationship_id, "rId5");
        assert_eq!(asset.output_membername(), "word/media/image_1.png");

        let rels = package.document_rels.to_xml();
        assert!(rels.contains(r#"Id="rId5_1""#));
        assert!(rels.contains(r#"Target="media/image_1.png""#));
        assert!(package.document.to_xml().contains(r#"r:embed="rId5_1""#));
        assert!(!package.opc().contains_part("word/media/image1.png"));
    }

    #[test]
    fn test_sequence_is_global() {
        let mut first = Fixture::new()
            .relationship("rId4", "image", "media/image1.png")
            .relationship("rId5", "image", "media/image2.png")
            .media("word/media/image1.png", b"a")
            .media("word/media/image2.png", b"b")
            .package(0);
        let mut second = Fixture::new()
            .relationship("rId4", "image", "media/image1.png")
            .media("word/media/image1.png", b"c")
            .package(1);

        let mut remapper = MediaRemapper::new();
        remapper.prepare(&mut first).unwrap();
        remapper.prepare(&mut second).unwrap();

        let paths: Vec<_> = remapper.assets().iter().map(|a| a.new_path.as_str()).collect();
        assert_eq!(paths, ["media/image_1.png", "media/image_2.png", "media/image_3.png"]);

        let mut output = OpcPackage::new();
        remapper.generate(&mut output);
        assert_eq!(output.part("word/media/image_3.png"), Some(&b"c"[..]));
    }

    #[test]
    fn test_colliding_names_skip_a_sequence() {
        let mut first = Fixture::new()
            .relationship("rId1", "image", "media/image22.png")
            .media("word/media/image22.png", b"a")
            .package(0);
        let mut second = Fixture::new()
            .relationship("rId1", "image", "media/image2.png")
            .media("word/media/image2.png", b"b")
            .package(1);

        let mut remapper = MediaRemapper::new();
        remapper.prepare(&mut first).unwrap();
        // image2.png at sequence 12 would become image_12.png as well
        remapper.sequence = 11;
        remapper.prepare(&mut second).unwrap();

        let assets = remapper.assets();
        assert_eq!(assets[0].new_path, "media/image_12.png");
        assert_eq!(assets[1].new_path, "media/image_13.png");
        assert_eq!(assets[1].sequence, 13);
        assert!(second.document_rels.to_xml().contains(r#"Id="rId1_13""#));
    }

    #[test]
    fn test_dangling_media() {
        let mut package = Fixture::new()
            .media("word/media/orphan1.png", b"a")
            .package(2);
        let result = MediaRemapper::new().prepare(&mut package);
        assert!(matches!(
            result,
            Err(MergeError::DanglingMediaReference { index: 2, media }) if media == "word/media/orphan1.png"
        ));
    }

    #[test]
    fn test_header_only_media_is_left_alone() {
        let mut package = Fixture::new()
            .media("word/media/logo1.png", b"a")
            .part(
                "word/_rels/header1.xml.rels",
                br#"<Relationships><Relationship Id="rId1" Type="image" Target="media/logo1.png"/></Relationships>"#,
            )
            .package(0);

        let mut remapper = MediaRemapper::new();
        assert_eq!(remapper.prepare(&mut package).unwrap(), 0);
        assert!(package.opc().contains_part("word/media/logo1.png"));
    }
}
