//! Merging of several Word packages into one.
//!
//! The first package is the base: its document, styles, numbering,
//! relationships and content types are rewritten to hold the merged content,
//! and it becomes the output. Every source, the base included, is processed
//! exactly once and in order:
//!
//! 1. content type declarations are merged ([`ContentTypeMerger`])
//! 2. media files are renamed ([`MediaRemapper`])
//! 3. document relationships are merged ([`RelationshipMerger`])
//! 4. list definitions are renumbered ([`NumberingRemapper`])
//! 5. styles are renamed ([`StyleRemapper`])
//! 6. the body is extracted ([`BodySplicer`])
//!
//! # Examples
//!
//! ```rust,no_run
//! use docx_merge::{DocxMerger, MergeOptions};
//!
//! let first = std::fs::read("first.docx")?;
//! let second = std::fs::read("second.docx")?;
//!
//! let mut merger = DocxMerger::new(MergeOptions::default())?;
//! merger.merge([first, second])?;
//! if let Some(bytes) = merger.save()? {
//!     std::fs::write("merged.docx", bytes)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod body;
mod content_types;
mod ids;
mod media;
mod numbering;
mod options;
mod relationships;
mod styles;
#[cfg(test)]
pub(crate) mod test_support;
#[cfg(feature = "async")]
mod tokio_io;

pub use body::BodySplicer;
pub use content_types::ContentTypeMerger;
pub use media::{MediaAsset, MediaRemapper};
pub use numbering::NumberingRemapper;
pub use options::{Compression, GenerateOptions, LoadOptions, MergeOptions};
pub use relationships::RelationshipMerger;
pub use styles::StyleRemapper;
#[cfg(feature = "async")]
pub use tokio_io::merge_files;

use log::{debug, info};

use crate::ooxml::docx::package::WordPackage;
use crate::ooxml::error::{MergeError, Result};
use crate::ooxml::opc::PackURI;
use crate::ooxml::opc::constants::{content_type as ct, partname, relationship_type};

/// Accumulated state of one merge.
///
/// Owned by a single [`DocxMerger`]; nothing in it is shared.
#[derive(Debug)]
struct MergeSession {
    /// The first package, which becomes the output
    base: Option<WordPackage>,
    source_count: usize,
    content_types: ContentTypeMerger,
    relationships: RelationshipMerger,
    media: MediaRemapper,
    numbering: NumberingRemapper,
    styles: StyleRemapper,
    body: BodySplicer,
}

impl MergeSession {
    fn new(page_break: bool) -> Self {
        Self {
            base: None,
            source_count: 0,
            content_types: ContentTypeMerger::new(),
            relationships: RelationshipMerger::new(),
            media: MediaRemapper::new(),
            numbering: NumberingRemapper::new(),
            styles: StyleRemapper::new(),
            body: BodySplicer::new(page_break),
        }
    }

    fn process(&mut self, mut package: WordPackage) -> Result<()> {
        let index = package.index();
        debug!("Merging source {}", index);

        self.content_types.merge(&package.content_types);
        self.media.prepare(&mut package)?;
        self.relationships.merge(&package.document_rels, index);
        self.numbering.prepare(&mut package);
        self.styles.prepare(&mut package);
        self.body.extract(&mut package);

        if self.base.is_none() {
            self.base = Some(package);
        }
        self.source_count += 1;
        Ok(())
    }

    fn generate(self, options: &MergeOptions) -> Result<Option<Vec<u8>>> {
        let Some(mut output) = self.base else {
            info!("No sources merged, nothing to save");
            return Ok(None);
        };
        let mut content_types = self.content_types;
        let mut relationships = self.relationships;

        if self.numbering.generate(&mut output) {
            let numbering_uri = PackURI::from_membername(partname::NUMBERING);
            let document_uri = PackURI::from_membername(partname::DOCUMENT);
            content_types.ensure_override(numbering_uri.as_str(), ct::WML_NUMBERING);
            relationships.ensure(
                relationship_type::NUMBERING,
                &numbering_uri.relative_ref(document_uri.base_uri()),
            );
        }

        debug!(
            "Writing {} content types, {} relationships, {} media files, {} styles",
            content_types.len(),
            relationships.len(),
            self.media.assets().len(),
            self.styles.len()
        );
        content_types.generate(&mut output.content_types);
        self.media.generate(output.opc_mut());
        relationships.generate(&mut output.document_rels);
        self.styles.generate(&mut output.styles);
        self.body.generate(&mut output.document);

        let bytes = output
            .store()
            .generate(&options.generate)
            .map_err(MergeError::Generate)?;
        info!(
            "Saved merged package of {} sources ({} bytes)",
            self.source_count,
            bytes.len()
        );
        Ok(Some(bytes))
    }
}

/// Merges Word packages, in order, into the first one.
///
/// A merger can take sources over several [`merge`](Self::merge) calls;
/// source indices keep counting across calls. Any error leaves the merge
/// session in an undefined state, so the merger refuses further work with
/// [`MergeError::Poisoned`].
#[derive(Debug)]
pub struct DocxMerger {
    options: MergeOptions,
    session: MergeSession,
    poisoned: bool,
}

impl DocxMerger {
    /// Create a merger, validating the options first.
    pub fn new(options: MergeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            session: MergeSession::new(options.page_break),
            options,
            poisoned: false,
        })
    }

    /// Merge the given packages after those already merged.
    ///
    /// All sources are opened before any is merged, so an unreadable
    /// input fails the call before the session changes.
    pub fn merge<I, S>(&mut self, sources: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        if self.poisoned {
            return Err(MergeError::Poisoned);
        }
        let result = self.merge_sources(sources);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn merge_sources<I, S>(&mut self, sources: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let first_index = self.session.source_count;
        let packages = sources
            .into_iter()
            .enumerate()
            .map(|(offset, source)| {
                WordPackage::open(first_index + offset, source.as_ref(), &self.options.load)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Merging {} sources after {} already merged",
            packages.len(),
            first_index
        );
        for package in packages {
            self.session.process(package)?;
        }
        Ok(())
    }

    /// Number of sources merged so far.
    #[inline]
    pub fn source_count(&self) -> usize {
        self.session.source_count
    }

    /// Whether an earlier failure made this merger unusable.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Assemble the merged package.
    ///
    /// Returns `Ok(None)` when no source was merged.
    pub fn save(self) -> Result<Option<Vec<u8>>> {
        if self.poisoned {
            return Err(MergeError::Poisoned);
        }
        self.session.generate(&self.options)
    }
}

/// Merge `sources` in order and return the merged package.
///
/// Returns `Ok(None)` when `sources` is empty.
pub fn merge_documents<I, S>(sources: I, options: MergeOptions) -> Result<Option<Vec<u8>>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut merger = DocxMerger::new(options)?;
    merger.merge(sources)?;
    merger.save()
}
