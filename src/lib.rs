//! docx-merge - A Rust library for merging Word (.docx) documents
//!
//! This library combines several Office Open XML word-processing packages into
//! one package whose body is the concatenation of the inputs, in order.
//!
//! # Features
//!
//! - **Identifier remapping**: style ids, list numbering ids and media
//!   relationship ids are renamed per source so they never collide
//! - **Reference propagation**: every renamed id is rewritten wherever the
//!   source referred to it (body, styles, numbering, relationships)
//! - **Registry merging**: content types and relationships are deduplicated
//! - **Body splicing**: bodies are concatenated with optional page breaks,
//!   keeping the first document's section properties
//! - **Async front end**: `merge_files` reads inputs concurrently (feature `async`)
//!
//! # Example - Merging documents in memory
//!
//! ```no_run
//! use docx_merge::{MergeOptions, merge_documents};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sources = [std::fs::read("a.docx")?, std::fs::read("b.docx")?];
//! let options = MergeOptions::new().with_page_break(true);
//!
//! if let Some(merged) = merge_documents(sources, options)? {
//!     std::fs::write("merged.docx", merged)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Incremental merging
//!
//! ```no_run
//! use docx_merge::{DocxMerger, MergeOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut merger = DocxMerger::new(MergeOptions::default())?;
//! merger.merge([std::fs::read("cover.docx")?])?;
//! merger.merge([std::fs::read("chapter1.docx")?, std::fs::read("chapter2.docx")?])?;
//! println!("{} documents merged", merger.source_count());
//!
//! let merged = merger.save()?.expect("at least one source");
//! std::fs::write("book.docx", merged)?;
//! # Ok(())
//! # }
//! ```

/// Shared XML utilities
pub mod common;

/// OOXML (Office Open XML) packaging and the Word merge engine
pub mod ooxml;

pub use ooxml::docx::merge::{
    Compression, DocxMerger, GenerateOptions, LoadOptions, MergeOptions, merge_documents,
};
#[cfg(feature = "async")]
pub use ooxml::docx::merge::merge_files;
pub use ooxml::error::{MergeError, Result};
