/// Error types for package merging.
use thiserror::Error;

use crate::common::xml::XmlError;
use crate::ooxml::opc::error::OpcError;

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Error types for merge operations.
///
/// Source indices are 0-based positions in the overall merge order, counted
/// across every call to [`DocxMerger::merge`](crate::DocxMerger::merge).
#[derive(Error, Debug)]
pub enum MergeError {
    /// An input could not be opened as a package
    #[error("Source {index} is not a readable package: {source}")]
    PackageLoad {
        index: usize,
        #[source]
        source: OpcError,
    },

    /// A required part is absent from a package
    #[error("Source {index} has no {part} part")]
    MissingPart { index: usize, part: String },

    /// A present part holds malformed XML
    #[error("Source {index}: malformed XML in {part}: {source}")]
    Parse {
        index: usize,
        part: String,
        #[source]
        source: XmlError,
    },

    /// A media file has no relationship pointing at it
    #[error("Source {index}: no relationship targets media file {media}")]
    DanglingMediaReference { index: usize, media: String },

    /// The merged package could not be written
    #[error("Failed to generate merged package: {0}")]
    Generate(#[source] OpcError),

    /// Invalid merge options
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A previous call failed and left the merge session unusable
    #[error("Merge session was poisoned by an earlier failure")]
    Poisoned,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking merge task panicked or was cancelled
    #[cfg(feature = "async")]
    #[error("Merge task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
