//! Word (.docx) document support.
//!
//! # Architecture
//!
//! - `WordPackage`: a .docx package with the parts a merge rewrites parsed
//! - `merge`: the engine that merges several packages into one
pub mod merge;
pub mod package;

pub use merge::DocxMerger;
pub use package::WordPackage;
