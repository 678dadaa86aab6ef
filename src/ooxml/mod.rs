//! Office Open XML (OOXML) format implementation.
//!
//! # Architecture
//!
//! The module is organized into layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, parts, relationships)
//! 2. **Errors** (`error`): The merge error taxonomy
//! 3. **Word** (`docx`): Parsed Word packages and the merge engine
//!
//! # Example: Inspecting a package
//!
//! ```rust,no_run
//! use docx_merge::ooxml::opc::{LoadOptions, OpcPackage};
//!
//! let bytes = std::fs::read("document.docx")?;
//! let pkg = OpcPackage::from_bytes(&bytes, &LoadOptions::default())?;
//! for name in pkg.list_folder("word/media/") {
//!     println!("{}", name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};
