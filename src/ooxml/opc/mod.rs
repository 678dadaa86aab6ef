/// Open Packaging Conventions (OPC) implementation.
///
/// This module provides the subset of the OPC specification a package merge
/// needs: the structure and packaging format shared by all Office Open XML
/// documents. It includes support for:
///
/// - Package structure (parts kept in archive order)
/// - Relationship views and relationship id allocation
/// - ZIP-based physical packaging with configurable compression
///
/// # Performance Features
///
/// - Uses `atoi_simd` for fast integer parsing
/// - Uses hash maps for O(1) part lookups
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod rel;

// Re-export commonly used types
pub use error::OpcError;
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
pub use phys_pkg::{Compression, GenerateOptions, LoadOptions};
pub use rel::Relationship;
