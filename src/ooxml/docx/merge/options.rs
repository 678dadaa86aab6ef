/// Configuration types for merging Word packages.
///
/// Options can be built in code with the `with_*` methods or loaded from a
/// YAML document such as:
///
/// ```yaml
/// page_break: false
/// load:
///   max_part_size: 67108864
/// generate:
///   compression: deflated
///   compression_level: 6
/// ```
use serde::{Deserialize, Serialize};

use crate::ooxml::error::{MergeError, Result};
pub use crate::ooxml::opc::phys_pkg::{Compression, GenerateOptions, LoadOptions};

/// Configuration options for a merge.
///
/// # Examples
///
/// ```rust
/// use docx_merge::{Compression, MergeOptions};
///
/// // Create with defaults
/// let options = MergeOptions::default();
/// assert!(options.page_break);
///
/// // Or customize
/// let options = MergeOptions::new()
///     .with_page_break(false)
///     .with_compression(Compression::Stored);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Insert a page break between consecutive source documents
    pub page_break: bool,
    /// Settings used when opening each input package
    pub load: LoadOptions,
    /// Settings used when writing the merged package
    pub generate: GenerateOptions,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            page_break: true,
            load: LoadOptions::default(),
            generate: GenerateOptions::default(),
        }
    }
}

impl MergeOptions {
    /// Create a new `MergeOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether a page break separates consecutive sources.
    #[inline]
    pub fn with_page_break(mut self, page_break: bool) -> Self {
        self.page_break = page_break;
        self
    }

    /// Reject input parts larger than `limit` bytes once decompressed.
    #[inline]
    pub fn with_max_part_size(mut self, limit: u64) -> Self {
        self.load.max_part_size = Some(limit);
        self
    }

    /// Set the compression method of the merged package.
    #[inline]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.generate.compression = compression;
        self
    }

    /// Set the DEFLATE level (0-9) of the merged package.
    #[inline]
    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.generate.compression_level = Some(level);
        self
    }

    /// Load options from a YAML document.
    ///
    /// Missing keys take their default values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self = serde_saphyr::from_str(yaml)
            .map_err(|e| MergeError::Config(format!("Failed to parse merge options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Check the options before any input is touched.
    pub fn validate(&self) -> Result<()> {
        if self.load.max_part_size == Some(0) {
            return Err(MergeError::Config(
                "max_part_size must be greater than zero".to_string(),
            ));
        }
        self.generate.validate().map_err(MergeError::Config)
    }
}
