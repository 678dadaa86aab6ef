//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! This module handles the low-level reading of OPC packages from ZIP archives
//! and the writing of merged packages back into one, with the compression
//! settings chosen by the caller.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Options applied while reading an input package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Reject any entry whose uncompressed size exceeds this many bytes
    pub max_part_size: Option<u64>,
}

/// Compression used for every entry of the generated package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// DEFLATE, the method Word itself writes
    #[default]
    Deflated,
    /// No compression
    Stored,
}

/// Options applied while writing the merged package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub compression: Compression,
    /// DEFLATE level 0-9; ignored for stored entries
    pub compression_level: Option<i64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            compression_level: Some(4),
        }
    }
}

impl GenerateOptions {
    /// Validate the settings before any work is done.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match (self.compression, self.compression_level) {
            (Compression::Deflated, Some(level)) if !(0..=9).contains(&level) => Err(format!(
                "DEFLATE compression level must be within 0..=9, got {}",
                level
            )),
            _ => Ok(()),
        }
    }

    fn file_options(&self) -> SimpleFileOptions {
        match self.compression {
            Compression::Deflated => SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(self.compression_level),
            Compression::Stored => {
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
            },
        }
    }
}

/// Physical package reader that extracts every entry of a ZIP-based OPC package.
pub struct PhysPkgReader;

impl PhysPkgReader {
    /// Read all file entries, in archive order.
    ///
    /// Directory entries are skipped. Fails when the bytes are not a ZIP
    /// archive, when an entry cannot be decompressed, or when an entry is
    /// larger than `options.max_part_size`.
    pub fn read_parts(data: &[u8], options: &LoadOptions) -> Result<Vec<Part>> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }

            let membername = entry.name().to_string();
            let declared = entry.size();
            if let Some(limit) = options.max_part_size
                && declared > limit
            {
                return Err(OpcError::PartTooLarge {
                    partname: membername,
                    size: declared,
                    limit,
                });
            }

            let mut blob = Vec::with_capacity(declared.min(1 << 24) as usize);
            match options.max_part_size {
                // Declared sizes can lie; never inflate past the limit
                Some(limit) => {
                    entry.by_ref().take(limit + 1).read_to_end(&mut blob)?;
                    if blob.len() as u64 > limit {
                        return Err(OpcError::PartTooLarge {
                            partname: membername,
                            size: blob.len() as u64,
                            limit,
                        });
                    }
                },
                None => {
                    entry.read_to_end(&mut blob)?;
                },
            }

            parts.push(Part::new(PackURI::from_membername(&membername), blob));
        }

        Ok(parts)
    }
}

/// Physical package writer for creating OPC packages in memory.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
    file_options: SimpleFileOptions,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new(options: &GenerateOptions) -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
            file_options: options.file_options(),
        }
    }

    /// Write a part to the package.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive
            .start_file(pack_uri.membername(), self.file_options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.archive.finish()?.into_inner())
    }
}
