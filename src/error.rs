//! Error types for archive index operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when opening, indexing, and extracting from Zip archives,
//! along with a convenient [`Result<T>`] type alias.
//!
//! Two kinds of outcome deliberately do **not** appear here:
//!
//! - A lookup miss is an ordinary result, not a failure:
//!   [`ZipArchive::find_entry`] returns `Option`.
//! - Use-after-close cannot be represented at all: closing an archive
//!   consumes it, so the compiler rejects any later use.
//!
//! [`ZipArchive::find_entry`]: crate::ZipArchive::find_entry
//!
//! # Example
//!
//! ```rust,no_run
//! use zipdex::{Error, ZipArchive};
//!
//! fn open_with_diagnostics(path: &str) -> zipdex::Result<ZipArchive> {
//!     match ZipArchive::open_path(path) {
//!         Ok(archive) => Ok(archive),
//!         Err(Error::EocdNotFound { name }) => {
//!             eprintln!("'{}' is not a Zip archive", name);
//!             Err(Error::EocdNotFound { name })
//!         }
//!         Err(Error::CdEntryTruncated { offset, reason }) => {
//!             eprintln!("directory corrupt at byte {:#x}: {}", offset, reason);
//!             Err(Error::CdEntryTruncated { offset, reason })
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;

/// The main error type for archive index operations.
///
/// Open-time errors ([`InvalidFile`][Self::InvalidFile] through
/// [`MmapFailed`][Self::MmapFailed]) are atomic: if `open` fails, no
/// partial archive state survives. Extraction errors
/// ([`UnsupportedMethod`][Self::UnsupportedMethod],
/// [`CrcMismatch`][Self::CrcMismatch]) abort a single extraction and leave
/// the archive usable for every other entry.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    ///
    /// This wraps [`std::io::Error`] and is returned when opening, reading,
    /// or writing fails, including inflate failures on corrupt compressed
    /// data (surfaced by the decoder as `InvalidData`).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file cannot be an archive at all.
    ///
    /// Returned for empty files, stat failures, multi-disk archives, and
    /// for entries whose local header or data region contradicts the
    /// central directory during extraction.
    #[error("invalid archive '{name}': {reason}")]
    InvalidFile {
        /// The archive path or display name.
        name: String,
        /// A description of what disqualifies the file.
        reason: String,
    },

    /// No end-of-central-directory signature within the trailing search
    /// window (the fixed record plus the maximum 64 KiB comment).
    #[error("end of central directory signature not found in '{name}'")]
    EocdNotFound {
        /// The archive path or display name.
        name: String,
    },

    /// The declared central directory range is inconsistent with the file,
    /// even after recomputing the offset from the end-of-central-directory
    /// position (the prepended-data recovery heuristic).
    #[error(
        "central directory of '{name}' lies outside the file \
         (offset {cd_offset:#x}, size {cd_size:#x}, end record at {eocd_offset:#x})"
    )]
    CdNotFound {
        /// The archive path or display name.
        name: String,
        /// The central directory offset declared by the end record.
        cd_offset: u64,
        /// The central directory size declared by the end record.
        cd_size: u64,
        /// The file offset of the end-of-central-directory record.
        eocd_offset: u64,
    },

    /// A central directory record is malformed or overruns the mapped
    /// directory.
    ///
    /// One bad record fails the whole open: a corrupt length field would
    /// desynchronize the parse of every record after it.
    #[error("truncated central directory record at offset {offset:#x}: {reason}")]
    CdEntryTruncated {
        /// The file offset of the offending record.
        offset: u64,
        /// A description of the corruption.
        reason: String,
    },

    /// Memory-mapping the central directory range failed.
    #[error("failed to map central directory of '{name}': {source}")]
    MmapFailed {
        /// The archive path or display name.
        name: String,
        /// The underlying mapping error.
        #[source]
        source: io::Error,
    },

    /// The entry uses a compression method other than stored or deflated.
    ///
    /// Extraction is never attempted for such entries; lookup and iteration
    /// still report them.
    #[error("unsupported compression method {method} for entry '{entry}'")]
    UnsupportedMethod {
        /// The raw method id from the central directory.
        method: u16,
        /// The entry name (decoded lossily for display).
        entry: String,
    },

    /// Extracted data does not match the CRC-32 stored in the central
    /// directory.
    ///
    /// This guards against truncated or corrupt archive data, including
    /// mapped pages that turned out shorter than the directory claims.
    #[error("CRC mismatch for entry '{entry}': expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch {
        /// The entry name (decoded lossily for display).
        entry: String,
        /// The CRC-32 recorded in the central directory.
        expected: u32,
        /// The CRC-32 of the bytes actually produced.
        actual: u32,
    },
}

impl Error {
    /// Returns `true` if this error indicates corrupt archive data.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::CdEntryTruncated { .. } | Error::CrcMismatch { .. }
        )
    }

    /// Returns `true` if this error means the file is not a usable archive
    /// (as opposed to a per-entry extraction failure).
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            Error::InvalidFile { .. }
                | Error::EocdNotFound { .. }
                | Error::CdNotFound { .. }
                | Error::CdEntryTruncated { .. }
                | Error::MmapFailed { .. }
        )
    }

    /// Returns the archive path or display name carried by this error, if any.
    pub fn archive_name(&self) -> Option<&str> {
        match self {
            Error::InvalidFile { name, .. }
            | Error::EocdNotFound { name }
            | Error::CdNotFound { name, .. }
            | Error::MmapFailed { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the entry name associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::UnsupportedMethod { entry, .. } | Error::CrcMismatch { entry, .. } => {
                Some(entry)
            }
            _ => None,
        }
    }

    /// Returns the offending file offset, if this error carries one.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Error::CdEntryTruncated { offset, .. } => Some(*offset),
            Error::CdNotFound { cd_offset, .. } => Some(*cd_offset),
            _ => None,
        }
    }
}

/// A specialized Result type for archive index operations.
///
/// This is defined as `std::result::Result<T, Error>` for convenience.
pub type Result<T> = std::result::Result<T, Error>;
