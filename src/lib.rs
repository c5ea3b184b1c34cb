//! # zipdex
//!
//! A read-only, memory-mapped index over Zip and JAR archives.
//!
//! This crate is built for the access pattern of class loaders and asset
//! pipelines: open a (possibly huge) archive once, then answer
//! "find entry by name" queries many times, cheaply. Instead of reading the
//! whole file, only the central directory is memory-mapped, and a
//! fixed-size open-addressing hash table over the raw entry names is built
//! at open time. Entry metadata is decoded lazily from the mapping on each
//! lookup, so memory stays bounded no matter how large the archive is.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zipdex::{Result, ZipArchive};
//!
//! fn main() -> Result<()> {
//!     let archive = ZipArchive::open_path("app.jar")?;
//!
//!     // Constant-time lookup by raw name bytes.
//!     if let Some(entry) = archive.find_entry(b"META-INF/MANIFEST.MF") {
//!         println!("{} bytes, crc {:08x}", entry.uncompressed_size, entry.crc32);
//!         let manifest = archive.read_entry_to_vec(&entry)?;
//!         println!("{}", String::from_utf8_lossy(&manifest));
//!     }
//!
//!     // Walk entries in central-directory order, optionally by prefix.
//!     for entry in archive.entries_with_prefix(b"com/example/") {
//!         println!("{}", entry.name.decode());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Open**: locate the end-of-central-directory record by a bounded
//!   backward scan, validate it against the file size, map exactly the
//!   central directory byte range, and index every entry name.
//! - **Lookup**: hash the query bytes and probe the table; a miss is an
//!   ordinary [`None`], not an error. Lookups never mutate the archive, so
//!   one [`ZipArchive`] can serve any number of concurrent readers.
//! - **Extract**: stored entries are copied verbatim, deflated entries are
//!   streamed through the deflate codec; the result is always verified
//!   against the directory's CRC-32.
//!
//! Writing archives is out of scope: the index never modifies the file.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. The [`Error`] enum carries the archive
//! name and offending offset where applicable, so callers can build precise
//! diagnostics. See the [`error`] module for the full taxonomy.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Default buffer size for streaming reads (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod checksum;
pub mod codec;
pub mod error;
pub mod read;
pub mod timestamp;

pub(crate) mod format;

pub use error::{Error, Result};
pub use read::{CompressionMethod, Entries, EntryName, ZipArchive, ZipEntry};
pub use timestamp::DosDateTime;
