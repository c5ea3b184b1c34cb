//! Archive opening, lookup, iteration, and extraction.
//!
//! The entry point is [`ZipArchive`]: open it once, share it across
//! threads, and query it as often as needed. The archive is immutable
//! after a successful open; the central directory mapping and the name
//! index are never touched again, so [`find_entry`](ZipArchive::find_entry)
//! and iteration require no locking.
//!
//! # Example
//!
//! ```rust,no_run
//! use zipdex::ZipArchive;
//!
//! # fn main() -> zipdex::Result<()> {
//! let archive = ZipArchive::open_path("classes.jar")?;
//! println!("{} entries", archive.len());
//!
//! if let Some(entry) = archive.find_entry(b"com/example/Main.class") {
//!     let bytes = archive.read_entry_to_vec(&entry)?;
//!     println!("loaded {} bytes", bytes.len());
//! }
//! # Ok(())
//! # }
//! ```

mod archive_open;
mod archive_query;
mod entries;
mod entry;
mod extraction;
pub(crate) mod index;

pub use entries::Entries;
pub use entry::{CompressionMethod, EntryName, ZipEntry};

use std::fs::File;

use memmap2::Mmap;

use index::NameIndex;

/// A read-only, indexed view of a Zip archive.
///
/// Owns the file handle and a read-only memory mapping of exactly the
/// central directory byte range. All entry metadata is decoded on demand
/// from the mapping; the only per-entry state held in memory is one name
/// slot in the fixed-size hash table.
///
/// # Concurrency
///
/// `ZipArchive` is `Send + Sync`. Lookups, iteration, and extraction all
/// take `&self` and never mutate, so any number of threads may use one
/// archive concurrently. Dropping (or [`close`](Self::close)-ing) the
/// archive while queries are in flight is prevented by the borrow checker.
pub struct ZipArchive {
    pub(crate) file: File,
    pub(crate) name: String,
    pub(crate) file_size: u64,
    /// Start of the central directory, after any offset recovery.
    pub(crate) cd_offset: u64,
    /// Mapping of the central directory range; `None` for empty archives.
    pub(crate) mapping: Option<Mmap>,
    pub(crate) index: NameIndex,
    pub(crate) entry_count: usize,
    pub(crate) utf8_names: bool,
    pub(crate) comment: Vec<u8>,
}

impl ZipArchive {
    /// The mapped central directory bytes (empty for archives with no
    /// entries).
    #[inline]
    pub(crate) fn cd(&self) -> &[u8] {
        self.mapping.as_deref().unwrap_or(&[])
    }
}

impl std::fmt::Debug for ZipArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipArchive")
            .field("name", &self.name)
            .field("entry_count", &self.entry_count)
            .field("cd_offset", &self.cd_offset)
            .field("utf8_names", &self.utf8_names)
            .finish_non_exhaustive()
    }
}
