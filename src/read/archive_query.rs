//! Archive query methods.
//!
//! Read-only accessors for archive-level facts established at open time.

use super::ZipArchive;

impl ZipArchive {
    /// The archive's display name (the path it was opened from, or the
    /// name given to [`from_file`](Self::from_file)).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of entries declared by the end-of-central-directory
    /// record (and verified against the directory walk).
    ///
    /// Counts every record, including duplicate names.
    pub fn len(&self) -> usize {
        self.entry_count
    }

    /// Returns `true` if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// The raw archive comment trailing the end-of-central-directory
    /// record; empty when absent.
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }

    /// Returns `true` if entry names decode as UTF-8.
    ///
    /// Decided once at open time: if any entry in the archive sets the
    /// 0x0800 general-purpose flag, every name in the archive is treated
    /// as UTF-8; otherwise all names decode as legacy CP437.
    pub fn names_are_utf8(&self) -> bool {
        self.utf8_names
    }

    /// Total size of the underlying file in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }
}
