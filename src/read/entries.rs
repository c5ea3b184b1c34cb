//! Iteration over central directory records.

use crate::format;

use super::ZipArchive;
use super::entry::{ZipEntry, decode_entry};

/// A cursor over the archive's entries in central directory order.
///
/// Created by [`ZipArchive::entries`] or
/// [`ZipArchive::entries_with_prefix`]. Walks the mapped directory
/// independently of the hash table, so duplicate names are all visited.
/// Order is the physical record order, not name order.
///
/// Cursors are cheap, hold no locks, and are independent of each other;
/// restart a walk by creating a new cursor.
pub struct Entries<'a> {
    archive: &'a ZipArchive,
    /// Byte position of the next record within the mapping.
    pos: usize,
    /// Records not yet visited.
    remaining: usize,
    /// Byte-wise name prefix filter; empty matches everything.
    prefix: Vec<u8>,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(archive: &'a ZipArchive, prefix: Vec<u8>) -> Self {
        Self {
            archive,
            pos: 0,
            remaining: archive.entry_count,
            prefix,
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = ZipEntry<'a>;

    fn next(&mut self) -> Option<ZipEntry<'a>> {
        let cd = self.archive.cd();
        while self.remaining > 0 {
            // The open-time walk validated every record; this re-parse
            // only recovers lengths to advance the cursor.
            let record = format::CentralRecord::parse(&cd[self.pos..]);
            let entry = decode_entry(self.archive, self.pos);
            self.pos += record.total_len();
            self.remaining -= 1;

            if entry.name.as_bytes().starts_with(&self.prefix) {
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // The prefix can filter out anything up to everything.
        let upper = self.remaining;
        let lower = if self.prefix.is_empty() { upper } else { 0 };
        (lower, Some(upper))
    }
}

impl std::fmt::Debug for Entries<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entries")
            .field("remaining", &self.remaining)
            .field("prefix", &String::from_utf8_lossy(&self.prefix))
            .finish()
    }
}

impl ZipArchive {
    /// Iterates every entry in central directory order.
    ///
    /// Unlike [`find_entry`](Self::find_entry), iteration visits duplicate
    /// names too.
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(self, Vec::new())
    }

    /// Iterates entries whose raw name bytes start with `prefix`, in
    /// central directory order.
    ///
    /// The match is purely byte-wise; `/` has no special meaning, so
    /// `b"dir/"` and `b"dir"` are different filters.
    pub fn entries_with_prefix(&self, prefix: &[u8]) -> Entries<'_> {
        Entries::new(self, prefix.to_vec())
    }
}
