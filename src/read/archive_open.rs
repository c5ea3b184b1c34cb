//! Archive opening and index construction.
//!
//! Opening walks the fixed pipeline described on [`ZipArchive::open_path`]:
//! stat, locate the end-of-central-directory record, validate the declared
//! directory range (with the prepended-data recovery heuristic), map the
//! directory, and index every entry name. Any failure abandons the open as
//! a whole; the partially built file handle and mapping unwind on the
//! error path, so no resources leak.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::MmapOptions;

use crate::format::{
    self, CENTRAL_HEADER_FIXED_SIZE, CENTRAL_HEADER_SIGNATURE, EOCD_FIXED_SIZE, EocdRecord,
    FLAG_UTF8_NAMES, MAX_COMMENT_LEN,
};
use crate::{Error, Result};

use super::ZipArchive;
use super::index::NameIndex;

impl ZipArchive {
    /// Opens and indexes the archive at `path`.
    ///
    /// The open is atomic: on any error the descriptor and any partial
    /// mapping are released before returning, and no archive value exists.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the file cannot be opened.
    /// - [`Error::InvalidFile`] for empty files, stat failures, and
    ///   multi-disk archives.
    /// - [`Error::EocdNotFound`] when no end-of-central-directory signature
    ///   exists in the trailing search window.
    /// - [`Error::CdNotFound`] when the directory range stays inconsistent
    ///   even after offset recovery.
    /// - [`Error::CdEntryTruncated`] when any directory record is malformed.
    /// - [`Error::MmapFailed`] when mapping the directory range fails.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_file(file, path.display().to_string())
    }

    /// Opens and indexes an archive from an already-open file.
    ///
    /// Takes ownership of `file`; a caller that wants to keep using its
    /// handle should pass a [`File::try_clone`] instead. `name` only
    /// appears in error messages.
    pub fn from_file(mut file: File, name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        let file_size = file
            .metadata()
            .map_err(|e| Error::InvalidFile {
                name: name.clone(),
                reason: format!("stat failed: {e}"),
            })?
            .len();
        if file_size == 0 {
            return Err(Error::InvalidFile {
                name,
                reason: "file is empty".into(),
            });
        }

        let (eocd_pos, eocd, comment) = locate_eocd(&mut file, file_size, &name)?;

        if eocd.is_multi_disk() {
            return Err(Error::InvalidFile {
                name,
                reason: "multi-disk archives are not supported".into(),
            });
        }

        let cd_size = eocd.cd_size as u64;
        let declared_offset = eocd.cd_offset as u64;

        // The directory must end exactly at the end-of-central-directory
        // record. Some producers (self-extracting stubs, signed APKs with
        // prepended data) write offsets relative to where the Zip data sat
        // before bytes were prepended; recompute from the record position.
        let cd_offset = if declared_offset + cd_size != eocd_pos {
            let Some(adjusted) = eocd_pos.checked_sub(cd_size) else {
                return Err(Error::CdNotFound {
                    name,
                    cd_offset: declared_offset,
                    cd_size,
                    eocd_offset: eocd_pos,
                });
            };
            log::debug!(
                "central directory of '{name}' does not end at the end record; \
                 recomputed offset {declared_offset:#x} -> {adjusted:#x}"
            );
            adjusted
        } else {
            declared_offset
        };

        let mapping = if cd_size == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only and private to this archive.
            // As with any file-backed map, a writer truncating the archive
            // underneath us yields torn reads, not memory unsafety in the
            // decode paths; the contract here is a read-only file.
            let map = unsafe {
                MmapOptions::new()
                    .offset(cd_offset)
                    .len(cd_size as usize)
                    .map(&file)
            }
            .map_err(|source| Error::MmapFailed {
                name: name.clone(),
                source,
            })?;
            Some(map)
        };

        let entry_count = eocd.total_entries as usize;
        let cd = mapping.as_deref().unwrap_or(&[]);
        let (index, utf8_names) = build_index(cd, cd_offset, entry_count)?;

        Ok(ZipArchive {
            file,
            name,
            file_size,
            cd_offset,
            mapping,
            index,
            entry_count,
            utf8_names,
            comment,
        })
    }

    /// Closes the archive, unmapping the directory and releasing the
    /// descriptor.
    ///
    /// Consuming `self` makes use-after-close and double-close compile
    /// errors rather than runtime ones. Dropping the archive has the same
    /// effect; this method exists to make the release explicit at call
    /// sites that care about descriptor lifetime.
    pub fn close(self) {
        drop(self);
    }
}

/// Reads the trailing window and locates the end-of-central-directory
/// record. Returns its file offset, parsed fields, and the archive
/// comment.
fn locate_eocd(file: &mut File, file_size: u64, name: &str) -> Result<(u64, EocdRecord, Vec<u8>)> {
    // The record sits at most a 64 KiB comment away from EOF, so one
    // bounded read covers every possible position; huge archives are never
    // scanned.
    let window = file_size.min((EOCD_FIXED_SIZE + MAX_COMMENT_LEN) as u64);
    let window_start = file_size - window;

    let mut tail = vec![0u8; window as usize];
    file.seek(SeekFrom::Start(window_start))?;
    file.read_exact(&mut tail)?;

    let record = format::find_eocd(&tail)
        .and_then(|pos| EocdRecord::parse(&tail[pos..]).map(|eocd| (pos, eocd)));
    let Some((pos_in_tail, eocd)) = record else {
        return Err(Error::EocdNotFound { name: name.into() });
    };
    let eocd_pos = window_start + pos_in_tail as u64;

    // Comments truncated by the producer are tolerated; they are advisory.
    let comment_start = pos_in_tail + EOCD_FIXED_SIZE;
    let comment_end = (comment_start + eocd.comment_len as usize).min(tail.len());
    let comment = tail[comment_start..comment_end].to_vec();

    Ok((eocd_pos, eocd, comment))
}

/// Walks the mapped directory once, validating every record and inserting
/// each name into the table. Returns the table and the archive-wide UTF-8
/// name decision.
fn build_index(cd: &[u8], base: u64, entry_count: usize) -> Result<(NameIndex, bool)> {
    let mut index = NameIndex::with_entry_capacity(entry_count);
    let mut utf8_names = false;
    let mut pos = 0usize;

    for i in 0..entry_count {
        let offset = base + pos as u64;
        if cd.len() - pos < CENTRAL_HEADER_FIXED_SIZE {
            return Err(Error::CdEntryTruncated {
                offset,
                reason: format!("record {i} of {entry_count} overruns the mapped directory"),
            });
        }
        let signature = format::le_u32(&cd[pos..]);
        if signature != CENTRAL_HEADER_SIGNATURE {
            return Err(Error::CdEntryTruncated {
                offset,
                reason: format!("bad record signature {signature:#010x}"),
            });
        }

        let record = format::CentralRecord::parse(&cd[pos..]);
        let total = record.total_len();
        if cd.len() - pos < total {
            return Err(Error::CdEntryTruncated {
                offset,
                reason: format!(
                    "variable-length fields overrun the mapped directory \
                     (name {}, extra {}, comment {})",
                    record.name_len, record.extra_len, record.comment_len
                ),
            });
        }

        // One entry with the flag set makes the whole archive UTF-8 named;
        // the decision is archive-wide.
        utf8_names |= record.flags & FLAG_UTF8_NAMES != 0;

        let name_off = (pos + CENTRAL_HEADER_FIXED_SIZE) as u32;
        index.insert(cd, name_off, record.name_len, pos as u32);
        pos += total;
    }

    if pos != cd.len() {
        return Err(Error::CdEntryTruncated {
            offset: base + pos as u64,
            reason: format!(
                "{} bytes of trailing data after the last of {entry_count} records",
                cd.len() - pos
            ),
        });
    }

    Ok((index, utf8_names))
}
