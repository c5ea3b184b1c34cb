//! Entry snapshots, name views, and lookup.

use std::borrow::Cow;

use crate::format::{self, CENTRAL_HEADER_FIXED_SIZE};
use crate::timestamp::DosDateTime;

use super::ZipArchive;

/// Raw method id for entries stored without compression.
pub(crate) const METHOD_STORED: u16 = 0;

/// Raw method id for deflated entries.
pub(crate) const METHOD_DEFLATED: u16 = 8;

/// How an entry's data is transformed on disk.
///
/// This reader extracts stored and deflated entries; every other method id
/// is carried through lookup and iteration but refused at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Method 0: data is stored verbatim.
    Stored,
    /// Method 8: data is a raw DEFLATE stream.
    Deflated,
    /// Any other method id; extraction reports
    /// [`Error::UnsupportedMethod`](crate::Error::UnsupportedMethod).
    Unsupported(u16),
}

impl CompressionMethod {
    /// Maps a raw central directory method id.
    pub fn from_raw(method: u16) -> Self {
        match method {
            METHOD_STORED => Self::Stored,
            METHOD_DEFLATED => Self::Deflated,
            other => Self::Unsupported(other),
        }
    }

    /// The raw method id as stored on disk.
    pub fn as_raw(&self) -> u16 {
        match self {
            Self::Stored => METHOD_STORED,
            Self::Deflated => METHOD_DEFLATED,
            Self::Unsupported(other) => *other,
        }
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stored => write!(f, "stored"),
            Self::Deflated => write!(f, "deflated"),
            Self::Unsupported(other) => write!(f, "unsupported({other})"),
        }
    }
}

/// A borrowed view of an entry's raw name bytes.
///
/// Names live in the memory-mapped central directory; this view borrows
/// them for the archive's lifetime without copying. Names are not
/// terminated, not validated, and not assumed ASCII; the bytes mean
/// whatever the archive-wide encoding says they mean.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EntryName<'a> {
    bytes: &'a [u8],
    utf8: bool,
}

impl<'a> EntryName<'a> {
    pub(crate) fn new(bytes: &'a [u8], utf8: bool) -> Self {
        Self { bytes, utf8 }
    }

    /// The raw name bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Name length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for the (malformed but representable) empty name.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the name using the archive-wide encoding: UTF-8 when any
    /// entry in the archive set the 0x0800 flag, the legacy CP437 code
    /// page otherwise.
    ///
    /// Invalid UTF-8 sequences decode lossily; CP437 always decodes.
    pub fn decode(&self) -> Cow<'a, str> {
        if self.utf8 {
            String::from_utf8_lossy(self.bytes)
        } else {
            decode_cp437(self.bytes)
        }
    }
}

impl std::fmt::Debug for EntryName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EntryName({:?})", self.decode())
    }
}

/// A snapshot of one archive entry.
///
/// Produced by [`ZipArchive::find_entry`] and iteration. Fields are
/// decoded fresh from the mapped directory record each time; nothing is
/// cached between lookups, so repeated lookups of one name yield equal
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZipEntry<'a> {
    /// The entry's name, borrowed from the mapped directory.
    pub name: EntryName<'a>,
    /// How the entry data is transformed on disk.
    pub method: CompressionMethod,
    /// CRC-32 of the uncompressed data, as recorded in the directory.
    pub crc32: u32,
    /// Size of the on-disk (possibly compressed) data.
    pub compressed_size: u64,
    /// Size of the data after decompression.
    pub uncompressed_size: u64,
    /// File offset of the entry's local header.
    pub local_header_offset: u64,
    /// Modification time in DOS format.
    pub modified: DosDateTime,
    /// File offset of this entry's central directory record.
    pub(crate) record_offset: u64,
}

impl ZipEntry<'_> {
    /// Returns `true` if the entry is a directory (name ends with `/`).
    pub fn is_dir(&self) -> bool {
        self.name.as_bytes().last() == Some(&b'/')
    }

    /// File offset of this entry's central directory record.
    ///
    /// Distinguishes records that share a name: lookup always resolves to
    /// the first occurrence, iteration reports every one.
    pub fn record_offset(&self) -> u64 {
        self.record_offset
    }
}

impl ZipArchive {
    /// Finds an entry by its raw name bytes.
    ///
    /// A miss is an ordinary result, not an error. When the archive holds
    /// several entries with the same name, the first one in central
    /// directory order is returned; iteration still visits them all.
    ///
    /// Safe to call from any number of threads concurrently; nothing is
    /// mutated.
    pub fn find_entry(&self, name: &[u8]) -> Option<ZipEntry<'_>> {
        let record_off = self.index.lookup(self.cd(), name)?;
        Some(decode_entry(self, record_off as usize))
    }
}

/// Decodes the entry snapshot at `record_off` within the mapped directory.
///
/// The open-time walk validated every record, so the bounds and signature
/// here are known good.
pub(crate) fn decode_entry(archive: &ZipArchive, record_off: usize) -> ZipEntry<'_> {
    let cd = archive.cd();
    let record = format::CentralRecord::parse(&cd[record_off..]);
    let name_start = record_off + CENTRAL_HEADER_FIXED_SIZE;
    let name = &cd[name_start..name_start + record.name_len as usize];

    ZipEntry {
        name: EntryName::new(name, archive.utf8_names),
        method: CompressionMethod::from_raw(record.method),
        crc32: record.crc32,
        compressed_size: record.compressed_size as u64,
        uncompressed_size: record.uncompressed_size as u64,
        local_header_offset: record.local_header_offset as u64,
        modified: DosDateTime::from_parts(record.mod_date, record.mod_time),
        record_offset: archive.cd_offset + record_off as u64,
    }
}

/// CP437 high half (0x80..=0xFF). The low half is ASCII-identical.
const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', //
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', //
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', //
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

/// Decodes legacy CP437 name bytes. Pure ASCII borrows; anything else
/// allocates.
fn decode_cp437(bytes: &[u8]) -> Cow<'_, str> {
    if bytes.is_ascii() {
        // ASCII is valid UTF-8 by construction.
        match std::str::from_utf8(bytes) {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => Cow::Owned(String::new()),
        }
    } else {
        Cow::Owned(
            bytes
                .iter()
                .map(|&b| {
                    if b < 0x80 {
                        b as char
                    } else {
                        CP437_HIGH[(b - 0x80) as usize]
                    }
                })
                .collect(),
        )
    }
}
