//! On-disk Zip record layouts.
//!
//! Fixed-offset little-endian decoding for the three record types this
//! reader touches: the end-of-central-directory record, central directory
//! file headers, and local file headers. Fields are decoded on demand from
//! raw bytes; nothing here owns or copies archive data.

/// End-of-central-directory signature, `PK\x05\x06`.
pub(crate) const EOCD_SIGNATURE: u32 = 0x0605_4b50;

/// Central directory file header signature, `PK\x01\x02`.
pub(crate) const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;

/// Local file header signature, `PK\x03\x04`.
pub(crate) const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;

/// Size of the fixed portion of the end-of-central-directory record.
pub(crate) const EOCD_FIXED_SIZE: usize = 22;

/// Maximum length of the trailing archive comment.
pub(crate) const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// Size of the fixed portion of a central directory file header.
pub(crate) const CENTRAL_HEADER_FIXED_SIZE: usize = 46;

/// Size of the fixed portion of a local file header.
pub(crate) const LOCAL_HEADER_FIXED_SIZE: usize = 30;

/// General-purpose flag bit: entry name and comment are UTF-8.
pub(crate) const FLAG_UTF8_NAMES: u16 = 0x0800;

#[inline]
pub(crate) fn le_u16(data: &[u8]) -> u16 {
    u16::from_le_bytes([data[0], data[1]])
}

#[inline]
pub(crate) fn le_u32(data: &[u8]) -> u32 {
    u32::from_le_bytes([data[0], data[1], data[2], data[3]])
}

/// The fixed fields of the end-of-central-directory record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EocdRecord {
    pub disk_number: u16,
    pub cd_start_disk: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EocdRecord {
    /// Decodes the record starting at `data[0]`, which must hold the
    /// signature. Returns `None` on a short slice or signature mismatch.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < EOCD_FIXED_SIZE || le_u32(&data[0..4]) != EOCD_SIGNATURE {
            return None;
        }
        Some(Self {
            disk_number: le_u16(&data[4..6]),
            cd_start_disk: le_u16(&data[6..8]),
            disk_entries: le_u16(&data[8..10]),
            total_entries: le_u16(&data[10..12]),
            cd_size: le_u32(&data[12..16]),
            cd_offset: le_u32(&data[16..20]),
            comment_len: le_u16(&data[20..22]),
        })
    }

    /// Returns `true` if the archive claims to span multiple disks.
    pub fn is_multi_disk(&self) -> bool {
        self.disk_number != 0 || self.cd_start_disk != 0 || self.disk_entries != self.total_entries
    }
}

/// Finds the end-of-central-directory signature in `tail`, which holds the
/// last bytes of the file.
///
/// The record sits a variable distance from EOF because of the optional
/// trailing comment, so the scan runs backward and returns the offset of
/// the match closest to EOF that still leaves room for the fixed record.
pub(crate) fn find_eocd(tail: &[u8]) -> Option<usize> {
    if tail.len() < EOCD_FIXED_SIZE {
        return None;
    }
    let signature = EOCD_SIGNATURE.to_le_bytes();
    // A match in the last 18 bytes could not fit the fixed record.
    let search = &tail[..tail.len() - (EOCD_FIXED_SIZE - signature.len())];
    search
        .windows(signature.len())
        .rposition(|window| window == signature)
}

/// The fixed fields of a central directory file header.
///
/// Decoded fresh from the mapping whenever an entry is looked up; the
/// index stores only name views and record offsets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CentralRecord {
    pub flags: u16,
    pub method: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub name_len: u16,
    pub extra_len: u16,
    pub comment_len: u16,
    pub local_header_offset: u32,
}

impl CentralRecord {
    /// Decodes the fixed fields. The caller must have verified that `data`
    /// holds at least [`CENTRAL_HEADER_FIXED_SIZE`] bytes starting at the
    /// record signature.
    pub fn parse(data: &[u8]) -> Self {
        debug_assert!(data.len() >= CENTRAL_HEADER_FIXED_SIZE);
        debug_assert_eq!(le_u32(&data[0..4]), CENTRAL_HEADER_SIGNATURE);
        Self {
            flags: le_u16(&data[8..10]),
            method: le_u16(&data[10..12]),
            mod_time: le_u16(&data[12..14]),
            mod_date: le_u16(&data[14..16]),
            crc32: le_u32(&data[16..20]),
            compressed_size: le_u32(&data[20..24]),
            uncompressed_size: le_u32(&data[24..28]),
            name_len: le_u16(&data[28..30]),
            extra_len: le_u16(&data[30..32]),
            comment_len: le_u16(&data[32..34]),
            local_header_offset: le_u32(&data[42..46]),
        }
    }

    /// Total record length: fixed header plus the three variable fields.
    pub fn total_len(&self) -> usize {
        CENTRAL_HEADER_FIXED_SIZE
            + self.name_len as usize
            + self.extra_len as usize
            + self.comment_len as usize
    }
}

/// The local file header fields extraction needs.
///
/// The name and extra lengths here decide where the entry's data starts;
/// they may legitimately differ from the central directory's values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalRecord {
    pub name_len: u16,
    pub extra_len: u16,
}

impl LocalRecord {
    /// Decodes the header starting at `data[0]`. Returns `None` on a short
    /// slice or signature mismatch.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < LOCAL_HEADER_FIXED_SIZE || le_u32(&data[0..4]) != LOCAL_HEADER_SIGNATURE {
            return None;
        }
        Some(Self {
            name_len: le_u16(&data[26..28]),
            extra_len: le_u16(&data[28..30]),
        })
    }
}
