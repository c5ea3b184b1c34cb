//! Shared test utilities for integration tests.
//!
//! zipdex is a read-only library, so tests build archives by hand at the
//! byte level. `ZipBuilder` writes local headers, file data, central
//! directory records, and the end-of-central-directory record exactly as
//! the format specifies; malformed-archive tests then patch the bytes.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test
//! file compiles as a separate crate and may only use a subset of these
//! helpers.

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;
use zipdex::ZipArchive;

/// DOS date for 2018-11-17, used by every generated entry.
pub const DOS_DATE: u16 = 0x4D71;

/// DOS time for 10:38:30.
pub const DOS_TIME: u16 = 0x54CF;

const LOCAL_SIGNATURE: u32 = 0x0403_4b50;
const CENTRAL_SIGNATURE: u32 = 0x0201_4b50;
const EOCD_SIGNATURE: u32 = 0x0605_4b50;

/// Builds raw Zip archives in memory.
#[derive(Default)]
pub struct ZipBuilder {
    local: Vec<u8>,
    central: Vec<u8>,
    count: u16,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stored (method 0) entry.
    pub fn stored(&mut self, name: &str, data: &[u8]) -> &mut Self {
        let crc = crc32(data);
        self.raw_entry(name.as_bytes(), data, 0, 0, crc, data.len() as u32)
    }

    /// Adds a stored entry with a raw byte name (for legacy encodings).
    pub fn stored_bytes(&mut self, name: &[u8], data: &[u8]) -> &mut Self {
        let crc = crc32(data);
        self.raw_entry(name, data, 0, 0, crc, data.len() as u32)
    }

    /// Adds a deflated (method 8) entry.
    pub fn deflated(&mut self, name: &str, data: &[u8]) -> &mut Self {
        let crc = crc32(data);
        let compressed = deflate(data);
        self.raw_entry(name.as_bytes(), &compressed, 8, 0, crc, data.len() as u32)
    }

    /// Adds a directory entry (stored, empty, trailing slash expected in
    /// `name`).
    pub fn directory(&mut self, name: &str) -> &mut Self {
        self.raw_entry(name.as_bytes(), b"", 0, 0, 0, 0)
    }

    /// Adds an entry with every knob exposed: raw name bytes, raw on-disk
    /// data, method, general-purpose flags, and the CRC/uncompressed size
    /// to record in the headers.
    pub fn raw_entry(
        &mut self,
        name: &[u8],
        raw_data: &[u8],
        method: u16,
        flags: u16,
        crc: u32,
        uncompressed_size: u32,
    ) -> &mut Self {
        let local_offset = self.local.len() as u32;

        // Local file header.
        self.local.extend_from_slice(&LOCAL_SIGNATURE.to_le_bytes());
        push_u16(&mut self.local, 20); // version needed
        push_u16(&mut self.local, flags);
        push_u16(&mut self.local, method);
        push_u16(&mut self.local, DOS_TIME);
        push_u16(&mut self.local, DOS_DATE);
        push_u32(&mut self.local, crc);
        push_u32(&mut self.local, raw_data.len() as u32);
        push_u32(&mut self.local, uncompressed_size);
        push_u16(&mut self.local, name.len() as u16);
        push_u16(&mut self.local, 0); // extra len
        self.local.extend_from_slice(name);
        self.local.extend_from_slice(raw_data);

        // Central directory record.
        self.central
            .extend_from_slice(&CENTRAL_SIGNATURE.to_le_bytes());
        push_u16(&mut self.central, 20); // version made by
        push_u16(&mut self.central, 20); // version needed
        push_u16(&mut self.central, flags);
        push_u16(&mut self.central, method);
        push_u16(&mut self.central, DOS_TIME);
        push_u16(&mut self.central, DOS_DATE);
        push_u32(&mut self.central, crc);
        push_u32(&mut self.central, raw_data.len() as u32);
        push_u32(&mut self.central, uncompressed_size);
        push_u16(&mut self.central, name.len() as u16);
        push_u16(&mut self.central, 0); // extra len
        push_u16(&mut self.central, 0); // comment len
        push_u16(&mut self.central, 0); // disk number start
        push_u16(&mut self.central, 0); // internal attrs
        push_u32(&mut self.central, 0); // external attrs
        push_u32(&mut self.central, local_offset);
        self.central.extend_from_slice(name);

        self.count += 1;
        self
    }

    /// Sets the trailing archive comment.
    pub fn comment(&mut self, comment: &[u8]) -> &mut Self {
        self.comment = comment.to_vec();
        self
    }

    /// Assembles the archive bytes.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.local.clone();
        let cd_offset = out.len() as u32;
        out.extend_from_slice(&self.central);

        out.extend_from_slice(&EOCD_SIGNATURE.to_le_bytes());
        push_u16(&mut out, 0); // disk number
        push_u16(&mut out, 0); // cd start disk
        push_u16(&mut out, self.count);
        push_u16(&mut out, self.count);
        push_u32(&mut out, self.central.len() as u32);
        push_u32(&mut out, cd_offset);
        push_u16(&mut out, self.comment.len() as u16);
        out.extend_from_slice(&self.comment);
        out
    }
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Compresses `data` as a raw DEFLATE stream, as zip stores it.
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// IEEE CRC-32, the checksum zip records.
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Writes archive bytes to a temp file. Keep the returned handle alive
/// while the archive is open.
pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write archive bytes");
    file.flush().expect("flush archive bytes");
    file
}

/// Writes archive bytes to a temp file and opens them, panicking on
/// failure. Returns the temp handle alongside the archive.
pub fn open_bytes(bytes: &[u8]) -> (NamedTempFile, ZipArchive) {
    let file = write_temp(bytes);
    let archive = ZipArchive::open_path(file.path())
        .unwrap_or_else(|e| panic!("failed to open generated archive: {e}"));
    (file, archive)
}

/// File offset of the end-of-central-directory record (closest to EOF).
pub fn eocd_offset(bytes: &[u8]) -> usize {
    let signature = EOCD_SIGNATURE.to_le_bytes();
    bytes
        .windows(4)
        .rposition(|w| w == signature)
        .expect("archive has an EOCD record")
}

/// Central directory offset as declared by the EOCD record.
pub fn declared_cd_offset(bytes: &[u8]) -> usize {
    let eocd = eocd_offset(bytes);
    u32::from_le_bytes(bytes[eocd + 16..eocd + 20].try_into().unwrap()) as usize
}

pub fn patch_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub fn patch_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Extracts the error from a Result, panicking if it's Ok.
pub fn expect_err<T, E>(result: Result<T, E>) -> E {
    match result {
        Ok(_) => panic!("Expected error but got Ok"),
        Err(e) => e,
    }
}
