//! Entry extraction to writers, buffers, and files.
//!
//! Extraction is the only path that touches file bytes outside the mapped
//! central directory. It validates the entry's local header, streams the
//! compressed range through the matching codec, and verifies the result
//! against the directory CRC-32. Failures abort that one extraction; the
//! archive and every other entry stay usable.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use filetime::FileTime;

use crate::checksum::Crc32Writer;
use crate::codec::{CopyDecoder, DeflateDecoder};
use crate::format::{self, LOCAL_HEADER_FIXED_SIZE};
use crate::{Error, READ_BUFFER_SIZE, Result};

use super::entry::{CompressionMethod, ZipEntry};
use super::ZipArchive;

impl ZipArchive {
    /// Extracts an entry, streaming its decompressed bytes into `sink`.
    ///
    /// Stored entries are copied verbatim; deflated entries are inflated
    /// through the codec. The CRC-32 of the produced bytes is always
    /// checked against the central directory value. Returns the number of
    /// bytes written.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedMethod`] for any method other than stored or
    ///   deflated; extraction is not attempted.
    /// - [`Error::InvalidFile`] when the local header contradicts the
    ///   central directory or the data range overruns the file.
    /// - [`Error::CrcMismatch`] when the produced bytes fail verification.
    /// - [`Error::Io`] for sink failures and corrupt deflate streams.
    pub fn read_entry_to_writer<W: Write>(&self, entry: &ZipEntry<'_>, sink: W) -> Result<u64> {
        // Refuse unknown methods before touching any entry data.
        if let CompressionMethod::Unsupported(method) = entry.method {
            return Err(Error::UnsupportedMethod {
                method,
                entry: entry.name.decode().into_owned(),
            });
        }

        let data_offset = self.locate_entry_data(entry)?;
        let section = SectionReader::new(&self.file, data_offset, entry.compressed_size);
        let mut out = Crc32Writer::new(sink);

        let mut decoder: Box<dyn Read + '_> = if entry.method == CompressionMethod::Deflated {
            Box::new(DeflateDecoder::new(BufReader::with_capacity(
                READ_BUFFER_SIZE,
                section,
            )))
        } else {
            Box::new(CopyDecoder::new(section, entry.compressed_size))
        };
        io::copy(&mut decoder, &mut out)?;

        let actual = out.crc();
        if actual != entry.crc32 {
            return Err(Error::CrcMismatch {
                entry: entry.name.decode().into_owned(),
                expected: entry.crc32,
                actual,
            });
        }
        Ok(out.bytes_written())
    }

    /// Extracts an entry into a fresh `Vec`, sized from the directory's
    /// uncompressed size.
    pub fn read_entry_to_vec(&self, entry: &ZipEntry<'_>) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(entry.uncompressed_size as usize);
        self.read_entry_to_writer(entry, &mut out)?;
        Ok(out)
    }

    /// Extracts an entry to a filesystem path, creating parent directories
    /// as needed and restoring the entry's DOS modification time.
    ///
    /// Directory entries just create the directory. A partially written
    /// file is removed when extraction fails. Failing to restore the
    /// modification time is logged, not fatal.
    pub fn extract_entry_to_path(
        &self,
        entry: &ZipEntry<'_>,
        path: impl AsRef<Path>,
    ) -> Result<u64> {
        let path = path.as_ref();

        if entry.is_dir() {
            std::fs::create_dir_all(path)?;
            return Ok(0);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let written = match self
            .read_entry_to_writer(entry, &mut writer)
            .and_then(|n| writer.flush().map(|_| n).map_err(Error::Io))
        {
            Ok(n) => n,
            Err(e) => {
                drop(writer);
                let _ = std::fs::remove_file(path);
                return Err(e);
            }
        };

        if let Some(secs) = entry.modified.to_unix_time() {
            let mtime = FileTime::from_unix_time(secs, 0);
            if let Err(e) = filetime::set_file_mtime(path, mtime) {
                log::warn!(
                    "failed to restore modification time on '{}': {e}",
                    path.display()
                );
            }
        }
        Ok(written)
    }

    /// Resolves where an entry's data starts by reading its local header.
    ///
    /// The local header's own name and extra lengths decide the data
    /// offset; they legitimately differ from the central directory copies
    /// in some archives.
    fn locate_entry_data(&self, entry: &ZipEntry<'_>) -> Result<u64> {
        let mut header = [0u8; LOCAL_HEADER_FIXED_SIZE];
        read_exact_at(&self.file, &mut header, entry.local_header_offset)?;

        let Some(local) = format::LocalRecord::parse(&header) else {
            return Err(Error::InvalidFile {
                name: self.name.clone(),
                reason: format!(
                    "bad local header at offset {:#x} for entry '{}'",
                    entry.local_header_offset,
                    entry.name.decode()
                ),
            });
        };

        let data_offset = entry.local_header_offset
            + LOCAL_HEADER_FIXED_SIZE as u64
            + local.name_len as u64
            + local.extra_len as u64;
        if data_offset + entry.compressed_size > self.file_size {
            return Err(Error::InvalidFile {
                name: self.name.clone(),
                reason: format!(
                    "data of entry '{}' overruns the file ({} bytes at offset {data_offset:#x})",
                    entry.name.decode(),
                    entry.compressed_size
                ),
            });
        }
        Ok(data_offset)
    }
}

/// A bounded `Read` over a byte range of the archive file.
///
/// Uses positional reads, so it takes `&File` and never moves the shared
/// seek cursor; concurrent extractions do not interfere.
struct SectionReader<'a> {
    file: &'a File,
    offset: u64,
    remaining: u64,
}

impl<'a> SectionReader<'a> {
    fn new(file: &'a File, offset: u64, len: u64) -> Self {
        Self {
            file,
            offset,
            remaining: len,
        }
    }
}

impl Read for SectionReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let limit = (self.remaining.min(buf.len() as u64)) as usize;
        let n = read_at(self.file, &mut buf[..limit], self.offset)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "entry data ends before its declared size",
            ));
        }
        self.offset += n as u64;
        self.remaining -= n as u64;
        Ok(n)
    }
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, offset)
}

#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}

/// Fills `buf` completely from `offset` or fails with `UnexpectedEof`.
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    let mut read = 0;
    while read < buf.len() {
        let n = read_at(file, &mut buf[read..], offset + read as u64)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "failed to fill whole buffer",
            ));
        }
        read += n;
    }
    Ok(())
}
