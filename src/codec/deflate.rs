//! Deflate decoder for compressed entries.

use std::io::{self, BufRead, Read};

use flate2::bufread::DeflateDecoder as FlateDecoder;

/// Decoder for deflated entries (raw DEFLATE streams, method 8).
///
/// Zip stores raw deflate data without a zlib wrapper, so this wraps
/// flate2's raw decoder. Corrupt streams surface as `InvalidData` I/O
/// errors from [`read`](Read::read).
pub struct DeflateDecoder<R> {
    inner: FlateDecoder<R>,
}

impl<R> std::fmt::Debug for DeflateDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeflateDecoder").finish_non_exhaustive()
    }
}

impl<R: BufRead> DeflateDecoder<R> {
    /// Creates a new deflate decoder over the compressed data source.
    pub fn new(input: R) -> Self {
        Self {
            inner: FlateDecoder::new(input),
        }
    }
}

impl<R: BufRead> Read for DeflateDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
