//! Decompression codecs for archive entries.
//!
//! Zip entries in JAR/APK archives use one of two methods: stored (method
//! 0, no transform) or deflated (method 8). Extraction drives one of the
//! decoders here over the entry's compressed byte range; both are plain
//! [`std::io::Read`] adapters, so the extraction path is a single
//! `io::copy` regardless of method.
//!
//! Any other method id is reported as
//! [`Error::UnsupportedMethod`](crate::Error::UnsupportedMethod) before a
//! decoder is ever constructed.

pub mod copy;
pub mod deflate;

pub use copy::CopyDecoder;
pub use deflate::DeflateDecoder;
