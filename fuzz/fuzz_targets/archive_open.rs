//! Fuzz target for ZipArchive::open_path with arbitrary byte input.
//!
//! This target exercises the end-of-central-directory locator, the offset
//! recovery heuristic, and the directory walk with adversarial input. The
//! goal is to find panics, hangs, or out-of-bounds slicing in the parsing
//! logic; errors are the expected outcome.
//!
//! Run with: cargo +nightly fuzz run archive_open

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // The opener maps the file, so the bytes have to hit disk first.
    let mut file = match tempfile::NamedTempFile::new() {
        Ok(file) => file,
        Err(_) => return,
    };
    if file.write_all(data).and_then(|_| file.flush()).is_err() {
        return;
    }

    // We don't care about the result - we're looking for panics or hangs.
    if let Ok(archive) = zipdex::ZipArchive::open_path(file.path()) {
        // If we got an archive, exercise lookup, iteration, and the lazy
        // field decoding.
        for entry in archive.entries() {
            let _ = entry.name.decode();
            let _ = entry.modified.to_unix_time();
            let _ = entry.is_dir();
            let _ = archive.find_entry(entry.name.as_bytes());
            // Extraction on garbage should error, never panic.
            let _ = archive.read_entry_to_vec(&entry);
        }
        let _ = archive.comment();
    }
});
