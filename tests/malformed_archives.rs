//! Tests for malformed and corrupted archive handling.
//!
//! Opening is all-or-nothing: any inconsistency in the end record or any
//! malformed central directory record fails the whole open, and no archive
//! value (or mapping) survives the failure.

mod common;

use common::{
    ZipBuilder, declared_cd_offset, eocd_offset, expect_err, patch_u16, patch_u32, write_temp,
};
use zipdex::{Error, ZipArchive};

fn open_raw(bytes: &[u8]) -> zipdex::Result<ZipArchive> {
    let file = write_temp(bytes);
    ZipArchive::open_path(file.path())
}

#[test]
fn test_empty_file_is_invalid() {
    let err = expect_err(open_raw(b""));
    assert!(
        matches!(err, Error::InvalidFile { ref reason, .. } if reason.contains("empty")),
        "unexpected error: {err:?}"
    );
    assert!(err.is_open_failure());
}

#[test]
fn test_garbage_has_no_eocd() {
    let err = expect_err(open_raw(&[0xAA; 4096]));
    assert!(matches!(err, Error::EocdNotFound { .. }), "got: {err:?}");
}

#[test]
fn test_file_shorter_than_eocd_record() {
    // Valid signature bytes but the file cannot hold the fixed record.
    let err = expect_err(open_raw(&[0x50, 0x4b, 0x05, 0x06, 0x00]));
    assert!(matches!(err, Error::EocdNotFound { .. }), "got: {err:?}");
}

#[test]
fn test_cd_range_overflowing_file_fails_without_partial_state() {
    let mut bytes = ZipBuilder::new().stored("a.txt", b"alpha").build();
    let eocd = eocd_offset(&bytes);
    // Declared directory larger than the whole file: recovery would need
    // a negative offset, so the open must fail.
    let declared = bytes.len() as u32 + 1000;
    patch_u32(&mut bytes, eocd + 12, declared);

    let err = expect_err(open_raw(&bytes));
    assert!(matches!(err, Error::CdNotFound { .. }), "got: {err:?}");
}

#[test]
fn test_truncated_last_record_comment_length() {
    let mut bytes = ZipBuilder::new()
        .stored("a.txt", b"alpha")
        .stored("b.txt", b"beta")
        .build();
    // Bump the last record's comment length by one byte; the record now
    // overruns the mapped directory.
    let cd = declared_cd_offset(&bytes);
    let second_record = cd + 46 + "a.txt".len();
    patch_u16(&mut bytes, second_record + 32, 1);

    let err = expect_err(open_raw(&bytes));
    match err {
        Error::CdEntryTruncated { offset, ref reason } => {
            assert_eq!(offset, second_record as u64);
            assert!(reason.contains("overrun"), "reason: {reason}");
        }
        other => panic!("expected CdEntryTruncated, got {other:?}"),
    }
}

#[test]
fn test_bad_record_signature() {
    let mut bytes = ZipBuilder::new().stored("a.txt", b"alpha").build();
    let cd = declared_cd_offset(&bytes);
    bytes[cd] ^= 0xFF;

    let err = expect_err(open_raw(&bytes));
    assert!(
        matches!(err, Error::CdEntryTruncated { ref reason, .. } if reason.contains("signature")),
        "got: {err:?}"
    );
}

#[test]
fn test_declared_count_larger_than_directory() {
    let mut bytes = ZipBuilder::new().stored("a.txt", b"alpha").build();
    let eocd = eocd_offset(&bytes);
    patch_u16(&mut bytes, eocd + 8, 3);
    patch_u16(&mut bytes, eocd + 10, 3);

    let err = expect_err(open_raw(&bytes));
    assert!(
        matches!(err, Error::CdEntryTruncated { ref reason, .. } if reason.contains("record 1")),
        "got: {err:?}"
    );
}

#[test]
fn test_declared_count_smaller_than_directory() {
    let mut bytes = ZipBuilder::new()
        .stored("a.txt", b"alpha")
        .stored("b.txt", b"beta")
        .build();
    let eocd = eocd_offset(&bytes);
    patch_u16(&mut bytes, eocd + 8, 1);
    patch_u16(&mut bytes, eocd + 10, 1);

    // The walk stops after one record with directory bytes left over; a
    // truncated count desynchronizes parsing just like a truncated record.
    let err = expect_err(open_raw(&bytes));
    assert!(
        matches!(err, Error::CdEntryTruncated { ref reason, .. } if reason.contains("trailing")),
        "got: {err:?}"
    );
}

#[test]
fn test_multi_disk_archives_rejected() {
    let mut bytes = ZipBuilder::new().stored("a.txt", b"alpha").build();
    let eocd = eocd_offset(&bytes);
    patch_u16(&mut bytes, eocd + 4, 1); // disk number

    let err = expect_err(open_raw(&bytes));
    assert!(
        matches!(err, Error::InvalidFile { ref reason, .. } if reason.contains("multi-disk")),
        "got: {err:?}"
    );
}

#[test]
fn test_prepended_data_recovered_by_offset_heuristic() {
    // A self-extracting stub prepends bytes without fixing up the declared
    // central directory offset; the opener recomputes it from the end
    // record's position.
    let zip = ZipBuilder::new()
        .stored("a.txt", b"alpha")
        .stored("dir/b.txt", b"beta")
        .build();
    let mut bytes = vec![0xEB; 512]; // stub bytes
    bytes.extend_from_slice(&zip);

    let file = write_temp(&bytes);
    let archive =
        ZipArchive::open_path(file.path()).expect("recovery heuristic should accept the archive");
    assert_eq!(archive.len(), 2);
    assert!(archive.find_entry(b"a.txt").is_some());
    assert!(archive.find_entry(b"dir/b.txt").is_some());
}

#[test]
fn test_handle_stays_usable_after_failed_extraction() {
    let bytes = ZipBuilder::new()
        .stored("good.txt", b"good data")
        .raw_entry(b"weird.bin", b"??", 99, 0, 0xDEAD, 2)
        .build();
    let file = write_temp(&bytes);
    let archive = ZipArchive::open_path(file.path()).unwrap();

    let weird = archive.find_entry(b"weird.bin").unwrap();
    let err = expect_err(archive.read_entry_to_vec(&weird));
    assert!(matches!(err, Error::UnsupportedMethod { method: 99, .. }));

    // The failure was per-entry; the archive still answers queries.
    let good = archive.find_entry(b"good.txt").unwrap();
    assert_eq!(archive.read_entry_to_vec(&good).unwrap(), b"good data");
}

#[test]
fn test_open_failure_reports_archive_name() {
    let err = expect_err(open_raw(&[0xAA; 64]));
    let name = err.archive_name().expect("open errors carry the path");
    assert!(!name.is_empty());
}
