//! Temporary input files for tests that read from disk.

use std::io::Write;
use tempfile::NamedTempFile;

/// Write `contents` to a fresh temporary file with the given suffix.
///
/// The file is removed when the returned handle is dropped.
pub fn write_temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp file");
    file
}
