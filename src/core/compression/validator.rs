use std::fs::File;
use std::path::Path;

use zip::ZipArchive;

/// Cheap structural pre-check used before attempting a real unpack.
///
/// Returns true iff the file opens as a zip container with a readable
/// central directory, zero entries included. All failure modes (missing
/// file, permission error, garbage bytes, truncated header) collapse to
/// `false`; this never panics.
///
/// Defense in depth only: a file can pass this check and still fail
/// mid-stream during extraction, which is an I/O failure of the job, not a
/// validator bug.
pub fn is_valid_archive(path: &Path) -> bool {
    match File::open(path) {
        Ok(file) => ZipArchive::new(file).is_ok(),
        Err(_) => false,
    }
}
