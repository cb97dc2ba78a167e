//! File I/O around the pipeline.
//!
//! Reads refuse anything that could not be written back byte-for-byte
//! (binary content, invalid UTF-8); writes optionally keep a `.bak` copy of
//! the pristine file.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use memchr::memchr;

use crate::error::HookError;

/// Bytes sniffed for NUL when detecting binary files.
const BINARY_SNIFF_LEN: usize = 8192;

/// Quick binary detection - checks the first 8KB for NULL bytes.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = std::cmp::min(buffer.len(), BINARY_SNIFF_LEN);
    memchr(0, &buffer[..check_len]).is_some()
}

/// Read a shader source with size, binary and encoding checks.
///
/// # Errors
/// `NotFound`, `TooLarge`, `BinaryFile`, `Encoding` or `System`.
pub fn read_shader_source<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, HookError> {
    let path = path.as_ref();

    let metadata =
        fs::metadata(path).map_err(|_| HookError::NotFound(path.display().to_string()))?;
    if metadata.len() > max_bytes {
        return Err(HookError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = fs::File::open(path)?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or_default());
    file.read_to_end(&mut buffer)?;

    if is_binary(&buffer) {
        return Err(HookError::BinaryFile);
    }
    String::from_utf8(buffer).map_err(|_| HookError::Encoding(path.display().to_string()))
}

/// `<file>.<ext>.bak` next to `path`.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Persist a patched file.
///
/// With `backup`, the original text is saved first unless a backup already
/// exists; an earlier backup holds the pristine file and is kept. Returns
/// the backup path when one was written.
///
/// # Errors
/// `System` on any write failure; the patched file is not written if the
/// backup could not be.
pub fn write_patched(
    path: &Path,
    original: &str,
    patched: &str,
    backup: bool,
) -> Result<Option<PathBuf>, HookError> {
    let mut written_backup = None;
    if backup {
        let bak = backup_path(path);
        if !bak.exists() {
            fs::write(&bak, original)?;
            written_backup = Some(bak);
        }
    }
    fs::write(path, patched)?;
    Ok(written_backup)
}
