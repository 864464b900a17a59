use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::capture::error::{CaptureError, Result};

/// Write `bytes` to `path` atomically (write `.tmp` then rename).
///
/// On failure the temporary file is removed and `path` is left untouched,
/// so an existing file never ends up half written.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = tmp_path_for(path);
    let result = fs::write(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(source) = result {
        if tmp_path.exists() {
            let _ = fs::remove_file(&tmp_path);
        }
        return Err(write_error(path, source));
    }
    tracing::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_error(path: &Path, source: io::Error) -> CaptureError {
    CaptureError::Write {
        path: path.to_path_buf(),
        source,
    }
}
