use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;

use crate::capture::error::{CaptureError, Result};
use crate::device::backend::FrameSource;

/// Default camera character device.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/prucam";

/// The prucam character device.
///
/// Opened read-write, as the driver expects; each `read` blocks until the
/// PRU has frame data.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharDevice;

impl FrameSource for CharDevice {
    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| CaptureError::DeviceOpen {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!("opened {}", path.display());
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn open_reads_from_node() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prucam");
        fs::write(&path, [5u8, 6, 7]).unwrap();

        let mut handle = CharDevice.open(&path).unwrap();
        let mut out = Vec::new();
        handle.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![5, 6, 7]);
    }

    #[test]
    fn open_missing_node_is_device_open_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prucam");
        match CharDevice.open(&path) {
            Err(CaptureError::DeviceOpen { path: failed, source }) => {
                assert_eq!(failed, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("missing device opened"),
        }
    }
}
