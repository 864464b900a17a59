use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::capture::error::Result;
use crate::device::sensor::SensorAttribute;

/// Control surface of the image sensor (sysfs on the target board).
pub trait SensorControl {
    /// Write one driver attribute before the sensor is enabled.
    fn write_attribute(&self, attribute: SensorAttribute, value: u32) -> Result<()>;

    /// Drive the sensor enable line high.
    fn enable(&self, line: u32) -> Result<()>;
}

/// Source of raw frame bytes (the camera character device on the target board).
pub trait FrameSource {
    /// Open the device. The returned handle is closed when dropped.
    fn open(&self, path: &Path) -> Result<Box<dyn Read>>;
}

impl<T: SensorControl + ?Sized> SensorControl for Arc<T> {
    fn write_attribute(&self, attribute: SensorAttribute, value: u32) -> Result<()> {
        (**self).write_attribute(attribute, value)
    }

    fn enable(&self, line: u32) -> Result<()> {
        (**self).enable(line)
    }
}

impl<T: FrameSource + ?Sized> FrameSource for Arc<T> {
    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        (**self).open(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::error::CaptureError;
    use std::io::{self, Cursor};
    use std::path::PathBuf;

    /// Mock backend for testing the trait contracts.
    struct MockBackend {
        frame: Vec<u8>,
    }

    impl SensorControl for MockBackend {
        fn write_attribute(&self, _attribute: SensorAttribute, _value: u32) -> Result<()> {
            Ok(())
        }

        fn enable(&self, line: u32) -> Result<()> {
            Err(CaptureError::Gpio {
                line,
                path: PathBuf::from("mock"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            })
        }
    }

    impl FrameSource for MockBackend {
        fn open(&self, _path: &Path) -> Result<Box<dyn Read>> {
            Ok(Box::new(Cursor::new(self.frame.clone())))
        }
    }

    #[test]
    fn mock_source_yields_frame_bytes() {
        let backend = MockBackend {
            frame: vec![1, 2, 3],
        };
        let mut handle = backend.open(Path::new("/dev/null")).unwrap();
        let mut out = Vec::new();
        handle.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn mock_enable_reports_line() {
        let backend = MockBackend { frame: vec![] };
        match backend.enable(86).unwrap_err() {
            CaptureError::Gpio { line, .. } => assert_eq!(line, 86),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn traits_are_object_safe() {
        let backend = MockBackend { frame: vec![] };
        let _: &dyn SensorControl = &backend;
        let _: &dyn FrameSource = &backend;
    }
}
