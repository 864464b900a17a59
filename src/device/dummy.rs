use std::io::{self, Read};
use std::path::Path;

use parking_lot::Mutex;

use crate::capture::error::Result;
use crate::capture::frame::{Frame, SampleOrder};
use crate::device::backend::{FrameSource, SensorControl};
use crate::device::sensor::SensorAttribute;

/// Bytes handed out per `read` call, to exercise the full-read loop.
const DEFAULT_CHUNK: usize = 4096;

/// A fake sensor and camera device for running without the board.
///
/// Records every sensor write in memory and serves a gradient test pattern
/// of the configured size in fixed-size chunks.
///
/// Enable via `DUMMY_CAMERA=1` environment variable.
pub struct DummyDevice {
    frame: Vec<u8>,
    chunk: usize,
    enabled_lines: Mutex<Vec<u32>>,
    attributes: Mutex<Vec<(SensorAttribute, u32)>>,
}

impl DummyDevice {
    /// Create a device serving a `cols x rows` gradient in `order`.
    pub fn new(cols: usize, rows: usize, order: SampleOrder) -> Self {
        Self {
            frame: Frame::test_pattern(cols, rows).to_bytes(order),
            chunk: DEFAULT_CHUNK,
            enabled_lines: Mutex::new(Vec::new()),
            attributes: Mutex::new(Vec::new()),
        }
    }

    /// Whether the dummy device is enabled via environment variable.
    pub fn is_enabled() -> bool {
        std::env::var("DUMMY_CAMERA").is_ok_and(|v| v == "1" || v == "true")
    }

    /// Change how many bytes each `read` returns (at least one).
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }

    /// Bytes a full read of the device yields.
    pub fn frame_bytes(&self) -> &[u8] {
        &self.frame
    }

    /// GPIO lines enabled so far.
    pub fn enabled_lines(&self) -> Vec<u32> {
        self.enabled_lines.lock().clone()
    }

    /// Sensor attributes written so far, in order.
    pub fn attributes(&self) -> Vec<(SensorAttribute, u32)> {
        self.attributes.lock().clone()
    }
}

impl SensorControl for DummyDevice {
    fn write_attribute(&self, attribute: SensorAttribute, value: u32) -> Result<()> {
        self.attributes.lock().push((attribute, value));
        Ok(())
    }

    fn enable(&self, line: u32) -> Result<()> {
        self.enabled_lines.lock().push(line);
        Ok(())
    }
}

impl FrameSource for DummyDevice {
    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        tracing::debug!("dummy device standing in for {}", path.display());
        Ok(Box::new(ChunkedReader {
            data: self.frame.clone(),
            pos: 0,
            chunk: self.chunk,
        }))
    }
}

/// Reader that never returns more than `chunk` bytes per call.
struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(buf.len()).min(self.chunk);
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}
