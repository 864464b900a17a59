use image::{ImageBuffer, Luma};
use serde::{Deserialize, Serialize};

use crate::capture::error::{CaptureError, Result};

/// Bytes per pixel; the sensor emits 16-bit samples.
pub const BYTES_PER_SAMPLE: usize = 2;

/// 16-bit grayscale image as handed to the PNG encoder.
pub type GrayImage16 = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Size in bytes of a `cols x rows` frame, or `None` on overflow.
pub fn frame_len(cols: usize, rows: usize) -> Option<usize> {
    cols.checked_mul(rows)?.checked_mul(BYTES_PER_SAMPLE)
}

/// Byte order of the 16-bit samples emitted by the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleOrder {
    /// Host byte order.
    #[default]
    Native,
    Little,
    Big,
}

impl SampleOrder {
    fn decode(self, sample: u16) -> u16 {
        match self {
            Self::Native => sample,
            Self::Little => u16::from_le(sample),
            Self::Big => u16::from_be(sample),
        }
    }

    fn encode(self, sample: u16) -> [u8; 2] {
        match self {
            Self::Native => sample.to_ne_bytes(),
            Self::Little => sample.to_le_bytes(),
            Self::Big => sample.to_be_bytes(),
        }
    }
}

/// Raw bytes of one frame exactly as the device delivered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate a zero-filled buffer ready to be read into.
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len],
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// A `rows x cols` row-major matrix of 16-bit samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cols: usize,
    rows: usize,
    samples: Vec<u16>,
}

impl Frame {
    /// Reinterpret a raw buffer as a frame.
    ///
    /// The buffer length is checked against `cols * rows * 2` before any
    /// sample is decoded.
    pub fn from_buffer(
        buffer: &FrameBuffer,
        cols: usize,
        rows: usize,
        order: SampleOrder,
    ) -> Result<Self> {
        check_len(buffer.len(), cols, rows, BYTES_PER_SAMPLE)?;

        // pod_collect_to_vec copies, so the source alignment does not matter.
        let mut samples: Vec<u16> = bytemuck::pod_collect_to_vec(buffer.as_bytes());
        if order != SampleOrder::Native {
            for sample in &mut samples {
                *sample = order.decode(*sample);
            }
        }

        Ok(Self {
            cols,
            rows,
            samples,
        })
    }

    /// Build a frame from already decoded samples.
    pub fn from_samples(cols: usize, rows: usize, samples: Vec<u16>) -> Result<Self> {
        check_len(samples.len(), cols, rows, 1)?;
        Ok(Self {
            cols,
            rows,
            samples,
        })
    }

    /// Deterministic gradient used by the simulated device.
    pub fn test_pattern(cols: usize, rows: usize) -> Self {
        let samples = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| ((y * cols + x) % 65_536) as u16))
            .collect();
        Self {
            cols,
            rows,
            samples,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Samples of row `index`, or `None` past the last row.
    pub fn row(&self, index: usize) -> Option<&[u16]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        Some(&self.samples[start..start + self.cols])
    }

    /// Rows top to bottom, each as a nested `Vec`.
    pub fn to_rows(&self) -> Vec<Vec<u16>> {
        (0..self.rows)
            .filter_map(|i| self.row(i).map(<[u16]>::to_vec))
            .collect()
    }

    /// Reverse the row order in place: row `i` becomes row `rows - 1 - i`.
    pub fn flip_vertical(&mut self) {
        let cols = self.cols;
        if cols == 0 {
            return;
        }
        for top in 0..self.rows / 2 {
            let bottom = self.rows - 1 - top;
            let (upper, lower) = self.samples.split_at_mut(bottom * cols);
            upper[top * cols..(top + 1) * cols].swap_with_slice(&mut lower[..cols]);
        }
    }

    pub fn flipped_vertical(mut self) -> Self {
        self.flip_vertical();
        self
    }

    /// Serialise the samples back to bytes in the given order.
    pub fn to_bytes(&self, order: SampleOrder) -> Vec<u8> {
        self.samples
            .iter()
            .flat_map(|s| order.encode(*s))
            .collect()
    }

    /// Copy the samples into an image buffer (`cols` wide, `rows` high).
    pub fn to_image(&self) -> Result<GrayImage16> {
        let mismatch = || CaptureError::ShapeMismatch {
            len: self.samples.len() * BYTES_PER_SAMPLE,
            rows: self.rows,
            cols: self.cols,
            expected: self.samples.len() * BYTES_PER_SAMPLE,
        };
        let width = u32::try_from(self.cols).map_err(|_| mismatch())?;
        let height = u32::try_from(self.rows).map_err(|_| mismatch())?;
        ImageBuffer::from_raw(width, height, self.samples.clone()).ok_or_else(mismatch)
    }
}

/// Validate `len` units against `cols * rows * unit`.
fn check_len(len: usize, cols: usize, rows: usize, unit: usize) -> Result<()> {
    let expected = cols.checked_mul(rows).and_then(|n| n.checked_mul(unit));
    match expected {
        Some(expected) if expected == len => Ok(()),
        _ => Err(CaptureError::ShapeMismatch {
            len: len * (BYTES_PER_SAMPLE / unit),
            rows,
            cols,
            expected: frame_len(cols, rows).unwrap_or(usize::MAX),
        }),
    }
}
