use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Capture pipeline errors, one variant per stage.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("sensor attribute '{name}' write failed ({})", .path.display())]
    SensorAttribute {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("GPIO enable failed for line {line} ({})", .path.display())]
    Gpio {
        line: u32,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("device open failed: {}", .path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("device read failed after {filled} of {expected} bytes")]
    Read {
        filled: usize,
        expected: usize,
        #[source]
        source: io::Error,
    },

    #[error("short read: device closed after {filled} of {expected} bytes")]
    ShortRead { filled: usize, expected: usize },

    #[error("{len} bytes cannot form a {rows}x{cols} frame of 16-bit samples (expected {expected})")]
    ShapeMismatch {
        len: usize,
        rows: usize,
        cols: usize,
        expected: usize,
    },

    #[error("write failed: {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("PNG encoding failed")]
    Encode(#[source] image::ImageError),
}

impl CaptureError {
    /// Short name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::SensorAttribute { .. } => "sensor",
            Self::Gpio { .. } => "gpio",
            Self::DeviceOpen { .. } => "open",
            Self::Read { .. } | Self::ShortRead { .. } => "read",
            Self::ShapeMismatch { .. } => "reshape",
            Self::Write { .. } => "write",
            Self::Encode(_) => "encode",
        }
    }

    /// True for both hard read failures and early end-of-file.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::ShortRead { .. })
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Gpio { .. } | Self::SensorAttribute { .. } => 2,
            Self::DeviceOpen { .. } => 3,
            Self::Read { .. } | Self::ShortRead { .. } => 4,
            Self::ShapeMismatch { .. } => 5,
            Self::Write { .. } => 6,
            Self::Encode(_) => 7,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CaptureError>;
