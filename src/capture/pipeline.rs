use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::capture::encode::encode_png;
use crate::capture::error::{CaptureError, Result};
use crate::capture::frame::{Frame, FrameBuffer};
use crate::capture::output::write_output;
use crate::capture::read::read_full;
use crate::device::backend::{FrameSource, SensorControl};
use crate::device::chardev::CharDevice;
use crate::device::dummy::DummyDevice;
use crate::device::sysfs::SysfsControl;
use crate::settings::types::CaptureConfig;

/// Summary of a completed capture.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureReport {
    pub cols: usize,
    pub rows: usize,
    pub bytes_read: usize,
    pub read_calls: usize,
    pub raw_path: PathBuf,
    pub png_path: PathBuf,
    pub png_bytes: usize,
    pub enable_ms: f64,
    pub read_ms: f64,
    pub raw_write_ms: f64,
    pub encode_ms: f64,
    pub png_write_ms: f64,
}

impl CaptureReport {
    /// Total wall time across all stages in milliseconds.
    pub fn total_ms(&self) -> f64 {
        self.enable_ms + self.read_ms + self.raw_write_ms + self.encode_ms + self.png_write_ms
    }
}

/// One-shot frame capture: enable, configure, read, write raw, flip, encode, write PNG.
pub struct FrameCapture {
    sensor: Box<dyn SensorControl>,
    source: Box<dyn FrameSource>,
}

impl FrameCapture {
    pub fn new(sensor: Box<dyn SensorControl>, source: Box<dyn FrameSource>) -> Self {
        Self { sensor, source }
    }

    /// Sysfs sensor control and the real character device.
    pub fn hardware(config: &CaptureConfig) -> Self {
        Self::new(
            Box::new(SysfsControl::new(
                &config.gpio_root,
                &config.sensor.sysfs_dir,
            )),
            Box::new(CharDevice),
        )
    }

    /// Simulated sensor and device producing a test pattern.
    pub fn dummy(config: &CaptureConfig) -> Self {
        let device = Arc::new(DummyDevice::new(
            config.cols,
            config.rows,
            config.sample_order,
        ));
        Self::new(Box::new(Arc::clone(&device)), Box::new(device))
    }

    /// Run one capture.
    ///
    /// Every stage failure is terminal, with one exception: a failed raw
    /// write is reported only after the PNG has been attempted, since the
    /// two outputs are independent.
    pub fn capture(&self, config: &CaptureConfig) -> Result<CaptureReport> {
        let (cols, rows) = (config.cols, config.rows);
        let expected = config
            .frame_len()
            .ok_or(CaptureError::ShapeMismatch {
                len: 0,
                rows,
                cols,
                expected: usize::MAX,
            })?;

        let started = Instant::now();
        self.prepare_sensor(config)?;
        let enable_time = started.elapsed();

        let started = Instant::now();
        let mut buffer = FrameBuffer::zeroed(expected);
        let stats = {
            let mut device = self.source.open(&config.device_path)?;
            read_full(device.as_mut(), buffer.as_mut_bytes())?
        };
        let read_time = started.elapsed();
        tracing::debug!(
            "read {} bytes in {} call(s) from {}",
            stats.bytes,
            stats.calls,
            config.device_path.display()
        );

        let started = Instant::now();
        let raw_result = write_output(&config.raw_out_path, buffer.as_bytes());
        if let Err(e) = &raw_result {
            tracing::warn!("{e}; continuing with PNG output");
        }
        let raw_write_time = started.elapsed();

        let started = Instant::now();
        let frame = Frame::from_buffer(&buffer, cols, rows, config.sample_order)?
            .flipped_vertical();
        drop(buffer);
        let png = encode_png(&frame, config.png_compression)?;
        let encode_time = started.elapsed();

        let started = Instant::now();
        write_output(&config.png_out_path, &png)?;
        let png_write_time = started.elapsed();

        raw_result?;

        Ok(CaptureReport {
            cols,
            rows,
            bytes_read: stats.bytes,
            read_calls: stats.calls,
            raw_path: config.raw_out_path.clone(),
            png_path: config.png_out_path.clone(),
            png_bytes: png.len(),
            enable_ms: millis(enable_time),
            read_ms: millis(read_time),
            raw_write_ms: millis(raw_write_time),
            encode_ms: millis(encode_time),
            png_write_ms: millis(png_write_time),
        })
    }

    /// Enable line, then attribute writes (`context` first).
    ///
    /// The driver programs attributes over I2C, so the sensor must be
    /// powered before any of them is written.
    fn prepare_sensor(&self, config: &CaptureConfig) -> Result<()> {
        if config.skip_gpio {
            tracing::debug!("leaving GPIO {} untouched", config.gpio_line);
        } else {
            self.sensor.enable(config.gpio_line)?;
        }
        for (attribute, value) in &config.sensor.attributes {
            self.sensor.write_attribute(*attribute, *value)?;
        }
        Ok(())
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
