use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::capture::encode::PngCompression;
use crate::capture::frame::{frame_len, SampleOrder};
use crate::device::chardev::DEFAULT_DEVICE_PATH;
use crate::device::sensor::SensorAttribute;
use crate::device::sysfs::DEFAULT_GPIO_ROOT;
use crate::settings::error::SettingsError;

pub const DEFAULT_COLS: usize = 1280;
pub const DEFAULT_ROWS: usize = 1024;
pub const DEFAULT_GPIO_LINE: u32 = 86;
pub const DEFAULT_RAW_OUT: &str = "img.buf";
pub const DEFAULT_PNG_OUT: &str = "img.png";
pub const DEFAULT_SENSOR_DIR: &str = "/sys/class/prucam/prucam";

/// Everything one capture run needs. Missing keys take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub cols: usize,
    pub rows: usize,
    pub device_path: PathBuf,
    pub gpio_line: u32,
    pub gpio_root: PathBuf,
    /// Leave the enable line alone (sensor already powered).
    pub skip_gpio: bool,
    pub raw_out_path: PathBuf,
    pub png_out_path: PathBuf,
    pub sample_order: SampleOrder,
    pub png_compression: PngCompression,
    pub sensor: SensorSettings,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
            gpio_line: DEFAULT_GPIO_LINE,
            gpio_root: PathBuf::from(DEFAULT_GPIO_ROOT),
            skip_gpio: false,
            raw_out_path: PathBuf::from(DEFAULT_RAW_OUT),
            png_out_path: PathBuf::from(DEFAULT_PNG_OUT),
            sample_order: SampleOrder::default(),
            png_compression: PngCompression::default(),
            sensor: SensorSettings::default(),
        }
    }
}

impl CaptureConfig {
    /// Bytes in one frame, or `None` if the dimensions overflow.
    pub fn frame_len(&self) -> Option<usize> {
        frame_len(self.cols, self.rows)
    }

    /// Reject configurations that cannot describe a capture.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(SettingsError::Invalid(format!(
                "frame dimensions must be non-zero, got {}x{}",
                self.cols, self.rows
            )));
        }
        if u32::try_from(self.cols).is_err() || u32::try_from(self.rows).is_err() {
            return Err(SettingsError::Invalid(format!(
                "frame dimensions {}x{} exceed the PNG limit",
                self.cols, self.rows
            )));
        }
        if self.frame_len().is_none() {
            return Err(SettingsError::Invalid(format!(
                "frame of {}x{} samples overflows",
                self.cols, self.rows
            )));
        }
        if self.raw_out_path == self.png_out_path {
            return Err(SettingsError::Invalid(format!(
                "raw and PNG outputs share the path {}",
                self.raw_out_path.display()
            )));
        }
        self.sensor.validate()
    }
}

/// Optional driver attributes written before the sensor is enabled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SensorSettings {
    /// Directory holding the driver's attribute files.
    pub sysfs_dir: PathBuf,
    /// Attribute to decimal value; iteration order puts `context` first.
    pub attributes: BTreeMap<SensorAttribute, u32>,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            sysfs_dir: PathBuf::from(DEFAULT_SENSOR_DIR),
            attributes: BTreeMap::new(),
        }
    }
}

impl SensorSettings {
    /// Range-check every attribute value against the driver limits.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (attr, value) in &self.attributes {
            attr.validate(*value).map_err(SettingsError::Invalid)?;
        }
        Ok(())
    }
}
