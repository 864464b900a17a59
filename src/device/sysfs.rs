use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::capture::error::{CaptureError, Result};
use crate::device::backend::SensorControl;
use crate::device::sensor::SensorAttribute;

/// Default root of the legacy sysfs GPIO interface.
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// Path of the `value` file for an exported GPIO line.
pub fn gpio_value_path(root: &Path, line: u32) -> PathBuf {
    root.join(format!("gpio{line}")).join("value")
}

/// Sensor control through sysfs text files.
///
/// The GPIO line must already be exported; files are opened for writing
/// only and never created.
pub struct SysfsControl {
    gpio_root: PathBuf,
    attribute_dir: PathBuf,
}

impl SysfsControl {
    pub fn new(gpio_root: impl Into<PathBuf>, attribute_dir: impl Into<PathBuf>) -> Self {
        Self {
            gpio_root: gpio_root.into(),
            attribute_dir: attribute_dir.into(),
        }
    }
}

impl SensorControl for SysfsControl {
    fn write_attribute(&self, attribute: SensorAttribute, value: u32) -> Result<()> {
        let path = self.attribute_dir.join(attribute.file_name());
        write_text(&path, &value.to_string()).map_err(|source| CaptureError::SensorAttribute {
            name: attribute.file_name(),
            path: path.clone(),
            source,
        })?;
        tracing::debug!("sensor {attribute} = {value}");
        Ok(())
    }

    fn enable(&self, line: u32) -> Result<()> {
        let path = gpio_value_path(&self.gpio_root, line);
        write_text(&path, "1").map_err(|source| CaptureError::Gpio {
            line,
            path: path.clone(),
            source,
        })?;
        tracing::debug!("GPIO {line} driven high via {}", path.display());
        Ok(())
    }
}

fn write_text(path: &Path, text: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).open(path)?;
    file.write_all(text.as_bytes())?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Lay out a fake sysfs tree with one exported GPIO line.
    fn fake_sysfs(line: u32) -> TempDir {
        let dir = TempDir::new().unwrap();
        let gpio = dir.path().join("gpio").join(format!("gpio{line}"));
        fs::create_dir_all(&gpio).unwrap();
        fs::write(gpio.join("value"), "0").unwrap();
        fs::create_dir_all(dir.path().join("prucam")).unwrap();
        dir
    }

    #[test]
    fn gpio_value_path_uses_line_number() {
        assert_eq!(
            gpio_value_path(Path::new(DEFAULT_GPIO_ROOT), 86),
            PathBuf::from("/sys/class/gpio/gpio86/value")
        );
    }

    #[test]
    fn enable_writes_literal_one() {
        let dir = fake_sysfs(86);
        let control = SysfsControl::new(dir.path().join("gpio"), dir.path().join("prucam"));
        control.enable(86).unwrap();
        let value = fs::read_to_string(dir.path().join("gpio/gpio86/value")).unwrap();
        assert_eq!(value, "1");
    }

    #[test]
    fn enable_fails_for_unexported_line() {
        let dir = fake_sysfs(86);
        let control = SysfsControl::new(dir.path().join("gpio"), dir.path().join("prucam"));
        match control.enable(87).unwrap_err() {
            CaptureError::Gpio { line, path, .. } => {
                assert_eq!(line, 87);
                assert!(path.ends_with("gpio87/value"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("gpio/gpio87").exists());
    }

    #[test]
    fn write_attribute_writes_decimal_value() {
        let dir = fake_sysfs(86);
        let attrs = dir.path().join("prucam");
        fs::write(attrs.join("global_gain"), "").unwrap();
        let control = SysfsControl::new(dir.path().join("gpio"), &attrs);
        control
            .write_attribute(SensorAttribute::GlobalGain, 42)
            .unwrap();
        assert_eq!(fs::read_to_string(attrs.join("global_gain")).unwrap(), "42");
    }

    #[test]
    fn write_attribute_fails_when_driver_lacks_file() {
        let dir = fake_sysfs(86);
        let control = SysfsControl::new(dir.path().join("gpio"), dir.path().join("prucam"));
        let err = control
            .write_attribute(SensorAttribute::CoarseTime, 100)
            .unwrap_err();
        assert!(matches!(
            err,
            CaptureError::SensorAttribute {
                name: "coarse_time",
                ..
            }
        ));
    }
}
