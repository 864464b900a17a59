use std::path::Path;

use serde::Serialize;

use crate::settings::error::SettingsError;
use crate::settings::types::CaptureConfig;

/// Load a capture configuration from a JSON file.
///
/// Keys missing from the file keep their defaults. The result is not yet
/// validated, since command-line overrides may still apply.
pub fn load(path: &Path) -> Result<CaptureConfig, SettingsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print `value` as JSON to `path` (write .tmp then rename).
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SettingsError> {
    let json = serde_json::to_string_pretty(value)?;
    let write_err = |source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json).map_err(write_err)?;
    std::fs::rename(&tmp_path, path).map_err(write_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::frame::SampleOrder;
    use crate::device::sensor::SensorAttribute;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn load_fails_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nonexistent.json");
        assert!(matches!(load(&path), Err(SettingsError::Read { .. })));
    }

    #[test]
    fn load_parses_valid_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prucam.json");
        let json = r#"{"cols":640,"rows":480,"device_path":"/dev/prucam1","sensor":{"attributes":{"global_gain":12}}}"#;
        std::fs::write(&path, json).unwrap();

        let config = load(&path).unwrap();
        assert_eq!((config.cols, config.rows), (640, 480));
        assert_eq!(config.device_path, PathBuf::from("/dev/prucam1"));
        assert_eq!(config.sensor.attributes[&SensorAttribute::GlobalGain], 12);
        assert_eq!(config.gpio_line, 86);
    }

    #[test]
    fn load_returns_error_for_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prucam.json");
        std::fs::write(&path, "not valid json!!!").unwrap();
        assert!(matches!(load(&path), Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn written_config_round_trips_through_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prucam.json");
        let config = CaptureConfig {
            cols: 4,
            rows: 2,
            sample_order: SampleOrder::Big,
            ..CaptureConfig::default()
        };
        write_json(&path, &config).unwrap();
        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn write_json_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("report.json");
        write_json(&path, &CaptureConfig::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_json_is_atomic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prucam.json");
        write_json(&path, &CaptureConfig::default()).unwrap();
        assert!(
            !dir.path().join("prucam.json.tmp").exists(),
            ".tmp file should be cleaned up after rename"
        );
    }
}
