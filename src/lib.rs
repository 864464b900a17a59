pub mod capture;
pub mod cli;
pub mod device;
pub mod error;
pub mod logging;
pub mod settings;

use capture::pipeline::FrameCapture;
use cli::Cli;
use device::dummy::DummyDevice;
use error::Error;
use settings::error::SettingsError;
use settings::store;

/// Resolve the configuration and run one capture.
///
/// When `DUMMY_CAMERA=1` is set (or `--dummy` is passed), a simulated
/// device is used instead of sysfs and `/dev/prucam`.
pub fn run(cli: &Cli) -> Result<(), Error> {
    let config = cli.resolve_config()?;

    if cli.print_config {
        let json = serde_json::to_string_pretty(&config).map_err(SettingsError::from)?;
        println!("{json}");
        return Ok(());
    }

    let capture = if cli.dummy || DummyDevice::is_enabled() {
        tracing::info!("Using simulated prucam device");
        FrameCapture::dummy(&config)
    } else {
        FrameCapture::hardware(&config)
    };

    tracing::info!(
        "Capturing {}x{} frame from {}",
        config.cols,
        config.rows,
        config.device_path.display()
    );
    let report = capture.capture(&config)?;
    tracing::info!(
        "Saved {} ({} bytes) and {} ({} bytes) in {:.1} ms",
        report.raw_path.display(),
        report.bytes_read,
        report.png_path.display(),
        report.png_bytes,
        report.total_ms()
    );

    if let Some(path) = &cli.report {
        store::write_json(path, &report).map_err(|source| Error::Report {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Report written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn dummy_cli(dir: &TempDir, extra: &[&str]) -> Cli {
        let raw = dir.path().join("img.buf");
        let png = dir.path().join("img.png");
        let mut argv = vec![
            "prucam-capture".to_string(),
            "--dummy".to_string(),
            "--cols".to_string(),
            "4".to_string(),
            "--rows".to_string(),
            "2".to_string(),
            "--raw-out".to_string(),
            raw.display().to_string(),
            "--png-out".to_string(),
            png.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn dummy_run_writes_report() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("report.json");
        let cli = dummy_cli(&dir, &["--report", report.to_str().unwrap()]);
        run(&cli).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["bytesRead"], 16);
        assert!(dir.path().join("img.png").exists());
    }

    #[test]
    fn unwritable_report_is_a_report_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let report = blocker.join("report.json");
        let cli = dummy_cli(&dir, &["--report", report.to_str().unwrap()]);

        let err = run(&cli).unwrap_err();
        assert!(matches!(err, Error::Report { ref path, .. } if *path == report));
        assert_eq!(err.exit_code(), 9);
        assert!(dir.path().join("img.png").exists());
    }
}
