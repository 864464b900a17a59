use std::path::PathBuf;

use thiserror::Error;

use crate::capture::error::CaptureError;
use crate::settings::error::SettingsError;

/// Top-level failure of a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("capture failed at {stage} stage: {0}", stage = .0.stage())]
    Capture(#[from] CaptureError),

    /// The frame was captured but the JSON report could not be saved.
    #[error("report not written: {}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: SettingsError,
    },
}

impl Error {
    /// Non-zero process exit status identifying the failed stage.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Settings(e) => e.exit_code(),
            Self::Capture(e) => e.exit_code(),
            Self::Report { .. } => 9,
        }
    }

    /// The error and all of its sources, joined with `: `.
    pub fn chain(&self) -> String {
        use std::error::Error as _;

        let mut message = self.to_string();
        // The inner error is already part of our own message.
        let mut source = match self {
            Self::Settings(e) => e.source(),
            Self::Capture(e) => e.source(),
            Self::Report { source, .. } => Some(source as &(dyn std::error::Error + 'static)),
        };
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}
