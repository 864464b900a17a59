use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::capture::encode::PngCompression;
use crate::capture::frame::SampleOrder;
use crate::device::sensor::SensorAttribute;
use crate::settings::error::SettingsError;
use crate::settings::store;
use crate::settings::types::CaptureConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleOrderArg {
    /// Host byte order
    Native,
    /// Low byte first
    Little,
    /// High byte first
    Big,
}

impl From<SampleOrderArg> for SampleOrder {
    fn from(arg: SampleOrderArg) -> Self {
        match arg {
            SampleOrderArg::Native => SampleOrder::Native,
            SampleOrderArg::Little => SampleOrder::Little,
            SampleOrderArg::Big => SampleOrder::Big,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    Fast,
    Default,
    Best,
}

impl From<CompressionArg> for PngCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Fast => PngCompression::Fast,
            CompressionArg::Default => PngCompression::Default,
            CompressionArg::Best => PngCompression::Best,
        }
    }
}

/// Capture one frame from the prucam device and save it as raw bytes and a 16-bit PNG.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frame width in pixels
    #[arg(long)]
    pub cols: Option<usize>,

    /// Frame height in pixels
    #[arg(long)]
    pub rows: Option<usize>,

    /// Camera character device
    #[arg(short, long)]
    pub device: Option<PathBuf>,

    /// Sensor enable GPIO line
    #[arg(long)]
    pub gpio_line: Option<u32>,

    /// Root of the sysfs GPIO interface
    #[arg(long)]
    pub gpio_root: Option<PathBuf>,

    /// Do not touch the enable line
    #[arg(long)]
    pub skip_gpio: bool,

    /// Raw frame output file
    #[arg(long)]
    pub raw_out: Option<PathBuf>,

    /// PNG output file
    #[arg(short = 'o', long)]
    pub png_out: Option<PathBuf>,

    /// Byte order of the device's 16-bit samples
    #[arg(long, value_enum)]
    pub sample_order: Option<SampleOrderArg>,

    /// PNG compression effort
    #[arg(long, value_enum)]
    pub png_compression: Option<CompressionArg>,

    /// Directory of the driver's sensor attribute files
    #[arg(long)]
    pub sensor_dir: Option<PathBuf>,

    /// Sensor attribute to write before capture, as NAME=VALUE (repeatable)
    #[arg(short = 's', long = "sensor", value_parser = parse_sensor_attr)]
    pub sensor_attrs: Vec<(SensorAttribute, u32)>,

    /// Use a simulated device instead of the hardware (also DUMMY_CAMERA=1)
    #[arg(long)]
    pub dummy: bool,

    /// Write a JSON capture report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less output (-q warnings, -qq errors only)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

impl Cli {
    /// Defaults, then the config file, then command-line overrides; validated.
    pub fn resolve_config(&self) -> Result<CaptureConfig, SettingsError> {
        let mut config = match &self.config {
            Some(path) => store::load(path)?,
            None => CaptureConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut CaptureConfig) {
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(device) = &self.device {
            config.device_path = device.clone();
        }
        if let Some(line) = self.gpio_line {
            config.gpio_line = line;
        }
        if let Some(root) = &self.gpio_root {
            config.gpio_root = root.clone();
        }
        if self.skip_gpio {
            config.skip_gpio = true;
        }
        if let Some(path) = &self.raw_out {
            config.raw_out_path = path.clone();
        }
        if let Some(path) = &self.png_out {
            config.png_out_path = path.clone();
        }
        if let Some(order) = self.sample_order {
            config.sample_order = order.into();
        }
        if let Some(compression) = self.png_compression {
            config.png_compression = compression.into();
        }
        if let Some(dir) = &self.sensor_dir {
            config.sensor.sysfs_dir = dir.clone();
        }
        for (attr, value) in &self.sensor_attrs {
            config.sensor.attributes.insert(*attr, *value);
        }
    }
}

fn parse_sensor_attr(s: &str) -> Result<(SensorAttribute, u32), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let attr: SensorAttribute = name.trim().parse()?;
    let value: u32 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for {attr}: {e}"))?;
    Ok((attr, value))
}
