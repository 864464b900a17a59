use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Writable sensor attributes exposed by the prucam driver under sysfs.
///
/// Each attribute is a decimal text file; the driver maps it onto an AR013x
/// register in the currently selected context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SensorAttribute {
    /// Selects register context A (0) or B (1). Applied first.
    Context,
    XSize,
    YSize,
    YOddInc,
    Green1Gain,
    BlueGain,
    RedGain,
    Green2Gain,
    GlobalGain,
    AnalogGain,
    DigitalBinning,
    CoarseTime,
    FineTime,
    FrameLenLines,
}

const ALL: &[SensorAttribute] = &[
    SensorAttribute::Context,
    SensorAttribute::XSize,
    SensorAttribute::YSize,
    SensorAttribute::YOddInc,
    SensorAttribute::Green1Gain,
    SensorAttribute::BlueGain,
    SensorAttribute::RedGain,
    SensorAttribute::Green2Gain,
    SensorAttribute::GlobalGain,
    SensorAttribute::AnalogGain,
    SensorAttribute::DigitalBinning,
    SensorAttribute::CoarseTime,
    SensorAttribute::FineTime,
    SensorAttribute::FrameLenLines,
];

impl SensorAttribute {
    /// Every attribute, in the order they are applied.
    pub fn all() -> &'static [SensorAttribute] {
        ALL
    }

    /// File name of the attribute in the driver's sysfs directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::XSize => "x_size",
            Self::YSize => "y_size",
            Self::YOddInc => "y_odd_inc",
            Self::Green1Gain => "green1_gain",
            Self::BlueGain => "blue_gain",
            Self::RedGain => "red_gain",
            Self::Green2Gain => "green2_gain",
            Self::GlobalGain => "global_gain",
            Self::AnalogGain => "analog_gain",
            Self::DigitalBinning => "digital_binning",
            Self::CoarseTime => "coarse_time",
            Self::FineTime => "fine_time",
            Self::FrameLenLines => "frame_len_lines",
        }
    }

    /// Values the driver accepts for this attribute.
    pub fn valid_range(self) -> RangeInclusive<u32> {
        match self {
            Self::Context => 0..=1,
            // End address registers cap at 0x07FF / 0x03FF.
            Self::XSize => 1..=0x07FF,
            Self::YSize => 1..=0x03FF,
            Self::YOddInc => 0..=0x007E,
            Self::AnalogGain | Self::DigitalBinning => 0..=0x3,
            // Color and global gains are refused from 0x00FF up.
            Self::Green1Gain
            | Self::BlueGain
            | Self::RedGain
            | Self::Green2Gain
            | Self::GlobalGain => 0..=0x00FE,
            Self::CoarseTime | Self::FineTime | Self::FrameLenLines => 0..=0xFFFF,
        }
    }

    /// Check `value` against [`Self::valid_range`].
    pub fn validate(self, value: u32) -> Result<u32, String> {
        let range = self.valid_range();
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(format!(
                "sensor attribute '{self}' must be within {}..={}, got {value}",
                range.start(),
                range.end()
            ))
        }
    }
}

impl fmt::Display for SensorAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for SensorAttribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.iter()
            .copied()
            .find(|attr| attr.file_name() == s)
            .ok_or_else(|| format!("unknown sensor attribute '{s}'"))
    }
}

impl TryFrom<String> for SensorAttribute {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SensorAttribute> for String {
    fn from(value: SensorAttribute) -> Self {
        value.file_name().to_string()
    }
}
