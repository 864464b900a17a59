use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use serde::{Deserialize, Serialize};

use crate::capture::error::{CaptureError, Result};
use crate::capture::frame::Frame;

/// zlib effort used for the PNG output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl From<PngCompression> for CompressionType {
    fn from(value: PngCompression) -> Self {
        match value {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

/// Encode a frame as a 16-bit grayscale PNG, `cols` wide and `rows` high.
///
/// Nothing is returned on codec failure, so a partial image never reaches disk.
pub fn encode_png(frame: &Frame, compression: PngCompression) -> Result<Vec<u8>> {
    let img = frame.to_image()?;

    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, compression.into(), FilterType::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(CaptureError::Encode)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn decode(png: &[u8]) -> image::ImageBuffer<image::Luma<u16>, Vec<u16>> {
        image::load_from_memory_with_format(png, ImageFormat::Png)
            .unwrap()
            .into_luma16()
    }

    #[test]
    fn encode_png_produces_png_signature() {
        let png = encode_png(&Frame::test_pattern(8, 4), PngCompression::Default).unwrap();
        assert_eq!(png[..8], PNG_SIGNATURE);
    }

    #[test]
    fn encode_png_is_sixteen_bit_grayscale() {
        let png = encode_png(&Frame::test_pattern(8, 4), PngCompression::Fast).unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L16);
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[test]
    fn decode_returns_exact_samples() {
        // Full 16-bit range, including values that would clip in 8 bits.
        let samples = vec![0, 1, 255, 256, 0x7fff, 0x8000, 0xfffe, 0xffff];
        let frame = Frame::from_samples(4, 2, samples.clone()).unwrap();
        let png = encode_png(&frame, PngCompression::Best).unwrap();
        assert_eq!(decode(&png).into_raw(), samples);
    }

    #[test]
    fn compression_levels_decode_identically() {
        let frame = Frame::test_pattern(64, 48);
        let fast = decode(&encode_png(&frame, PngCompression::Fast).unwrap());
        let best = decode(&encode_png(&frame, PngCompression::Best).unwrap());
        assert_eq!(fast, best);
        assert_eq!(fast.into_raw(), frame.samples());
    }

    #[test]
    fn empty_frame_fails_to_encode() {
        let frame = Frame::from_samples(0, 0, vec![]).unwrap();
        let err = encode_png(&frame, PngCompression::Default).unwrap_err();
        assert!(matches!(err, CaptureError::Encode(_)));
    }
}
