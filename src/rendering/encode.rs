use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use tiny_skia::Pixmap;

use crate::error::RenderError;
use crate::models::{OutputConfig, OutputFormat};

/// A finished strip image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Encode an opaque canvas in the configured format.
pub fn encode(pixmap: &Pixmap, output: &OutputConfig) -> Result<EncodedImage, RenderError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let rgb = to_rgb8(pixmap);

    let bytes = match output.format {
        OutputFormat::Jpeg => encode_jpeg(&rgb, width, height, output.quality)?,
        OutputFormat::Png => {
            let png_bytes = encode_png(&rgb, width, height)?;
            // Re-compress with oxipng; keep the fast encoding if that fails
            oxipng::optimize_from_memory(
                &png_bytes,
                &oxipng::Options {
                    strip: oxipng::StripChunks::Safe,
                    ..Default::default()
                },
            )
            .unwrap_or(png_bytes)
        }
    };

    Ok(EncodedImage {
        bytes,
        format: output.format,
        width,
        height,
    })
}

/// Drop alpha from a premultiplied pixmap. Strip canvases are opaque, so
/// demultiplying is exact.
fn to_rgb8(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue()]
        })
        .collect()
}

fn encode_jpeg(rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(buf)
}

fn encode_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        writer
            .write_image_data(rgb)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    fn canvas(width: u32, height: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(width, height).unwrap();
        pixmap.fill(Color::from_rgba8(110, 101, 91, 255));
        pixmap
    }

    #[test]
    fn test_to_rgb8_drops_alpha() {
        let rgb = to_rgb8(&canvas(2, 1));
        assert_eq!(rgb, vec![110, 101, 91, 110, 101, 91]);
    }

    #[test]
    fn test_encode_jpeg() {
        let image = encode(&canvas(32, 16), &OutputConfig::default()).unwrap();

        assert_eq!(image.format, OutputFormat::Jpeg);
        assert_eq!(image.content_type(), "image/jpeg");
        assert_eq!((image.width, image.height), (32, 16));
        assert_eq!(&image.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_png_round_trips() {
        let output = OutputConfig {
            format: OutputFormat::Png,
            quality: 75,
        };
        let image = encode(&canvas(8, 4), &output).unwrap();

        assert_eq!(&image.bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = Pixmap::decode_png(&image.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
        let pixel = decoded.pixel(7, 3).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (110, 101, 91));
    }

    #[test]
    fn test_jpeg_quality_is_clamped() {
        let output = OutputConfig {
            format: OutputFormat::Jpeg,
            quality: 0,
        };
        assert!(encode(&canvas(16, 16), &output).is_ok());
    }
}
