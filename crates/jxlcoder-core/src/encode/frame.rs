//! Descriptor derivation for the raw-pixel encode path.
//!
//! The JPEG path carries its own header information, but a raster frame
//! needs three descriptors derived from the source image before the
//! encoder will accept pixels: the basic info (dimensions and sample
//! numeric format), the pixel layout of the submitted buffer, and a color
//! encoding consistent with the channel count.
//!
//! The sample representation is deliberately not introspected from the
//! source: every raster is converted to interleaved `f32` in native byte
//! order, so the declared descriptors and the submitted bytes always
//! agree.

use image::DynamicImage;

use super::EncodeError;

/// Sample description handed to the encoder before any pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BasicInfo {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Bits per sample (32 for the canonical float representation).
    pub bits_per_sample: u32,
    /// Exponent bits per sample (8 marks the samples as IEEE f32).
    pub exponent_bits_per_sample: u32,
    /// Whether the original color profile must be preserved.
    pub uses_original_profile: bool,
}

/// Memory layout of the sample buffer submitted with a raster frame.
///
/// The sample type is fixed (interleaved `f32`, native byte order), so
/// only the channel count varies with the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelLayout {
    /// 1 for grayscale, 3 for RGB. Alpha is not modeled.
    pub channels: u32,
}

/// Color encoding selected for a frame.
///
/// Kept consistent with [`PixelLayout`]: fewer than three source channels
/// selects grayscale, anything else sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorMode {
    Srgb,
    Gray,
}

/// A raster frame ready for submission: the derived descriptors plus the
/// converted sample buffer they describe.
#[derive(Debug)]
pub(crate) struct RasterFrame {
    pub info: BasicInfo,
    pub layout: PixelLayout,
    pub color: ColorMode,
    pub samples: Vec<f32>,
}

impl RasterFrame {
    /// Derive descriptors from the source image and convert its pixels to
    /// the canonical interleaved `f32` representation.
    ///
    /// Pure function of the source dimensions and channel layout; derived
    /// once per encode call and never mutated afterwards.
    pub fn from_image(image: &DynamicImage) -> Result<Self, EncodeError> {
        let (width, height) = (image.width(), image.height());
        let grayscale = image.color().channel_count() < 3;
        let (channels, color, samples) = if grayscale {
            (1, ColorMode::Gray, image.to_luma32f().into_raw())
        } else {
            (3, ColorMode::Srgb, image.to_rgb32f().into_raw())
        };

        let expected = width as usize * height as usize * channels as usize;
        if samples.len() != expected {
            return Err(EncodeError::SourcePixels);
        }

        Ok(Self {
            info: BasicInfo {
                width,
                height,
                bits_per_sample: 32,
                exponent_bits_per_sample: 8,
                uses_original_profile: false,
            },
            layout: PixelLayout { channels },
            color,
            samples,
        })
    }

    /// Sample buffer size in bytes, as submitted to the encoder.
    pub fn byte_len(&self) -> usize {
        std::mem::size_of_val(self.samples.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage, RgbaImage};

    #[test]
    fn test_rgb_image_derives_srgb() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([255, 0, 51])));
        let frame = RasterFrame::from_image(&image).unwrap();

        assert_eq!(frame.info.width, 4);
        assert_eq!(frame.info.height, 3);
        assert_eq!(frame.info.bits_per_sample, 32);
        assert_eq!(frame.info.exponent_bits_per_sample, 8);
        assert!(!frame.info.uses_original_profile);

        assert_eq!(frame.layout.channels, 3);
        assert_eq!(frame.color, ColorMode::Srgb);
        assert_eq!(frame.samples.len(), 4 * 3 * 3);
        assert_eq!(frame.byte_len(), 4 * 3 * 3 * 4);
    }

    #[test]
    fn test_grayscale_image_derives_gray() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 2, image::Luma([128])));
        let frame = RasterFrame::from_image(&image).unwrap();

        assert_eq!(frame.layout.channels, 1);
        assert_eq!(frame.color, ColorMode::Gray);
        assert_eq!(frame.samples.len(), 5 * 2);
    }

    #[test]
    fn test_alpha_is_dropped() {
        let image =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 40])));
        let frame = RasterFrame::from_image(&image).unwrap();

        // Four source channels still submit as three: alpha is not modeled.
        assert_eq!(frame.layout.channels, 3);
        assert_eq!(frame.color, ColorMode::Srgb);
        assert_eq!(frame.samples.len(), 2 * 2 * 3);
    }

    #[test]
    fn test_samples_are_normalized_floats() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 0, 51])));
        let frame = RasterFrame::from_image(&image).unwrap();

        assert!((frame.samples[0] - 1.0).abs() < 1e-6);
        assert!(frame.samples[1].abs() < 1e-6);
        assert!((frame.samples[2] - 51.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_channel_count_matches_color_mode() {
        // The invariant: channels < 3 exactly when the color mode is gray.
        let gray = DynamicImage::ImageLuma8(GrayImage::new(3, 3));
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(3, 3));
        for image in [gray, rgb] {
            let frame = RasterFrame::from_image(&image).unwrap();
            assert_eq!(frame.layout.channels < 3, frame.color == ColorMode::Gray);
        }
    }
}
