//! JPEG XL encoding pipeline.
//!
//! This module provides functionality for:
//! - Encoding decoded raster images to JPEG XL
//! - Losslessly transcoding existing JPEG streams to JPEG XL
//! - Draining the encoder's streaming output into one buffer
//!
//! # Architecture
//!
//! Both input kinds run through the same pipeline: acquire a scoped
//! encoder session, apply the [`EncoderConfig`](crate::EncoderConfig),
//! submit exactly one frame, close input, and drain compressed output in
//! fixed-size chunks until the encoder reports completion. Every step that
//! can fail has its own [`EncodeError`] variant, raised as soon as the
//! corresponding native status is unsuccessful.
//!
//! # Examples
//!
//! ```ignore
//! use jxlcoder_core::{encode_image, EncoderConfig};
//!
//! let image = image::open("photo.png").unwrap();
//! let jxl = encode_image(&image, &EncoderConfig::default()).unwrap();
//! assert!(!jxl.is_empty());
//! ```

mod drain;
mod frame;
mod session;
mod types;

pub use session::default_worker_threads;
pub use types::EncodeError;

use std::path::Path;

use image::DynamicImage;

use crate::config::EncoderConfig;
use frame::RasterFrame;
use session::EncoderSession;
use types::FrameInput;

/// Encode a decoded raster image to JPEG XL.
///
/// Derives the frame descriptors from the image (grayscale sources keep
/// one channel, everything else is submitted as sRGB), converts the pixels
/// to canonical float samples, and runs the full session pipeline. The
/// parallel runner is sized by [`default_worker_threads`].
///
/// # Returns
///
/// The complete compressed byte stream, or the error identifying exactly
/// which configuration, submission, or drain step failed. Callers never
/// receive a truncated buffer labeled as success.
pub fn encode_image(image: &DynamicImage, config: &EncoderConfig) -> Result<Vec<u8>, EncodeError> {
    encode_image_with_threads(image, config, default_worker_threads())
}

/// Encode a decoded raster image with an explicit worker-thread count.
pub fn encode_image_with_threads(
    image: &DynamicImage,
    config: &EncoderConfig,
    worker_threads: usize,
) -> Result<Vec<u8>, EncodeError> {
    let mut session = EncoderSession::acquire(worker_threads)?;
    session.apply_config(config)?;
    let frame = RasterFrame::from_image(image)?;
    session.describe_raster(&frame)?;
    session.add_frame(FrameInput::Raster {
        layout: frame.layout,
        samples: &frame.samples,
    })?;
    session.drain()
}

/// Losslessly transcode an existing JPEG byte stream to JPEG XL.
///
/// The stream is submitted as-is; the encoder derives dimensions and color
/// information from the JPEG header, so no raster descriptors are set.
pub fn encode_jpeg(jpeg: &[u8], config: &EncoderConfig) -> Result<Vec<u8>, EncodeError> {
    let mut session = EncoderSession::acquire(default_worker_threads())?;
    session.apply_config(config)?;
    session.add_frame(FrameInput::Jpeg(jpeg))?;
    session.drain()
}

/// Encode a raster image file (PNG, JPEG, ...) to JPEG XL.
///
/// Decodes the file through the `image` crate and defers to
/// [`encode_image`]. A file that cannot be decoded into a raster fails
/// with [`EncodeError::DecodeSource`].
pub fn encode_file(path: &Path, config: &EncoderConfig) -> Result<Vec<u8>, EncodeError> {
    let image = image::open(path).map_err(|e| EncodeError::DecodeSource(e.to_string()))?;
    encode_image(&image, config)
}
