//! Core types for JPEG XL encoding.

use thiserror::Error;

use super::frame::PixelLayout;

/// Error types for encoding operations.
///
/// One variant per step of an encode attempt that can fail. All variants
/// are peers (no nesting) and all are terminal: nothing is retried, partial
/// output is discarded, and the native session is still released through
/// its scoped-acquisition guarantee.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The parallel runner could not be attached to the encoder, or one of
    /// the native session objects could not be allocated.
    #[error("could not attach the parallel runner to the encoder")]
    SetParallelRunner,

    /// The encoder rejected the image dimensions or sample description.
    #[error("encoder rejected the basic image info")]
    SetBasicInfo,

    /// The encoder rejected the derived color encoding.
    #[error("encoder rejected the color encoding")]
    SetColorEncoding,

    /// The effort setting was out of range or rejected by the encoder.
    #[error("invalid or rejected effort setting")]
    SetEffort,

    /// The Brotli effort setting was out of range or rejected.
    #[error("invalid or rejected Brotli effort setting")]
    SetBrotliEffort,

    /// The distance setting was out of range or rejected.
    #[error("invalid or rejected distance setting")]
    SetDistance,

    /// The lossless flag was rejected by the encoder.
    #[error("encoder rejected the lossless setting")]
    SetLossless,

    /// The source bytes could not be decoded into a raster image.
    #[error("could not decode source into a raster image: {0}")]
    DecodeSource(String),

    /// The raster's sample buffer does not match its derived descriptors.
    #[error("raster sample buffer does not match the derived pixel layout")]
    SourcePixels,

    /// The encoder rejected the submitted frame.
    #[error("encoder rejected the input frame")]
    AddFrame,

    /// The encoder failed while producing compressed output.
    #[error("encoder failed while processing output")]
    ProcessOutput,
}

/// The one frame of input a session accepts before its input is closed.
#[derive(Debug)]
pub(crate) enum FrameInput<'a> {
    /// Interleaved float samples matching a derived [`PixelLayout`].
    Raster {
        layout: PixelLayout,
        samples: &'a [f32],
    },
    /// A complete JPEG byte stream, transcoded losslessly.
    Jpeg(&'a [u8]),
}
