//! Encoder configuration.
//!
//! [`EncoderConfig`] is a plain value type; applying it to a session means
//! translating it into an ordered sequence of option-setting calls against
//! the encoder. That translation ([`EncoderConfig::option_calls`]) is kept
//! pure so range validation and call ordering are testable without a live
//! encoder.

use serde::{Deserialize, Serialize};

use crate::encode::EncodeError;

/// Sentinel accepted by libjxl integer frame settings meaning "keep the
/// encoder's own default".
const ENCODER_DEFAULT: i64 = -1;

/// Encoder settings for one encode call.
///
/// Settings are applied to a session in a fixed order (effort, Brotli
/// effort, distance, lossless) before any frame is submitted, and are
/// immutable from then on: the encode entry points only accept a config
/// ahead of frame submission, so re-configuring a session mid-flight
/// cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Speed/compression tradeoff (1 to 9). Higher is slower and smaller.
    pub effort: u32,
    /// Effort for Brotli-compressed metadata and JPEG-mode boxes
    /// (0 to 11). `None` leaves the encoder default in place.
    pub brotli_effort: Option<u32>,
    /// Target perceptual distance (0.0 to 15.0). Lower is higher quality.
    /// 0.0 on its own does not request mathematically lossless output;
    /// set `lossless` for that.
    pub distance: f32,
    /// Request true lossless mode, overriding distance-driven lossy
    /// encoding.
    pub lossless: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            effort: 7,
            brotli_effort: Some(9),
            distance: 1.0,
            lossless: true,
        }
    }
}

impl EncoderConfig {
    /// Create a config with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A lossy configuration targeting the given perceptual distance.
    pub fn lossy(distance: f32) -> Self {
        Self {
            distance,
            lossless: false,
            ..Self::default()
        }
    }
}

/// One option-setting call against the encoder.
///
/// Produced by [`EncoderConfig::option_calls`] in application order. Later
/// calls may depend on the encoder's internal validation of earlier ones,
/// so the order is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum OptionCall {
    Effort(i64),
    BrotliEffort(i64),
    Distance(f32),
    Lossless(bool),
}

impl EncoderConfig {
    /// Translate the config into its ordered call sequence.
    ///
    /// Out-of-range values fail with the same step-specific error the
    /// encoder itself would raise, without producing any later calls.
    pub(crate) fn option_calls(&self) -> Result<Vec<OptionCall>, EncodeError> {
        if !(1..=9).contains(&self.effort) {
            return Err(EncodeError::SetEffort);
        }
        let brotli = match self.brotli_effort {
            Some(effort) if effort <= 11 => i64::from(effort),
            Some(_) => return Err(EncodeError::SetBrotliEffort),
            None => ENCODER_DEFAULT,
        };
        if !(0.0..=15.0).contains(&self.distance) {
            return Err(EncodeError::SetDistance);
        }
        Ok(vec![
            OptionCall::Effort(i64::from(self.effort)),
            OptionCall::BrotliEffort(brotli),
            OptionCall::Distance(self.distance),
            OptionCall::Lossless(self.lossless),
        ])
    }
}
