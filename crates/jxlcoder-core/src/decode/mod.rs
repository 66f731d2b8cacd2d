//! JPEG XL decoding.
//!
//! The decode direction is declared but deliberately not implemented: the
//! upstream surface it mirrors stops at the same point. A future
//! implementation would drive a decoder session through the identical
//! chunked drain protocol the encoder uses (the drain loop is already
//! generic over its output source for exactly that reason).

use thiserror::Error;

/// Error types for decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Decoding is not implemented.
    #[error("JPEG XL decoding is not implemented")]
    Unimplemented,
}

/// Decode a JPEG XL byte stream into pixels.
///
/// Always fails with [`DecodeError::Unimplemented`], deterministically and
/// without touching any native resources.
pub fn decode(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let _ = data;
    Err(DecodeError::Unimplemented)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_is_deterministically_unimplemented() {
        for input in [&[][..], &[0xFF, 0x0A][..]] {
            assert!(matches!(decode(input), Err(DecodeError::Unimplemented)));
        }
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::Unimplemented.to_string(),
            "JPEG XL decoding is not implemented"
        );
    }
}
