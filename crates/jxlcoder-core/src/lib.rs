//! Jxlcoder Core - JPEG XL encoding library
//!
//! This crate wraps the libjxl encoder behind a safe, synchronous API:
//! configure a session, submit one input frame, and drain the compressed
//! output. Two input paths share the same pipeline:
//!
//! - Decoded raster images ([`encode_image`]), converted to canonical
//!   float samples before submission.
//! - Existing JPEG byte streams ([`encode_jpeg`]), transcoded losslessly.
//!
//! Each encode call owns its native resources exclusively: the encoder and
//! its attached thread-parallel runner are created together and released
//! on every exit path. Decoding JPEG XL back into pixels is declared but
//! not implemented; see [`decode`].
//!
//! # Examples
//!
//! ```ignore
//! use jxlcoder_core::{encode_jpeg, EncoderConfig};
//!
//! let jpeg = std::fs::read("photo.jpg").unwrap();
//! let jxl = encode_jpeg(&jpeg, &EncoderConfig::default()).unwrap();
//! std::fs::write("photo.jpg.jxl", jxl).unwrap();
//! ```

pub mod config;
pub mod decode;
pub mod encode;

pub use config::EncoderConfig;
pub use decode::{decode, DecodeError};
pub use encode::{
    default_worker_threads, encode_file, encode_image, encode_image_with_threads, encode_jpeg,
    EncodeError,
};
