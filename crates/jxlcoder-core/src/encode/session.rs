//! The live encoder session.
//!
//! All unsafe FFI lives here. A session owns the native encoder, the
//! thread-parallel runner attached to it, and the frame-settings handle
//! derived from the encoder. The pair is created together, used by exactly
//! one encode call, and released on every exit path (success, typed
//! failure, or unwind) by `Drop`, runner first and encoder second.

use std::ffi::c_void;
use std::mem::MaybeUninit;
use std::ptr;

use jpegxl_sys::color::color_encoding::JxlColorEncoding;
use jpegxl_sys::common::types::{JxlBool, JxlDataType, JxlEndianness, JxlPixelFormat};
use jpegxl_sys::encoder::encode::{
    JxlColorEncodingSetToSRGB, JxlEncoder, JxlEncoderAddImageFrame, JxlEncoderAddJPEGFrame,
    JxlEncoderCloseInput, JxlEncoderCreate, JxlEncoderDestroy, JxlEncoderFrameSettings,
    JxlEncoderFrameSettingsCreate, JxlEncoderFrameSettingsSetOption, JxlEncoderFrameSettingId,
    JxlEncoderInitBasicInfo, JxlEncoderProcessOutput, JxlEncoderSetBasicInfo,
    JxlEncoderSetColorEncoding, JxlEncoderSetFrameDistance, JxlEncoderSetFrameLossless,
    JxlEncoderSetParallelRunner, JxlEncoderStatus,
};
use jpegxl_sys::metadata::codestream_header::JxlBasicInfo;
use jpegxl_sys::threads::thread_parallel_runner::{
    JxlThreadParallelRunner, JxlThreadParallelRunnerCreate,
    JxlThreadParallelRunnerDefaultNumWorkerThreads, JxlThreadParallelRunnerDestroy,
};

use super::drain::{drain_output, DrainStatus, OutputSource, ProcessStep, OUTPUT_CHUNK_SIZE};
use super::frame::{ColorMode, RasterFrame};
use super::types::{EncodeError, FrameInput};
use crate::config::{EncoderConfig, OptionCall};

/// Number of worker threads the parallel runner uses when the caller does
/// not override it, as reported by the runtime (typically the available
/// core count).
pub fn default_worker_threads() -> usize {
    unsafe { JxlThreadParallelRunnerDefaultNumWorkerThreads() }
}

/// One create-to-destroy lifetime of the native encoder and its runner,
/// scoped to one encode call. Never shared and never reused.
pub(crate) struct EncoderSession {
    runner: *mut c_void,
    enc: *mut JxlEncoder,
    settings: *mut JxlEncoderFrameSettings,
}

impl EncoderSession {
    /// Create the runner and the encoder, attach the one to the other, and
    /// derive the frame-settings handle.
    ///
    /// An allocation failure of any of the three native objects surfaces
    /// as [`EncodeError::SetParallelRunner`], the same as an attachment
    /// rejection; whatever was already created is released by `Drop`.
    pub fn acquire(worker_threads: usize) -> Result<Self, EncodeError> {
        let runner = unsafe { JxlThreadParallelRunnerCreate(ptr::null(), worker_threads) };
        let enc = unsafe { JxlEncoderCreate(ptr::null()) };
        let mut session = Self {
            runner,
            enc,
            settings: ptr::null_mut(),
        };
        if session.runner.is_null() || session.enc.is_null() {
            return Err(EncodeError::SetParallelRunner);
        }

        let status = unsafe {
            JxlEncoderSetParallelRunner(session.enc, JxlThreadParallelRunner, session.runner)
        };
        if status != JxlEncoderStatus::Success {
            return Err(EncodeError::SetParallelRunner);
        }

        session.settings = unsafe { JxlEncoderFrameSettingsCreate(session.enc, ptr::null()) };
        if session.settings.is_null() {
            return Err(EncodeError::SetParallelRunner);
        }

        log::debug!("encoder session acquired ({worker_threads} worker threads)");
        Ok(session)
    }

    /// Apply the configuration, one option call at a time, checking each
    /// status immediately and aborting on the first rejection.
    ///
    /// Must run before any frame is submitted; no rollback is attempted
    /// because the caller abandons the session on any failure.
    pub fn apply_config(&mut self, config: &EncoderConfig) -> Result<(), EncodeError> {
        for call in config.option_calls()? {
            let (status, error) = unsafe {
                match call {
                    OptionCall::Effort(effort) => (
                        JxlEncoderFrameSettingsSetOption(
                            self.settings,
                            JxlEncoderFrameSettingId::Effort,
                            effort,
                        ),
                        EncodeError::SetEffort,
                    ),
                    OptionCall::BrotliEffort(effort) => (
                        JxlEncoderFrameSettingsSetOption(
                            self.settings,
                            JxlEncoderFrameSettingId::BrotliEffort,
                            effort,
                        ),
                        EncodeError::SetBrotliEffort,
                    ),
                    OptionCall::Distance(distance) => (
                        JxlEncoderSetFrameDistance(self.settings, distance),
                        EncodeError::SetDistance,
                    ),
                    OptionCall::Lossless(lossless) => (
                        JxlEncoderSetFrameLossless(self.settings, bool_to_jxl(lossless)),
                        EncodeError::SetLossless,
                    ),
                }
            };
            if status != JxlEncoderStatus::Success {
                return Err(error);
            }
        }
        Ok(())
    }

    /// Hand the derived raster descriptors to the encoder.
    ///
    /// Raw-pixel path only; the JPEG path derives its header from the
    /// source stream instead.
    pub fn describe_raster(&mut self, frame: &RasterFrame) -> Result<(), EncodeError> {
        let mut info = unsafe {
            let mut info = MaybeUninit::<JxlBasicInfo>::uninit();
            JxlEncoderInitBasicInfo(info.as_mut_ptr());
            info.assume_init()
        };
        info.xsize = frame.info.width;
        info.ysize = frame.info.height;
        info.bits_per_sample = frame.info.bits_per_sample;
        info.exponent_bits_per_sample = frame.info.exponent_bits_per_sample;
        info.uses_original_profile = bool_to_jxl(frame.info.uses_original_profile);
        if unsafe { JxlEncoderSetBasicInfo(self.enc, &info) } != JxlEncoderStatus::Success {
            return Err(EncodeError::SetBasicInfo);
        }

        let color = unsafe {
            let mut color = MaybeUninit::<JxlColorEncoding>::uninit();
            JxlColorEncodingSetToSRGB(
                color.as_mut_ptr(),
                bool_to_jxl(frame.color == ColorMode::Gray),
            );
            color.assume_init()
        };
        if unsafe { JxlEncoderSetColorEncoding(self.enc, &color) } != JxlEncoderStatus::Success {
            return Err(EncodeError::SetColorEncoding);
        }
        Ok(())
    }

    /// Submit the one input frame, then close input.
    ///
    /// Closing input is a one-way transition: the session accepts no
    /// further frames afterwards and is ready to drain. The session API is
    /// crate-private and the entry points call this exactly once, so the
    /// submit-after-close misuse cannot be expressed by callers.
    pub fn add_frame(&mut self, frame: FrameInput<'_>) -> Result<(), EncodeError> {
        let status = match frame {
            FrameInput::Raster { layout, samples } => {
                let format = JxlPixelFormat {
                    num_channels: layout.channels,
                    data_type: JxlDataType::Float,
                    endianness: JxlEndianness::Native,
                    align: 0,
                };
                unsafe {
                    JxlEncoderAddImageFrame(
                        self.settings,
                        &format,
                        samples.as_ptr().cast(),
                        std::mem::size_of_val(samples),
                    )
                }
            }
            FrameInput::Jpeg(bytes) => unsafe {
                JxlEncoderAddJPEGFrame(self.settings, bytes.as_ptr(), bytes.len())
            },
        };
        if status != JxlEncoderStatus::Success {
            return Err(EncodeError::AddFrame);
        }
        unsafe { JxlEncoderCloseInput(self.enc) };
        Ok(())
    }

    /// Drain all compressed output for the submitted frame into one
    /// contiguous buffer.
    pub fn drain(&mut self) -> Result<Vec<u8>, EncodeError> {
        let output = drain_output(self, OUTPUT_CHUNK_SIZE)?;
        log::debug!("drained {} compressed bytes", output.len());
        Ok(output)
    }
}

impl OutputSource for EncoderSession {
    fn process_output(&mut self, chunk: &mut [u8]) -> ProcessStep {
        let mut next_out = chunk.as_mut_ptr();
        let mut avail_out = chunk.len();
        let status = unsafe { JxlEncoderProcessOutput(self.enc, &mut next_out, &mut avail_out) };
        ProcessStep {
            status: match status {
                JxlEncoderStatus::Success => DrainStatus::Success,
                JxlEncoderStatus::NeedMoreOutput => DrainStatus::NeedMoreOutput,
                _ => DrainStatus::Error,
            },
            unused: avail_out,
        }
    }
}

impl Drop for EncoderSession {
    fn drop(&mut self) {
        // Runner first, then the encoder it was attached to. The
        // frame-settings handle is owned by the encoder and needs no
        // separate teardown.
        unsafe {
            if !self.runner.is_null() {
                JxlThreadParallelRunnerDestroy(self.runner);
            }
            if !self.enc.is_null() {
                JxlEncoderDestroy(self.enc);
            }
        }
    }
}

fn bool_to_jxl(value: bool) -> JxlBool {
    if value {
        JxlBool::True
    } else {
        JxlBool::False
    }
}
