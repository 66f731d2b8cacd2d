//! The bounded-chunk output-draining loop.
//!
//! After a session's input is closed, its compressed output is extracted
//! by repeatedly offering the encoder a fixed-size chunk and appending
//! whatever it wrote until it reports completion. The loop is written
//! against a narrow [`OutputSource`] seam so the bookkeeping (the part
//! where an off-by-one silently corrupts output) is testable with
//! scripted fakes instead of a live encoder.

use super::EncodeError;

/// Fixed capacity of the per-iteration output chunk, in bytes.
///
/// Deliberately small so that even tiny images exercise the
/// multi-iteration path. The value is a performance knob only: any
/// positive size produces identical output.
pub(crate) const OUTPUT_CHUNK_SIZE: usize = 64;

/// Tri-state result of one output-processing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrainStatus {
    /// All output has been flushed; the drain is complete.
    Success,
    /// More output remains; request another chunk.
    NeedMoreOutput,
    /// The encoder failed; accumulated output must be discarded.
    Error,
}

/// Outcome of one output-processing call: the status plus how many
/// trailing bytes of the offered chunk were left unused.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProcessStep {
    pub status: DrainStatus,
    pub unused: usize,
}

/// A source of compressed output that fills caller-provided chunks.
///
/// The live implementation wraps the encoder's process-output call; tests
/// substitute scripted fakes to drive the loop through every transition.
pub(crate) trait OutputSource {
    /// Write up to `chunk.len()` bytes into `chunk`, returning the drain
    /// status and the number of trailing bytes left unused.
    fn process_output(&mut self, chunk: &mut [u8]) -> ProcessStep;
}

/// Drain all compressed output from `source` into one contiguous buffer.
///
/// Each iteration offers a fresh zero-initialized chunk of `chunk_size`
/// bytes and appends exactly the written prefix (capacity minus unused)
/// to the result, so stale trailing bytes never leak into the output.
/// On [`DrainStatus::Error`] the accumulated bytes are discarded and
/// [`EncodeError::ProcessOutput`] is raised.
pub(crate) fn drain_output<S: OutputSource>(
    source: &mut S,
    chunk_size: usize,
) -> Result<Vec<u8>, EncodeError> {
    debug_assert!(chunk_size > 0, "chunk size must be positive");
    let mut output = Vec::new();
    loop {
        let mut chunk = vec![0u8; chunk_size];
        let step = source.process_output(&mut chunk);
        let written = chunk_size.saturating_sub(step.unused);
        output.extend_from_slice(&chunk[..written]);
        match step.status {
            DrainStatus::NeedMoreOutput => continue,
            DrainStatus::Success => return Ok(output),
            DrainStatus::Error => return Err(EncodeError::ProcessOutput),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed script of (status, bytes-to-write) steps.
    struct Scripted {
        steps: VecDeque<(DrainStatus, Vec<u8>)>,
    }

    impl Scripted {
        fn new(steps: Vec<(DrainStatus, Vec<u8>)>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl OutputSource for Scripted {
        fn process_output(&mut self, chunk: &mut [u8]) -> ProcessStep {
            let (status, bytes) = self
                .steps
                .pop_front()
                .expect("drain requested more iterations than scripted");
            assert!(bytes.len() <= chunk.len(), "script writes past the chunk");
            chunk[..bytes.len()].copy_from_slice(&bytes);
            ProcessStep {
                status,
                unused: chunk.len() - bytes.len(),
            }
        }
    }

    /// Serves a fixed payload, filling each chunk as far as it can.
    pub(super) struct Payload {
        data: Vec<u8>,
        pos: usize,
    }

    impl Payload {
        pub(super) fn new(data: Vec<u8>) -> Self {
            Self { data, pos: 0 }
        }
    }

    impl OutputSource for Payload {
        fn process_output(&mut self, chunk: &mut [u8]) -> ProcessStep {
            let n = chunk.len().min(self.data.len() - self.pos);
            chunk[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            let status = if self.pos == self.data.len() {
                DrainStatus::Success
            } else {
                DrainStatus::NeedMoreOutput
            };
            ProcessStep {
                status,
                unused: chunk.len() - n,
            }
        }
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 37 % 251) as u8).collect()
    }

    #[test]
    fn test_concatenates_written_prefixes_in_order() {
        let mut source = Scripted::new(vec![
            (DrainStatus::NeedMoreOutput, vec![1, 2, 3]),
            (DrainStatus::NeedMoreOutput, vec![4, 5, 6, 7]),
            (DrainStatus::Success, vec![8]),
        ]);
        let out = drain_output(&mut source, 4).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_zero_byte_iteration_appends_nothing() {
        // An iteration where the full chunk capacity comes back unused
        // must not leak zeroed chunk bytes into the output.
        let mut source = Scripted::new(vec![
            (DrainStatus::NeedMoreOutput, vec![9, 9]),
            (DrainStatus::NeedMoreOutput, vec![]),
            (DrainStatus::Success, vec![7]),
        ]);
        let out = drain_output(&mut source, 8).unwrap();
        assert_eq!(out, vec![9, 9, 7]);
    }

    #[test]
    fn test_full_chunk_boundary() {
        // Writing exactly the chunk capacity (unused == 0) is the other
        // boundary of the capacity-vs-available bookkeeping.
        let mut source = Scripted::new(vec![
            (DrainStatus::NeedMoreOutput, vec![1, 2, 3, 4]),
            (DrainStatus::Success, vec![5, 6, 7, 8]),
        ]);
        let out = drain_output(&mut source, 4).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_success_on_first_iteration() {
        let mut source = Scripted::new(vec![(DrainStatus::Success, vec![0xFF, 0x0A])]);
        let out = drain_output(&mut source, 64).unwrap();
        assert_eq!(out, vec![0xFF, 0x0A]);
    }

    #[test]
    fn test_empty_output_is_valid() {
        let mut source = Scripted::new(vec![(DrainStatus::Success, vec![])]);
        let out = drain_output(&mut source, 64).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_error_discards_accumulated_output() {
        let mut source = Scripted::new(vec![
            (DrainStatus::NeedMoreOutput, vec![1, 2, 3, 4]),
            (DrainStatus::Error, vec![5, 6]),
        ]);
        assert!(matches!(
            drain_output(&mut source, 4),
            Err(EncodeError::ProcessOutput)
        ));
    }

    #[test]
    fn test_payload_round_trips_through_default_chunk() {
        let data = pattern(1000);
        let out = drain_output(&mut Payload::new(data.clone()), OUTPUT_CHUNK_SIZE).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_chunk_size_does_not_change_output() {
        // A 1-byte chunk must terminate and reproduce byte-for-byte what
        // the default chunk size produces.
        let data = pattern(157);
        let default = drain_output(&mut Payload::new(data.clone()), OUTPUT_CHUNK_SIZE).unwrap();
        let tiny = drain_output(&mut Payload::new(data.clone()), 1).unwrap();
        assert_eq!(default, data);
        assert_eq!(tiny, default);
    }
}
