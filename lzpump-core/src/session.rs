//! Codec session: one decode run's decoder handle, staging buffers, and
//! byte counters.
//!
//! The session owns its decoder handle. [`CodecSession::finish`] consumes the
//! session and releases the handle; any other way of leaving scope releases
//! it from `Drop`. Either way the backend sees exactly one `destroy` per
//! successful `create`.

use crate::config::PumpConfig;
use crate::error::{PumpError, Result};
use crate::traits::{Action, DecoderBackend, DecoderOptions, StatusCode, StepStatus};
use std::io::{self, Read};

/// Outcome of a single [`CodecSession::pump`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStatus {
    /// The decoder advanced; it may need more input.
    Progress,
    /// The output buffer is full and must be drained before pumping again.
    OutputFull,
    /// The stream is complete.
    StreamEnd,
    /// The decoder failed with the given status.
    Fatal(StatusCode),
}

impl PumpStatus {
    /// Whether produced bytes must be written out after this status.
    pub fn needs_drain(&self) -> bool {
        matches!(self, Self::OutputFull | Self::StreamEnd)
    }
}

/// Byte counters reported when a session finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTotals {
    /// Compressed bytes consumed by the decoder.
    pub total_in: u64,
    /// Decompressed bytes produced by the decoder.
    pub total_out: u64,
}

/// A decoder handle together with its fixed-size staging buffers.
pub struct CodecSession<B: DecoderBackend> {
    backend: B,
    /// `None` only once the handle has been released.
    handle: Option<B::Handle>,
    /// Set by the first fatal step; the handle is never stepped again.
    fatal: Option<StatusCode>,
    input: Box<[u8]>,
    /// Length of the currently staged input.
    staged: usize,
    avail_in: usize,
    output: Box<[u8]>,
    avail_out: usize,
    total_in: u64,
    total_out: u64,
}

impl<B: DecoderBackend> CodecSession<B> {
    /// Allocate two staging buffers of `chunk_size` bytes each, then create
    /// the decoder.
    pub fn start(backend: B, options: &DecoderOptions, chunk_size: usize) -> Result<Self> {
        PumpConfig::new(chunk_size).validate()?;

        // Buffers first: nothing below may fail while a handle is unowned.
        let input = vec![0u8; chunk_size].into_boxed_slice();
        let output = vec![0u8; chunk_size].into_boxed_slice();

        let handle = backend
            .create(options)
            .map_err(|code| PumpError::init(code, backend.describe(code)))?;

        Ok(Self {
            backend,
            handle: Some(handle),
            fatal: None,
            input,
            staged: 0,
            avail_in: 0,
            output,
            avail_out: chunk_size,
            total_in: 0,
            total_out: 0,
        })
    }

    /// Capacity of each staging buffer.
    pub fn chunk_size(&self) -> usize {
        self.input.len()
    }

    /// Staged input bytes the decoder has not consumed yet.
    pub fn avail_in(&self) -> usize {
        self.avail_in
    }

    /// Free space left in the output buffer.
    pub fn avail_out(&self) -> usize {
        self.avail_out
    }

    /// Decompressed bytes waiting in the output buffer.
    pub fn pending_out(&self) -> usize {
        self.output.len() - self.avail_out
    }

    /// Compressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Copy up to one chunk of `bytes` into the input buffer.
    ///
    /// Returns the number of bytes staged. The previous input must have been
    /// consumed completely.
    pub fn stage_input(&mut self, bytes: &[u8]) -> usize {
        debug_assert_eq!(self.avail_in, 0, "staged input not fully consumed");

        let len = bytes.len().min(self.input.len());
        self.input[..len].copy_from_slice(&bytes[..len]);
        self.staged = len;
        self.avail_in = len;
        len
    }

    /// Read the next chunk from `source` straight into the input buffer.
    ///
    /// Keeps reading until the buffer is full or the source returns zero
    /// bytes, so a result smaller than [`chunk_size`](Self::chunk_size)
    /// means the source is exhausted.
    pub fn refill<R: Read + ?Sized>(&mut self, source: &mut R) -> io::Result<usize> {
        debug_assert_eq!(self.avail_in, 0, "staged input not fully consumed");

        let len = read_chunk(source, &mut self.input)?;
        self.staged = len;
        self.avail_in = len;
        Ok(len)
    }

    /// Step the decoder once over the staged input and free output space.
    pub fn pump(&mut self, action: Action) -> PumpStatus {
        if let Some(code) = self.fatal {
            return PumpStatus::Fatal(code);
        }
        let Some(handle) = self.handle.as_mut() else {
            unreachable!("decoder handle used after release");
        };

        let in_start = self.staged - self.avail_in;
        let out_start = self.output.len() - self.avail_out;
        let step = self.backend.step(
            handle,
            &self.input[in_start..self.staged],
            &mut self.output[out_start..],
            action,
        );

        debug_assert!(step.consumed <= self.avail_in);
        debug_assert!(step.produced <= self.avail_out);
        let consumed = step.consumed.min(self.avail_in);
        let produced = step.produced.min(self.avail_out);

        self.avail_in -= consumed;
        self.avail_out -= produced;
        self.total_in += consumed as u64;
        self.total_out += produced as u64;

        match step.status {
            StepStatus::Fatal(code) => {
                self.fatal = Some(code);
                PumpStatus::Fatal(code)
            }
            StepStatus::StreamEnd => PumpStatus::StreamEnd,
            StepStatus::Ok if self.avail_out == 0 => PumpStatus::OutputFull,
            StepStatus::Ok => PumpStatus::Progress,
        }
    }

    /// Take the produced bytes and mark the whole output buffer free again.
    ///
    /// The buffer contents are not cleared; only the accounting is reset.
    pub fn drain(&mut self) -> &[u8] {
        let produced = self.pending_out();
        self.avail_out = self.output.len();
        &self.output[..produced]
    }

    /// Release the decoder and return the byte counters.
    pub fn finish(mut self) -> SessionTotals {
        self.release();
        SessionTotals {
            total_in: self.total_in,
            total_out: self.total_out,
        }
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.backend.destroy(handle);
        }
    }
}

impl<B: DecoderBackend> Drop for CodecSession<B> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Fill `buf` from `source`, stopping early only at end of input.
fn read_chunk<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
