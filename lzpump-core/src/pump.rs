//! The stream pump loop.
//!
//! [`StreamPump::run`] drives a [`CodecSession`] from a source reader to a
//! sink writer one chunk at a time:
//!
//! ```text
//!   source ──read ≤C──▶ input buf ──step──▶ output buf ──write──▶ sink
//!                          ▲                     │
//!                          └─ refill when empty  └─ drain when full / at end
//! ```
//!
//! Memory use is two buffers of `chunk_size` bytes plus whatever the backend
//! allocates, regardless of stream length.

use crate::config::PumpConfig;
use crate::error::{PumpError, Result};
use crate::session::{CodecSession, PumpStatus};
use crate::traits::{Action, DecoderBackend};
use std::io::{Read, Write};

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Compressed bytes consumed.
    pub total_in: u64,
    /// Decompressed bytes written to the sink.
    pub total_out: u64,
    /// Source reads issued (including the final short or empty one).
    pub chunks_read: u64,
    /// Non-empty writes issued to the sink.
    pub chunks_written: u64,
    /// Decoder steps taken.
    pub steps: u64,
}

impl PumpReport {
    /// Decompressed-to-compressed size ratio, `0.0` for empty input.
    pub fn expansion_ratio(&self) -> f64 {
        if self.total_in == 0 {
            0.0
        } else {
            self.total_out as f64 / self.total_in as f64
        }
    }
}

/// Drives a decoder backend over readers and writers with bounded buffers.
///
/// A pump can be run any number of times; every run gets a fresh session.
#[derive(Debug, Clone)]
pub struct StreamPump<B: DecoderBackend> {
    backend: B,
    config: PumpConfig,
}

impl<B: DecoderBackend> StreamPump<B> {
    /// Create a pump over `backend`.
    pub fn new(backend: B, config: PumpConfig) -> Self {
        Self { backend, config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// Get the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Decode everything from `source` into `sink`.
    ///
    /// On success the sink has been flushed and holds the complete output.
    /// On failure the decoder has already been released and the sink may
    /// hold a truncated prefix of the output.
    ///
    /// # Errors
    ///
    /// - [`PumpError::InvalidConfig`] for a zero or oversized chunk size
    /// - [`PumpError::Init`] if the decoder cannot be created
    /// - [`PumpError::SourceRead`] / [`PumpError::SinkWrite`] on I/O failure
    /// - [`PumpError::Decode`] if the decoder reports a fatal status
    pub fn run<R, W>(&self, mut source: R, mut sink: W) -> Result<PumpReport>
    where
        R: Read,
        W: Write,
    {
        self.config.validate()?;

        let mut session = CodecSession::start(
            &self.backend,
            &self.config.decoder_options(),
            self.config.chunk_size,
        )?;
        let mut action = Action::Run;
        let mut report = PumpReport::default();

        loop {
            if session.avail_in() == 0 && action == Action::Run {
                let read = session
                    .refill(&mut source)
                    .map_err(PumpError::SourceRead)?;
                report.chunks_read += 1;
                if read < session.chunk_size() {
                    action = Action::Finish;
                }
            }

            let status = session.pump(action);
            report.steps += 1;

            if status.needs_drain() {
                let produced = session.drain();
                if !produced.is_empty() {
                    sink.write_all(produced).map_err(PumpError::SinkWrite)?;
                    report.chunks_written += 1;
                }
            }

            match status {
                PumpStatus::StreamEnd => {
                    sink.flush().map_err(PumpError::SinkWrite)?;
                    let totals = session.finish();
                    report.total_in = totals.total_in;
                    report.total_out = totals.total_out;
                    return Ok(report);
                }
                PumpStatus::Fatal(code) => {
                    let err = PumpError::decode(
                        code,
                        self.backend.describe(code),
                        session.total_in(),
                        session.total_out(),
                    );
                    session.finish();
                    return Err(err);
                }
                PumpStatus::Progress | PumpStatus::OutputFull => {}
            }
        }
    }
}
