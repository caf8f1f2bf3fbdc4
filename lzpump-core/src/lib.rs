//! # LZPUMP Core
//!
//! Bounded-memory streaming decompression over an opaque decoder library.
//!
//! This crate knows nothing about any particular codec. It provides:
//!
//! - [`traits`]: the create / step / destroy contract a decoder backend implements
//! - [`session`]: a codec session owning one decoder handle and its staging buffers
//! - [`pump`]: the loop that drives a session from a reader to a writer
//! - [`config`]: chunk size and decoder limits
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ lzpump-cli     decompress / test / info                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ lzpump-lzma    liblzma backend, .lzma header, files     │
//! ├─────────────────────────────────────────────────────────┤
//! │ lzpump-core    StreamPump ─▶ CodecSession ─▶ Backend    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lzpump_core::{Action, DecoderBackend, DecoderOptions, PumpConfig, StatusCode, Step,
//!     StepStatus, StreamPump};
//!
//! /// Passes bytes through unchanged.
//! struct Passthrough;
//!
//! impl DecoderBackend for Passthrough {
//!     type Handle = ();
//!
//!     fn create(&self, _: &DecoderOptions) -> Result<(), StatusCode> {
//!         Ok(())
//!     }
//!
//!     fn step(&self, _: &mut (), input: &[u8], output: &mut [u8], action: Action) -> Step {
//!         let n = input.len().min(output.len());
//!         output[..n].copy_from_slice(&input[..n]);
//!         let done = action == Action::Finish && n == input.len();
//!         Step::new(n, n, if done { StepStatus::StreamEnd } else { StepStatus::Ok })
//!     }
//!
//!     fn destroy(&self, _: ()) {}
//! }
//!
//! let pump = StreamPump::new(Passthrough, PumpConfig::new(4));
//! let mut out = Vec::new();
//! let report = pump.run(&b"hello world"[..], &mut out).unwrap();
//! assert_eq!(out, b"hello world");
//! assert_eq!(report.total_out, 11);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod pump;
pub mod session;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use config::PumpConfig;
pub use error::{PumpError, Result};
pub use pump::{PumpReport, StreamPump};
pub use session::{CodecSession, PumpStatus, SessionTotals};
pub use traits::{Action, DecoderBackend, DecoderOptions, StatusCode, Step, StepStatus};
