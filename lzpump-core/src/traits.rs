//! The decoder backend contract.
//!
//! A backend is the narrow capability the pump loop needs from a foreign
//! decompression library: create a decoder, step it over a pair of buffers,
//! and destroy it. The decoder state itself is an opaque handle whose layout
//! never leaks out of the backend.

use std::fmt;

/// Whether more input may still arrive after the bytes handed to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// More input may follow.
    #[default]
    Run,
    /// The source is exhausted; the decoder should finish the stream.
    Finish,
}

/// A numeric status code reported verbatim by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u32);

impl StatusCode {
    /// Get the raw code value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StatusCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// Outcome class of a single decoder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Progress was made (or is possible); call again.
    Ok,
    /// The whole logical stream has been decoded.
    StreamEnd,
    /// The decoder failed. Its state must not be stepped again.
    Fatal(StatusCode),
}

/// Result of a single decoder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Bytes consumed from the front of the input slice.
    pub consumed: usize,
    /// Bytes written to the front of the output slice.
    pub produced: usize,
    /// Outcome class.
    pub status: StepStatus,
}

impl Step {
    /// Create a step result.
    pub fn new(consumed: usize, produced: usize, status: StepStatus) -> Self {
        Self {
            consumed,
            produced,
            status,
        }
    }
}

/// Options passed to [`DecoderBackend::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Upper bound on decoder memory usage, in bytes.
    pub memlimit: u64,
    /// Backend-specific decoder flags.
    pub flags: u32,
}

/// A foreign decoder reached through a create / step / destroy contract.
///
/// Handles are plain values: the backend never releases one on its own.
/// Whoever holds a handle must pass it to [`destroy`](Self::destroy) exactly
/// once and must not step it after a [`StepStatus::Fatal`].
pub trait DecoderBackend {
    /// Opaque decoder state.
    type Handle;

    /// Allocate and initialise a decoder.
    fn create(&self, options: &DecoderOptions) -> Result<Self::Handle, StatusCode>;

    /// Run the decoder once over `input` and `output`.
    ///
    /// # Arguments
    ///
    /// * `handle` - A live decoder
    /// * `input` - Compressed bytes still available
    /// * `output` - Free space for decompressed bytes
    /// * `action` - Whether more input may follow
    fn step(
        &self,
        handle: &mut Self::Handle,
        input: &[u8],
        output: &mut [u8],
        action: Action,
    ) -> Step;

    /// Release a decoder.
    fn destroy(&self, handle: Self::Handle);

    /// Human-readable name for a status code, if the backend knows one.
    fn describe(&self, code: StatusCode) -> Option<&'static str> {
        let _ = code;
        None
    }
}

impl<B: DecoderBackend + ?Sized> DecoderBackend for &B {
    type Handle = B::Handle;

    fn create(&self, options: &DecoderOptions) -> Result<Self::Handle, StatusCode> {
        (**self).create(options)
    }

    fn step(
        &self,
        handle: &mut Self::Handle,
        input: &[u8],
        output: &mut [u8],
        action: Action,
    ) -> Step {
        (**self).step(handle, input, output, action)
    }

    fn destroy(&self, handle: Self::Handle) {
        (**self).destroy(handle)
    }

    fn describe(&self, code: StatusCode) -> Option<&'static str> {
        (**self).describe(code)
    }
}
