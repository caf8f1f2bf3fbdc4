//! liblzma decoder backend.
//!
//! This is the only module in the workspace that touches `unsafe` code. The
//! foreign `lzma_stream` is wrapped in [`LzmaHandle`], whose layout is never
//! exposed; the pump loop sees it only through [`DecoderBackend`].

use crate::status;
use lzpump_core::{Action, DecoderBackend, DecoderOptions, StatusCode, Step, StepStatus};
use std::fmt;
use std::mem;
use std::ptr;

/// Decoder flags accepted by the `.xz` and auto-detecting decoders.
///
/// The legacy `.lzma` decoder takes no flags and ignores them.
pub mod flags {
    /// Report streams without an integrity check via `LZMA_NO_CHECK`.
    pub const TELL_NO_CHECK: u32 = lzma_sys::LZMA_TELL_NO_CHECK;
    /// Report unsupported check types via `LZMA_UNSUPPORTED_CHECK`.
    pub const TELL_UNSUPPORTED_CHECK: u32 = lzma_sys::LZMA_TELL_UNSUPPORTED_CHECK;
    /// Report the check type via `LZMA_GET_CHECK`.
    pub const TELL_ANY_CHECK: u32 = lzma_sys::LZMA_TELL_ANY_CHECK;
    /// Decode concatenated `.xz` streams as one.
    pub const CONCATENATED: u32 = lzma_sys::LZMA_CONCATENATED;
}

/// Container framing expected by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LzmaFormat {
    /// Legacy `.lzma` ("LZMA_Alone") single-stream format.
    #[default]
    Alone,
    /// `.xz` container format.
    Xz,
    /// Detect `.xz` or `.lzma` from the first bytes.
    Auto,
}

impl LzmaFormat {
    /// Get the format name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Alone => "lzma",
            Self::Xz => "xz",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for LzmaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An initialised liblzma decoder.
pub struct LzmaHandle {
    raw: lzma_sys::lzma_stream,
}

impl LzmaHandle {
    /// Compressed bytes consumed by liblzma.
    pub fn total_in(&self) -> u64 {
        self.raw.total_in
    }

    /// Decompressed bytes produced by liblzma.
    pub fn total_out(&self) -> u64 {
        self.raw.total_out
    }
}

impl fmt::Debug for LzmaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LzmaHandle")
            .field("total_in", &self.raw.total_in)
            .field("total_out", &self.raw.total_out)
            .finish_non_exhaustive()
    }
}

/// Decoder backend calling into liblzma.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LzmaBackend {
    format: LzmaFormat,
}

impl LzmaBackend {
    /// Create a backend for the given container format.
    pub fn new(format: LzmaFormat) -> Self {
        Self { format }
    }

    /// Backend for legacy `.lzma` streams.
    pub fn alone() -> Self {
        Self::new(LzmaFormat::Alone)
    }

    /// Backend for `.xz` streams.
    pub fn xz() -> Self {
        Self::new(LzmaFormat::Xz)
    }

    /// Backend that auto-detects `.xz` or `.lzma`.
    pub fn auto() -> Self {
        Self::new(LzmaFormat::Auto)
    }

    /// Get the container format.
    pub fn format(&self) -> LzmaFormat {
        self.format
    }
}

fn action_code(action: Action) -> lzma_sys::lzma_action {
    match action {
        Action::Run => lzma_sys::LZMA_RUN,
        Action::Finish => lzma_sys::LZMA_FINISH,
    }
}

impl DecoderBackend for LzmaBackend {
    type Handle = LzmaHandle;

    fn create(&self, options: &DecoderOptions) -> Result<LzmaHandle, StatusCode> {
        // SAFETY: an all-zero lzma_stream is LZMA_STREAM_INIT.
        let mut handle = LzmaHandle {
            raw: unsafe { mem::zeroed() },
        };

        // SAFETY: `handle.raw` is a valid, initialised lzma_stream.
        let ret = unsafe {
            match self.format {
                LzmaFormat::Alone => lzma_sys::lzma_alone_decoder(&mut handle.raw, options.memlimit),
                LzmaFormat::Xz => lzma_sys::lzma_stream_decoder(
                    &mut handle.raw,
                    options.memlimit,
                    options.flags,
                ),
                LzmaFormat::Auto => {
                    lzma_sys::lzma_auto_decoder(&mut handle.raw, options.memlimit, options.flags)
                }
            }
        };

        if ret != lzma_sys::LZMA_OK {
            // SAFETY: lzma_end accepts a stream whose initialisation failed.
            unsafe { lzma_sys::lzma_end(&mut handle.raw) };
            return Err(StatusCode(ret as u32));
        }
        Ok(handle)
    }

    fn step(
        &self,
        handle: &mut LzmaHandle,
        input: &[u8],
        output: &mut [u8],
        action: Action,
    ) -> Step {
        let raw = &mut handle.raw;
        raw.next_in = input.as_ptr();
        raw.avail_in = input.len();
        raw.next_out = output.as_mut_ptr();
        raw.avail_out = output.len();

        // SAFETY: next_in/next_out point into slices that outlive the call and
        // avail_in/avail_out match their lengths.
        let ret = unsafe { lzma_sys::lzma_code(raw, action_code(action)) };

        let consumed = input.len() - raw.avail_in;
        let produced = output.len() - raw.avail_out;

        // Do not keep pointers to the caller's buffers past this call.
        raw.next_in = ptr::null();
        raw.avail_in = 0;
        raw.next_out = ptr::null_mut();
        raw.avail_out = 0;

        let status = match ret {
            lzma_sys::LZMA_OK => StepStatus::Ok,
            lzma_sys::LZMA_STREAM_END => StepStatus::StreamEnd,
            code => StepStatus::Fatal(StatusCode(code as u32)),
        };
        Step::new(consumed, produced, status)
    }

    fn destroy(&self, mut handle: LzmaHandle) {
        // SAFETY: the handle came from a successful `create` and is consumed here.
        unsafe { lzma_sys::lzma_end(&mut handle.raw) };
    }

    fn describe(&self, code: StatusCode) -> Option<&'static str> {
        status::name(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use xz2::stream::{LzmaOptions, Stream};
    use xz2::write::XzEncoder;

    fn lzma_alone(data: &[u8]) -> Vec<u8> {
        let options = LzmaOptions::new_preset(6).unwrap();
        let stream = Stream::new_lzma_encoder(&options).unwrap();
        let mut encoder = XzEncoder::new_stream(Vec::new(), stream);
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn options() -> DecoderOptions {
        DecoderOptions {
            memlimit: u64::MAX,
            flags: 0,
        }
    }

    #[test]
    fn test_single_step_decode() {
        let compressed = lzma_alone(b"hello world");
        let backend = LzmaBackend::alone();
        let mut handle = backend.create(&options()).unwrap();
        let mut out = [0u8; 64];

        let step = backend.step(&mut handle, &compressed, &mut out, Action::Finish);
        assert_eq!(step.status, StepStatus::StreamEnd);
        assert!(step.consumed <= compressed.len());
        assert_eq!(&out[..step.produced], b"hello world");
        assert_eq!(handle.total_out(), 11);

        backend.destroy(handle);
    }

    #[test]
    fn test_output_limited_step() {
        let compressed = lzma_alone(b"hello world");
        let backend = LzmaBackend::alone();
        let mut handle = backend.create(&options()).unwrap();
        let mut out = [0u8; 4];

        let step = backend.step(&mut handle, &compressed, &mut out, Action::Finish);
        assert_eq!(step.status, StepStatus::Ok);
        assert_eq!(step.produced, 4);
        assert_eq!(&out, b"hell");

        backend.destroy(handle);
    }

    #[test]
    fn test_bad_props_is_format_error() {
        let backend = LzmaBackend::alone();
        let mut handle = backend.create(&options()).unwrap();
        let mut out = [0u8; 16];
        // Properties byte 0xFF is out of range.
        let input = [0xFFu8; 13];

        let step = backend.step(&mut handle, &input, &mut out, Action::Finish);
        assert_eq!(
            step.status,
            StepStatus::Fatal(StatusCode(status::FORMAT_ERROR))
        );

        backend.destroy(handle);
    }

    #[test]
    fn test_unsupported_flags_fail_create() {
        let backend = LzmaBackend::xz();
        let err = backend
            .create(&DecoderOptions {
                memlimit: u64::MAX,
                flags: 0x8000_0000,
            })
            .unwrap_err();

        assert_eq!(err, StatusCode(status::OPTIONS_ERROR));
        assert_eq!(backend.describe(err), Some("LZMA_OPTIONS_ERROR"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(LzmaFormat::default(), LzmaFormat::Alone);
        assert_eq!(LzmaFormat::Xz.to_string(), "xz");
        assert_eq!(LzmaBackend::auto().format(), LzmaFormat::Auto);
    }
}
