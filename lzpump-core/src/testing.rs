//! Test doubles: an instrumented pass-through backend and misbehaving I/O.

use crate::traits::{Action, DecoderBackend, DecoderOptions, StatusCode, Step, StepStatus};
use std::cell::Cell;
use std::io::{self, Read, Write};

/// Byte the fake decoder rejects as corrupt.
pub const CORRUPT_BYTE: u8 = 0xFF;

/// Handle issued by [`FakeBackend`].
#[derive(Debug)]
pub struct FakeHandle;

/// A "decoder" that copies input to output verbatim and counts every call.
///
/// The stream ends once all input has been copied under [`Action::Finish`].
/// Any [`CORRUPT_BYTE`] in the input is a fatal data error.
#[derive(Debug, Default)]
pub struct FakeBackend {
    fail_create: Option<u32>,
    created: Cell<usize>,
    destroyed: Cell<usize>,
    steps: Cell<usize>,
}

impl FakeBackend {
    pub const DATA_ERROR: u32 = 9;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_create(code: u32) -> Self {
        Self {
            fail_create: Some(code),
            ..Self::default()
        }
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.get()
    }

    pub fn steps(&self) -> usize {
        self.steps.get()
    }
}

impl DecoderBackend for FakeBackend {
    type Handle = FakeHandle;

    fn create(&self, _options: &DecoderOptions) -> Result<FakeHandle, StatusCode> {
        if let Some(code) = self.fail_create {
            return Err(StatusCode(code));
        }
        self.created.set(self.created.get() + 1);
        Ok(FakeHandle)
    }

    fn step(
        &self,
        _handle: &mut FakeHandle,
        input: &[u8],
        output: &mut [u8],
        action: Action,
    ) -> Step {
        self.steps.set(self.steps.get() + 1);

        let len = input.len().min(output.len());
        if let Some(pos) = input[..len].iter().position(|&b| b == CORRUPT_BYTE) {
            output[..pos].copy_from_slice(&input[..pos]);
            return Step::new(pos, pos, StepStatus::Fatal(StatusCode(Self::DATA_ERROR)));
        }
        output[..len].copy_from_slice(&input[..len]);

        let status = if action == Action::Finish && len == input.len() {
            StepStatus::StreamEnd
        } else {
            StepStatus::Ok
        };
        Step::new(len, len, status)
    }

    fn destroy(&self, _handle: FakeHandle) {
        self.destroyed.set(self.destroyed.get() + 1);
    }

    fn describe(&self, code: StatusCode) -> Option<&'static str> {
        (code.0 == Self::DATA_ERROR).then_some("FAKE_DATA_ERROR")
    }
}

/// Reader that hands out one byte per call and is interrupted once up front.
pub struct TrickleReader {
    data: Vec<u8>,
    pos: usize,
    interrupted: bool,
}

impl TrickleReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            pos: 0,
            interrupted: false,
        }
    }
}

impl Read for TrickleReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.interrupted {
            self.interrupted = true;
            return Err(io::ErrorKind::Interrupted.into());
        }
        if buf.is_empty() || self.pos >= self.data.len() {
            return Ok(0);
        }
        buf[0] = self.data[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

/// Reader that yields `ok_bytes` bytes of data, then fails.
pub struct FailingReader {
    remaining: usize,
    reads: usize,
}

impl FailingReader {
    pub fn new(ok_bytes: usize) -> Self {
        Self {
            remaining: ok_bytes,
            reads: 0,
        }
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        if self.remaining == 0 {
            return Err(io::Error::other("device unplugged"));
        }
        let len = buf.len().min(self.remaining);
        buf[..len].fill(b'x');
        self.remaining -= len;
        Ok(len)
    }
}

/// Writer that accepts `capacity` bytes, then fails.
pub struct FailingWriter {
    capacity: usize,
    pub written: Vec<u8>,
}

impl FailingWriter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            written: Vec::new(),
        }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.capacity - self.written.len();
        if room == 0 {
            return Err(io::Error::other("disk full"));
        }
        let len = buf.len().min(room);
        self.written.extend_from_slice(&buf[..len]);
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
