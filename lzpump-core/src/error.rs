//! Error types for stream pump operations.
//!
//! Every failure of a decode run maps to exactly one variant. Decoder
//! failures carry the backend's numeric status code verbatim so callers can
//! diagnose them without a lookup table.

use crate::traits::StatusCode;
use std::io;
use thiserror::Error;

/// The main error type for LZPUMP operations.
#[derive(Debug, Error)]
pub enum PumpError {
    /// The decoder could not be created. No I/O has happened yet.
    #[error("Decoder initialization failed: status {code}{}", reason_suffix(.reason))]
    Init {
        /// Status code reported by the backend.
        code: StatusCode,
        /// Backend name for the code, if known.
        reason: Option<&'static str>,
    },

    /// Reading the compressed source failed.
    #[error("Failed to read compressed input: {0}")]
    SourceRead(#[source] io::Error),

    /// Writing or flushing the decompressed sink failed.
    #[error("Failed to write decompressed output: {0}")]
    SinkWrite(#[source] io::Error),

    /// The decoder reported a fatal status.
    #[error(
        "Decode failed: status {code}{} after {total_in} bytes in, {total_out} bytes out",
        reason_suffix(.reason)
    )]
    Decode {
        /// Status code reported by the backend.
        code: StatusCode,
        /// Backend name for the code, if known.
        reason: Option<&'static str>,
        /// Compressed bytes consumed before the failure.
        total_in: u64,
        /// Decompressed bytes produced before the failure.
        total_out: u64,
    },

    /// Configuration rejected before any decoder was created.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Malformed container header.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// I/O error outside the pump loop (opening files, reading headers).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for LZPUMP operations.
pub type Result<T> = std::result::Result<T, PumpError>;

fn reason_suffix(reason: &Option<&'static str>) -> String {
    match reason {
        Some(name) => format!(" ({name})"),
        None => String::new(),
    }
}

impl PumpError {
    /// Create a decoder initialization error.
    pub fn init(code: StatusCode, reason: Option<&'static str>) -> Self {
        Self::Init { code, reason }
    }

    /// Create a decode error.
    pub fn decode(
        code: StatusCode,
        reason: Option<&'static str>,
        total_in: u64,
        total_out: u64,
    ) -> Self {
        Self::Decode {
            code,
            reason,
            total_in,
            total_out,
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// The backend status code, for `Init` and `Decode` errors.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Init { code, .. } | Self::Decode { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the decoder rejected the compressed data.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
