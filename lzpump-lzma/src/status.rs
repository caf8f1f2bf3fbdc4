//! liblzma return codes.
//!
//! The pump loop only distinguishes OK, stream end, and "anything else". This
//! table exists so error messages can name the code.

use lzpump_core::StatusCode;

/// Operation completed successfully.
pub const OK: u32 = lzma_sys::LZMA_OK as u32;
/// End of stream was reached.
pub const STREAM_END: u32 = lzma_sys::LZMA_STREAM_END as u32;
/// Input stream has no integrity check.
pub const NO_CHECK: u32 = lzma_sys::LZMA_NO_CHECK as u32;
/// Cannot calculate the integrity check.
pub const UNSUPPORTED_CHECK: u32 = lzma_sys::LZMA_UNSUPPORTED_CHECK as u32;
/// Integrity check type is now available.
pub const GET_CHECK: u32 = lzma_sys::LZMA_GET_CHECK as u32;
/// Cannot allocate memory.
pub const MEM_ERROR: u32 = lzma_sys::LZMA_MEM_ERROR as u32;
/// Memory usage limit was reached.
pub const MEMLIMIT_ERROR: u32 = lzma_sys::LZMA_MEMLIMIT_ERROR as u32;
/// File format not recognized.
pub const FORMAT_ERROR: u32 = lzma_sys::LZMA_FORMAT_ERROR as u32;
/// Invalid or unsupported options.
pub const OPTIONS_ERROR: u32 = lzma_sys::LZMA_OPTIONS_ERROR as u32;
/// Data is corrupt.
pub const DATA_ERROR: u32 = lzma_sys::LZMA_DATA_ERROR as u32;
/// No progress is possible.
pub const BUF_ERROR: u32 = lzma_sys::LZMA_BUF_ERROR as u32;
/// Programming error.
pub const PROG_ERROR: u32 = lzma_sys::LZMA_PROG_ERROR as u32;

const TABLE: &[(u32, &str, &str)] = &[
    (OK, "LZMA_OK", "operation completed successfully"),
    (STREAM_END, "LZMA_STREAM_END", "end of stream was reached"),
    (NO_CHECK, "LZMA_NO_CHECK", "input stream has no integrity check"),
    (
        UNSUPPORTED_CHECK,
        "LZMA_UNSUPPORTED_CHECK",
        "cannot calculate the integrity check",
    ),
    (GET_CHECK, "LZMA_GET_CHECK", "integrity check type is now available"),
    (MEM_ERROR, "LZMA_MEM_ERROR", "cannot allocate memory"),
    (
        MEMLIMIT_ERROR,
        "LZMA_MEMLIMIT_ERROR",
        "memory usage limit was reached",
    ),
    (FORMAT_ERROR, "LZMA_FORMAT_ERROR", "file format not recognized"),
    (
        OPTIONS_ERROR,
        "LZMA_OPTIONS_ERROR",
        "invalid or unsupported options",
    ),
    (DATA_ERROR, "LZMA_DATA_ERROR", "compressed data is corrupt"),
    (
        BUF_ERROR,
        "LZMA_BUF_ERROR",
        "no progress is possible (truncated input?)",
    ),
    (PROG_ERROR, "LZMA_PROG_ERROR", "programming error"),
];

/// Symbolic name of a liblzma return code, e.g. `LZMA_DATA_ERROR`.
pub fn name(code: StatusCode) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(value, _, _)| *value == code.value())
        .map(|(_, name, _)| *name)
}

/// Short English description of a liblzma return code.
pub fn description(code: StatusCode) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(value, _, _)| *value == code.value())
        .map(|(_, _, text)| *text)
}
