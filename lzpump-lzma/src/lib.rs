//! # LZPUMP LZMA
//!
//! Streaming `.lzma` / `.xz` decompression through liblzma.
//!
//! The compression algorithm itself lives in liblzma. This crate adapts it
//! to the [`DecoderBackend`](lzpump_core::DecoderBackend) contract and adds
//! convenience entry points on top of [`StreamPump`].
//!
//! ## Usage
//!
//! ### Reader to writer
//!
//! ```ignore
//! use lzpump_lzma::decompress;
//!
//! let input = std::fs::File::open("data.lzma")?;
//! let output = std::fs::File::create("data")?;
//! let report = decompress(input, output)?;
//! println!("{} -> {} bytes", report.total_in, report.total_out);
//! ```
//!
//! ### Files, other formats, custom limits
//!
//! ```ignore
//! use lzpump_lzma::{LzmaFormat, PumpConfig, decompress_file};
//!
//! let config = PumpConfig::new(64 * 1024).with_memlimit(64 << 20);
//! decompress_file("data.xz".as_ref(), "data".as_ref(), &config, LzmaFormat::Xz)?;
//! ```
//!
//! ## Memory
//!
//! Each run allocates two staging buffers of `chunk_size` bytes plus the
//! liblzma decoder state (dominated by the dictionary). The decoder is
//! refused by liblzma with `LZMA_MEMLIMIT_ERROR` if the stream needs more
//! than [`PumpConfig::memlimit`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ffi;
pub mod header;
pub mod status;

// Re-exports
pub use ffi::{LzmaBackend, LzmaFormat, LzmaHandle, flags};
pub use header::{HEADER_SIZE, LzmaHeader, LzmaProperties};
pub use lzpump_core::{PumpConfig, PumpError, PumpReport, Result, StreamPump};

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A stream pump over liblzma.
pub type LzmaPump = StreamPump<LzmaBackend>;

/// Create a pump for `format` with `config`.
pub fn pump(format: LzmaFormat, config: PumpConfig) -> LzmaPump {
    StreamPump::new(LzmaBackend::new(format), config)
}

/// Decompress a legacy `.lzma` stream from `reader` into `writer` using the
/// default configuration.
pub fn decompress<R: Read, W: Write>(reader: R, writer: W) -> Result<PumpReport> {
    decompress_with(reader, writer, &PumpConfig::default(), LzmaFormat::Alone)
}

/// Decompress from `reader` into `writer` with an explicit configuration and
/// container format.
pub fn decompress_with<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &PumpConfig,
    format: LzmaFormat,
) -> Result<PumpReport> {
    pump(format, *config).run(reader, writer)
}

/// Decompress an in-memory `.lzma` stream to a Vec.
///
/// This is a convenience wrapper around [`decompress`] for small payloads.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress(data, &mut output)?;
    Ok(output)
}

/// Decompress the file at `src` into a freshly created file at `dst`.
///
/// `dst` is created or truncated, never appended to. If decoding fails the
/// partial output is left in place.
pub fn decompress_file(
    src: &Path,
    dst: &Path,
    config: &PumpConfig,
    format: LzmaFormat,
) -> Result<PumpReport> {
    let source = File::open(src)?;
    let sink = File::create(dst)?;
    decompress_with(source, sink, config, format)
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

    #[test]
    fn test_decompress_bytes_hello() {
        let compressed = lzma_alone(b"Hello");
        assert_eq!(decompress_bytes(&compressed).unwrap(), b"Hello");
    }

    #[test]
    fn test_decompress_reports_sizes() {
        let original = vec![b'A'; 1000];
        let compressed = lzma_alone(&original);
        let mut out = Vec::new();

        let report = decompress(&compressed[..], &mut out).unwrap();
        assert_eq!(out, original);
        assert_eq!(report.total_out, 1000);
        assert!(report.total_in > HEADER_SIZE as u64);
        assert!(report.total_in <= compressed.len() as u64);
    }

    #[test]
    fn test_pump_reusable() {
        let p = pump(LzmaFormat::Alone, PumpConfig::new(7));
        for text in [&b"one"[..], b"two two", b""] {
            let compressed = lzma_alone(text);
            let mut out = Vec::new();
            p.run(&compressed[..], &mut out).unwrap();
            assert_eq!(out, text);
        }
    }
}
