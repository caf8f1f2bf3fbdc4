//! Legacy `.lzma` header inspection.
//!
//! A `.lzma` ("LZMA_Alone") stream starts with a 13-byte header:
//!
//! | offset | size | field                                           |
//! |--------|------|-------------------------------------------------|
//! | 0      | 1    | properties byte (`(pb * 5 + lp) * 9 + lc`)      |
//! | 1      | 4    | dictionary size, little-endian                  |
//! | 5      | 8    | uncompressed size, little-endian, `!0` = unknown |
//!
//! Decoding is left to liblzma; this module only reads the header so callers
//! can report it and size the decoder memory limit.

use lzpump_core::error::{PumpError, Result};
use std::io::{self, Read};

/// Size of the `.lzma` header in bytes.
pub const HEADER_SIZE: usize = 13;

/// Uncompressed size value meaning "unknown, terminated by an end marker".
pub const UNKNOWN_SIZE: u64 = u64::MAX;

/// Approximate fixed overhead of a liblzma LZMA1 decoder, excluding the
/// dictionary and literal coder probabilities.
const DECODER_BASE_MEMORY: u64 = 32 * 1024;

/// LZMA literal/position model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzmaProperties {
    /// Literal context bits (0-8).
    pub lc: u32,
    /// Literal position bits (0-4).
    pub lp: u32,
    /// Position bits (0-4).
    pub pb: u32,
}

impl LzmaProperties {
    /// Largest valid properties byte (`lc = 8, lp = 4, pb = 4`).
    pub const MAX_BYTE: u8 = (4 * 5 + 4) * 9 + 8;

    /// Create new properties.
    pub fn new(lc: u32, lp: u32, pb: u32) -> Self {
        Self { lc, lp, pb }
    }

    /// Split a properties byte into `lc`, `lp` and `pb`.
    ///
    /// Returns `None` for bytes above [`MAX_BYTE`](Self::MAX_BYTE), the only
    /// ones whose `pb` would exceed 4.
    pub fn from_byte(byte: u8) -> Option<Self> {
        (byte <= Self::MAX_BYTE).then(|| {
            let value = u32::from(byte);
            Self {
                lc: value % 9,
                lp: value / 9 % 5,
                pb: value / 45,
            }
        })
    }

    /// Pack into a properties byte.
    pub fn to_byte(&self) -> u8 {
        ((self.pb * 5 + self.lp) * 9 + self.lc) as u8
    }
}

/// Parsed `.lzma` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzmaHeader {
    /// Model parameters.
    pub properties: LzmaProperties,
    /// Dictionary size in bytes.
    pub dict_size: u32,
    /// Declared uncompressed size, `None` if the stream ends with a marker.
    pub uncompressed_size: Option<u64>,
}

impl LzmaHeader {
    /// Parse a header from the first [`HEADER_SIZE`] bytes of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(PumpError::invalid_header(format!(
                "need {} header bytes, have {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let properties = LzmaProperties::from_byte(bytes[0]).ok_or_else(|| {
            PumpError::invalid_header(format!(
                "properties byte {:#04x} is above {:#04x}",
                bytes[0],
                LzmaProperties::MAX_BYTE
            ))
        })?;

        let mut dict_buf = [0u8; 4];
        dict_buf.copy_from_slice(&bytes[1..5]);
        let dict_size = u32::from_le_bytes(dict_buf);

        let mut size_buf = [0u8; 8];
        size_buf.copy_from_slice(&bytes[5..HEADER_SIZE]);
        let size = u64::from_le_bytes(size_buf);

        Ok(Self {
            properties,
            dict_size,
            uncompressed_size: (size != UNKNOWN_SIZE).then_some(size),
        })
    }

    /// Read and parse the header from the start of `reader`.
    ///
    /// Consumes exactly [`HEADER_SIZE`] bytes on success.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                PumpError::invalid_header("file is shorter than an LZMA header")
            } else {
                PumpError::Io(e)
            }
        })?;
        Self::parse(&buf)
    }

    /// Serialize the header back to its 13-byte form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0] = self.properties.to_byte();
        out[1..5].copy_from_slice(&self.dict_size.to_le_bytes());
        out[5..].copy_from_slice(
            &self
                .uncompressed_size
                .unwrap_or(UNKNOWN_SIZE)
                .to_le_bytes(),
        );
        out
    }

    /// Whether the dictionary size is `2^n` or `2^n + 2^(n-1)`, as every
    /// standard encoder writes it.
    pub fn has_standard_dict_size(&self) -> bool {
        let d = self.dict_size;
        if d == u32::MAX {
            return true;
        }
        let top = 31 - d.leading_zeros().min(31);
        let pow = 1u32 << top;
        d == pow || (top > 0 && d == pow + (pow >> 1))
    }

    /// Approximate memory liblzma needs to decode this stream.
    ///
    /// Useful for choosing a memory limit before decoding.
    pub fn estimated_memory(&self) -> u64 {
        let literal_states = 1u64 << (self.properties.lc + self.properties.lp);
        let literal_probs = literal_states * 0x300 * 2;
        self.dict_size as u64 + literal_probs + DECODER_BASE_MEMORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(props: u8, dict: u32, size: u64) -> Vec<u8> {
        let mut v = vec![props];
        v.extend_from_slice(&dict.to_le_bytes());
        v.extend_from_slice(&size.to_le_bytes());
        v
    }

    #[test]
    fn test_properties_roundtrip() {
        let props = LzmaProperties::new(3, 0, 2);
        assert_eq!(props.to_byte(), 0x5D);
        assert_eq!(LzmaProperties::from_byte(0x5D), Some(props));
    }

    #[test]
    fn test_properties_out_of_range() {
        assert_eq!(LzmaProperties::MAX_BYTE, 224);
        assert_eq!(
            LzmaProperties::from_byte(224),
            Some(LzmaProperties::new(8, 4, 4))
        );
        assert_eq!(LzmaProperties::from_byte(225), None);
        assert_eq!(LzmaProperties::from_byte(0xFF), None);

        let err = LzmaHeader::parse(&header_bytes(225, 1 << 16, u64::MAX)).unwrap_err();
        assert!(matches!(err, PumpError::InvalidHeader { .. }));
        assert!(err.to_string().contains("0xe1"));
    }

    #[test]
    fn test_every_valid_byte_roundtrips() {
        for byte in 0..=LzmaProperties::MAX_BYTE {
            let props = LzmaProperties::from_byte(byte).unwrap();
            assert!(props.lc <= 8 && props.lp <= 4 && props.pb <= 4);
            assert_eq!(props.to_byte(), byte);
        }
    }

    #[test]
    fn test_parse_unknown_size() {
        let header = LzmaHeader::parse(&header_bytes(0x5D, 1 << 23, u64::MAX)).unwrap();
        assert_eq!(header.properties, LzmaProperties::new(3, 0, 2));
        assert_eq!(header.dict_size, 1 << 23);
        assert_eq!(header.uncompressed_size, None);
        assert!(header.has_standard_dict_size());
    }

    #[test]
    fn test_parse_known_size() {
        let bytes = header_bytes(0x5D, 3 << 20, 11);
        let header = LzmaHeader::parse(&bytes).unwrap();
        assert_eq!(header.uncompressed_size, Some(11));
        assert!(header.has_standard_dict_size());
        assert_eq!(header.to_bytes().as_slice(), bytes.as_slice());
    }

    #[test]
    fn test_nonstandard_dict_size() {
        let header = LzmaHeader::parse(&header_bytes(0x5D, 1_000_000, u64::MAX)).unwrap();
        assert!(!header.has_standard_dict_size());
    }

    #[test]
    fn test_parse_short_input() {
        let err = LzmaHeader::parse(&[0x5D, 0, 0]).unwrap_err();
        assert!(matches!(err, PumpError::InvalidHeader { .. }));

        let err = LzmaHeader::read_from(&[0x5D, 0, 0, 0x80][..]).unwrap_err();
        assert!(matches!(err, PumpError::InvalidHeader { .. }));
    }

    #[test]
    fn test_read_from_consumes_header_only() {
        let mut bytes = header_bytes(0x5D, 1 << 16, u64::MAX);
        bytes.extend_from_slice(b"payload");
        let mut reader = &bytes[..];

        LzmaHeader::read_from(&mut reader).unwrap();
        assert_eq!(reader, b"payload");
    }

    #[test]
    fn test_estimated_memory_grows_with_dict() {
        let small = LzmaHeader::parse(&header_bytes(0x5D, 1 << 16, u64::MAX)).unwrap();
        let large = LzmaHeader::parse(&header_bytes(0x5D, 1 << 26, u64::MAX)).unwrap();
        assert!(small.estimated_memory() > 1 << 16);
        assert!(large.estimated_memory() - small.estimated_memory() == (1 << 26) - (1 << 16));
    }
}
