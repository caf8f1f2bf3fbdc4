//! Pump configuration: staging chunk size and decoder limits.

use crate::error::{PumpError, Result};
use crate::traits::DecoderOptions;

/// Configuration for a [`StreamPump`](crate::pump::StreamPump) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpConfig {
    /// Capacity of each staging buffer in bytes. Bounds memory use
    /// independently of stream length.
    pub chunk_size: usize,
    /// Decoder memory limit in bytes. `u64::MAX` disables the limit.
    pub memlimit: u64,
    /// Backend-specific decoder flags.
    pub flags: u32,
}

impl PumpConfig {
    /// Default staging buffer capacity.
    pub const DEFAULT_CHUNK_SIZE: usize = 4096;

    /// Largest accepted staging buffer capacity (64 MiB).
    pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

    /// Default decoder memory limit (256 MiB). Fits the 64 MiB dictionary of
    /// the `-9` presets.
    pub const DEFAULT_MEMLIMIT: u64 = 256 * 1024 * 1024;

    /// Memory limit value meaning "no limit".
    pub const UNLIMITED: u64 = u64::MAX;

    /// Default configuration.
    pub const DEFAULT: Self = Self {
        chunk_size: Self::DEFAULT_CHUNK_SIZE,
        memlimit: Self::DEFAULT_MEMLIMIT,
        flags: 0,
    };

    /// Create a configuration with the given chunk size and default limits.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Self::DEFAULT
        }
    }

    /// Default configuration without a decoder memory limit.
    pub fn unlimited() -> Self {
        Self {
            memlimit: Self::UNLIMITED,
            ..Self::DEFAULT
        }
    }

    /// Set the staging chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the decoder memory limit.
    pub fn with_memlimit(mut self, memlimit: u64) -> Self {
        self.memlimit = memlimit;
        self
    }

    /// Set the decoder flags.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(PumpError::invalid_config("chunk size must be non-zero"));
        }
        if self.chunk_size > Self::MAX_CHUNK_SIZE {
            return Err(PumpError::invalid_config(format!(
                "chunk size {} exceeds the maximum of {} bytes",
                self.chunk_size,
                Self::MAX_CHUNK_SIZE
            )));
        }
        Ok(())
    }

    /// Options handed to the backend when the decoder is created.
    pub fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions {
            memlimit: self.memlimit,
            flags: self.flags,
        }
    }

    /// Whether the memory limit is disabled.
    pub fn is_unlimited(&self) -> bool {
        self.memlimit == Self::UNLIMITED
    }
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
