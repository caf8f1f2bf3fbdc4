//! LZPUMP CLI - streaming `.lzma` / `.xz` decompression
//!
//! Decodes one compressed file at a time through fixed-size staging buffers,
//! so memory use stays bounded regardless of file size.

mod commands;
mod utils;

use clap::{Args, Parser, Subcommand, ValueEnum};
use commands::{DecompressOptions, cmd_decompress, cmd_info, cmd_test};
use lzpump_lzma::{LzmaFormat, PumpConfig, flags};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lzpump")]
#[command(
    author,
    version,
    about = "Streaming LZMA/XZ decompressor with bounded memory"
)]
#[command(long_about = "
LZPUMP decompresses .lzma and .xz files through liblzma using fixed-size
staging buffers. Output is written as it is produced.

Examples:
  lzpump decompress data.lzma
  lzpump decompress data.lzma -o data.bin --progress
  lzpump decompress data.xz --format xz --chunk-size 65536
  lzpump decompress big.lzma --memlimit 1G
  lzpump test data.lzma
  lzpump info data.lzma --json
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompress a file
    #[command(alias = "x")]
    Decompress {
        /// Compressed input file
        input: PathBuf,

        /// Output file (default: input without its extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        decoder: DecoderArgs,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,

        /// Copy the input's modification time to the output
        #[arg(long)]
        keep_mtime: bool,
    },

    /// Decode a file and discard the output
    #[command(alias = "t")]
    Test {
        /// Compressed input file
        input: PathBuf,

        #[command(flatten)]
        decoder: DecoderArgs,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the header of a .lzma file
    #[command(alias = "i")]
    Info {
        /// Compressed input file
        input: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

/// Container format accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Legacy .lzma (LZMA_Alone)
    #[value(alias = "alone")]
    Lzma,
    /// .xz container
    Xz,
    /// Detect .xz or .lzma
    Auto,
}

impl From<FormatArg> for LzmaFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Lzma => LzmaFormat::Alone,
            FormatArg::Xz => LzmaFormat::Xz,
            FormatArg::Auto => LzmaFormat::Auto,
        }
    }
}

#[derive(Args)]
struct DecoderArgs {
    /// Container format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Lzma)]
    format: FormatArg,

    /// Staging buffer size in bytes
    #[arg(short, long, default_value_t = PumpConfig::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Decoder memory limit: bytes with optional K/M/G suffix, or "unlimited"
    #[arg(short, long, default_value = "256M", value_parser = utils::parse_memlimit)]
    memlimit: u64,

    /// Decode concatenated .xz streams as one
    #[arg(long)]
    concatenated: bool,
}

impl DecoderArgs {
    fn format(&self) -> LzmaFormat {
        self.format.into()
    }

    fn config(&self) -> PumpConfig {
        let decoder_flags = if self.concatenated {
            flags::CONCATENATED
        } else {
            0
        };
        PumpConfig::new(self.chunk_size)
            .with_memlimit(self.memlimit)
            .with_flags(decoder_flags)
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decompress {
            input,
            output,
            decoder,
            verbose,
            progress,
            keep_mtime,
        } => cmd_decompress(
            &input,
            &DecompressOptions {
                output: output.as_deref(),
                config: decoder.config(),
                format: decoder.format(),
                verbose,
                progress,
                keep_mtime,
            },
        ),
        Commands::Test {
            input,
            decoder,
            verbose,
        } => cmd_test(&input, &decoder.config(), decoder.format(), verbose),
        Commands::Info { input, json } => cmd_info(&input, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
