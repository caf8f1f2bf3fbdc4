//! Decompress command implementation.

use crate::utils::{create_progress_bar, default_output_path, format_bytes, hint, same_file};
use filetime::FileTime;
use lzpump_lzma::{LzmaFormat, PumpConfig, pump};
use std::fs::{self, File};
use std::path::Path;

/// Options for decompressing a file.
pub struct DecompressOptions<'a> {
    pub output: Option<&'a Path>,
    pub config: PumpConfig,
    pub format: LzmaFormat,
    pub verbose: bool,
    pub progress: bool,
    pub keep_mtime: bool,
}

pub fn cmd_decompress(
    input: &Path,
    options: &DecompressOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.is_file() {
        return Err(format!("No such file: {}", input.display()).into());
    }
    options.config.validate()?;

    let output = options
        .output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    if same_file(input, &output)? {
        return Err(format!("Output would overwrite input: {}", output.display()).into());
    }

    if options.verbose {
        println!(
            "Using {} decoder, chunk size {}, memory limit {}",
            options.format,
            options.config.chunk_size,
            if options.config.is_unlimited() {
                "unlimited".to_string()
            } else {
                format_bytes(options.config.memlimit)
            }
        );
    }

    if output.is_file() {
        if options.verbose {
            println!("Removing existing output: {}", output.display());
        }
        fs::remove_file(&output)?;
    }

    println!("Decompressing {} to {}", input.display(), output.display());

    let source = File::open(input)?;
    let input_len = source.metadata()?.len();
    let sink = File::create(&output)?;

    let pb = create_progress_bar(input_len, options.progress);
    let result = pump(options.format, options.config).run(pb.wrap_read(source), sink);

    let report = match result {
        Ok(report) => {
            pb.finish_and_clear();
            report
        }
        Err(e) => {
            pb.abandon();
            if let Some(hint) = hint(&e) {
                eprintln!("Hint: {}", hint);
            }
            if options.verbose {
                eprintln!("Partial output left at {}", output.display());
            }
            return Err(e.into());
        }
    };

    if options.keep_mtime {
        let metadata = fs::metadata(input)?;
        let mtime = FileTime::from_last_modification_time(&metadata);
        filetime::set_file_mtime(&output, mtime)?;
    }

    if options.verbose {
        println!(
            "  {} -> {} ({:.2}x)",
            format_bytes(report.total_in),
            format_bytes(report.total_out),
            report.expansion_ratio()
        );
        println!(
            "  {} reads, {} writes, {} decoder steps",
            report.chunks_read, report.chunks_written, report.steps
        );
    }

    println!("Done.");
    Ok(())
}
