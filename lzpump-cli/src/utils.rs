//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use lzpump_lzma::{PumpConfig, PumpError, status};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension appended when the input has none to strip.
pub const FALLBACK_EXTENSION: &str = "out";

/// Create a byte-counting progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Output path used when none is given: the input with its last extension
/// removed, or with `.out` appended if it has no extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    if input.extension().is_some() {
        return input.with_extension("");
    }
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(FALLBACK_EXTENSION);
    PathBuf::from(name)
}

/// Whether `output` names the same file as the existing `input`.
///
/// Both paths are canonicalized, so `./data.lzma`, `dir/../data.lzma` and
/// symlinks are recognised. An output that does not exist yet cannot be the
/// input.
pub fn same_file(input: &Path, output: &Path) -> io::Result<bool> {
    let input = fs::canonicalize(input)?;
    match fs::canonicalize(output) {
        Ok(output) => Ok(input == output),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Parse a memory limit such as `1048576`, `64M`, `1GiB` or `unlimited`.
///
/// Suffixes are binary (K = 1024).
pub fn parse_memlimit(value: &str) -> Result<u64, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("unlimited") || value.eq_ignore_ascii_case("max") {
        return Ok(PumpConfig::UNLIMITED);
    }

    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, suffix) = value.split_at(split);
    let number: u64 = digits
        .parse()
        .map_err(|_| format!("invalid memory limit '{}'", value))?;

    let shift = match suffix.to_ascii_uppercase().as_str() {
        "" | "B" => 0,
        "K" | "KB" | "KIB" => 10,
        "M" | "MB" | "MIB" => 20,
        "G" | "GB" | "GIB" => 30,
        _ => return Err(format!("unknown size suffix '{}'", suffix)),
    };

    number
        .checked_mul(1u64 << shift)
        .ok_or_else(|| format!("memory limit '{}' is too large", value))
}

/// Human-readable hint for a failed run, if there is something the user can
/// change.
pub fn hint(err: &PumpError) -> Option<String> {
    let code = err.status_code()?;
    let detail = status::description(code)?;
    let advice = match code.value() {
        status::MEMLIMIT_ERROR => " (raise --memlimit)",
        status::FORMAT_ERROR => " (check --format)",
        status::BUF_ERROR => " (the input is probably truncated)",
        _ => "",
    };
    Some(format!("{}{}", detail, advice))
}

/// Format a byte count for display.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
