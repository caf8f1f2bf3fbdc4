//! Info command implementation.

use crate::utils::format_bytes;
use lzpump_lzma::{HEADER_SIZE, LzmaHeader};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Magic bytes at the start of every `.xz` stream.
const XZ_MAGIC: [u8; 6] = [0xFD, b'7', b'z', b'X', b'Z', 0x00];

/// JSON output for the info command.
#[derive(Debug, Serialize)]
struct InfoJson {
    file: String,
    size: u64,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<HeaderJson>,
}

/// JSON view of a `.lzma` header.
#[derive(Debug, Serialize)]
struct HeaderJson {
    lc: u32,
    lp: u32,
    pb: u32,
    dict_size: u32,
    standard_dict_size: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    uncompressed_size: Option<u64>,
    estimated_memory: u64,
}

impl From<&LzmaHeader> for HeaderJson {
    fn from(header: &LzmaHeader) -> Self {
        Self {
            lc: header.properties.lc,
            lp: header.properties.lp,
            pb: header.properties.pb,
            dict_size: header.dict_size,
            standard_dict_size: header.has_standard_dict_size(),
            uncompressed_size: header.uncompressed_size,
            estimated_memory: header.estimated_memory(),
        }
    }
}

pub fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::open(input)?;
    let size = file.metadata()?.len();

    let mut prefix = Vec::with_capacity(HEADER_SIZE);
    file.by_ref()
        .take(HEADER_SIZE as u64)
        .read_to_end(&mut prefix)?;

    let (format, header) = if prefix.starts_with(&XZ_MAGIC) {
        ("xz", None)
    } else {
        ("lzma", Some(LzmaHeader::parse(&prefix)?))
    };

    if json {
        let info = InfoJson {
            file: input.display().to_string(),
            size,
            format,
            header: header.as_ref().map(HeaderJson::from),
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File Information");
    println!("================");
    println!("File: {}", input.display());
    println!("Format: {}", format);
    println!("Size: {} bytes", size);

    let Some(header) = header else {
        println!();
        println!("Header details are only available for .lzma files.");
        return Ok(());
    };

    let props = header.properties;
    println!();
    println!("LZMA Header:");
    println!("  Properties: lc={} lp={} pb={}", props.lc, props.lp, props.pb);
    println!(
        "  Dictionary size: {} ({})",
        header.dict_size,
        format_bytes(header.dict_size as u64)
    );
    if !header.has_standard_dict_size() {
        println!("  Warning: non-standard dictionary size");
    }
    match header.uncompressed_size {
        Some(n) => println!("  Uncompressed size: {} bytes", n),
        None => println!("  Uncompressed size: unknown (end marker)"),
    }
    println!(
        "  Estimated decoder memory: {}",
        format_bytes(header.estimated_memory())
    );
    Ok(())
}
