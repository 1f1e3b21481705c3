//! Byte interleaving of splash screen images.
//!
//! Every byte of the source image is followed by a constant color byte, which
//! turns a plain character dump into the character/attribute pairs the text
//! buffer expects.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::telemetry::{LogMessage, log_with_context};

/// Attribute byte written after every character when none is given.
pub const DEFAULT_COLOR_BYTE: u8 = 0x07;

/// How the converted bytes reach the destination file.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Each byte is written as soon as it is read.
    #[default]
    Streaming,
    /// The whole output is built in memory and written once after reading completes.
    Buffered,
}

pub struct ConvertOptions {
    pub color_byte: u8,
    pub mode: WriteMode,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            color_byte: DEFAULT_COLOR_BYTE,
            mode: WriteMode::Streaming,
        }
    }
}

/// Outcome of a file conversion.
#[derive(Serialize, Debug, Clone)]
pub struct ConversionSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub color_byte: u8,
    pub mode: WriteMode,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Parses a color byte written in decimal, `0x` hex or `0b` binary notation.
pub fn parse_color_byte(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();

    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        u8::from_str_radix(hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u8::from_str_radix(bin, 2)
    } else {
        lower.parse::<u8>()
    };

    parsed.map_err(|e| format!("invalid color byte '{}': {}", value, e))
}

/// Interleaves `input` with `color_byte`, returning a buffer twice as long.
///
/// # Examples
///
/// ```
/// use splashconv::convert::interleave_bytes;
///
/// assert_eq!(interleave_bytes(&[0x00, 0xFF], 0x07), vec![0x00, 0x07, 0xFF, 0x07]);
/// assert!(interleave_bytes(&[], 0x07).is_empty());
/// ```
pub fn interleave_bytes(input: &[u8], color_byte: u8) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() * 2);
    for &byte in input {
        output.push(byte);
        output.push(color_byte);
    }
    output
}

/// Copies `reader` into `writer`, emitting `color_byte` after each byte read.
///
/// Reads one byte at a time until end of stream, so callers should hand in
/// buffered readers and writers. The writer is flushed before returning.
///
/// # Returns
///
/// The number of bytes consumed from `reader`
pub fn interleave_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    color_byte: u8,
) -> io::Result<u64> {
    let mut byte = [0u8; 1];
    let mut count = 0u64;

    loop {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                writer.write_all(&[byte[0], color_byte])?;
                count += 1;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    writer.flush()?;
    Ok(count)
}

/// Converts the file at `input_path` into `output_path` using `color_byte`.
///
/// The destination is created if absent and truncated if present. Fails if
/// the source cannot be opened, in which case the destination is not touched.
pub fn interleave(input_path: &Path, output_path: &Path, color_byte: u8) -> Result<()> {
    let options = ConvertOptions {
        color_byte,
        ..ConvertOptions::default()
    };
    convert_file(input_path, output_path, &options).map(|_| ())
}

/// Converts a splash screen file according to `options`.
///
/// # Arguments
///
/// * `input_path` - The raw image to read
/// * `output_path` - Where the interleaved bytes are written
/// * `options` - Color byte and write mode
///
/// # Returns
///
/// A summary with the byte counts of the conversion
///
/// # Errors
///
/// Returns an error if the input cannot be opened or read, or the output
/// cannot be created or written. The input is always opened before the
/// output, so a missing input never creates the output file. In
/// streaming mode a failure after that point may leave a partial output.
/// Converting a file onto itself is always buffered.
pub fn convert_file(
    input_path: &Path,
    output_path: &Path,
    options: &ConvertOptions,
) -> Result<ConversionSummary> {
    debug!(
        "Converting {} -> {} (color=0x{:02X}, mode={:?})",
        input_path.display(),
        output_path.display(),
        options.color_byte,
        options.mode
    );

    let input = File::open(input_path)
        .with_context(|| format!("Failed to open input file {}", input_path.display()))?;

    // Truncating the output would wipe an unread input naming the same file
    let mode = if options.mode == WriteMode::Streaming && is_same_file(input_path, output_path) {
        debug!(
            "{} is both input and output, buffering the conversion",
            input_path.display()
        );
        WriteMode::Buffered
    } else {
        options.mode
    };

    let bytes_read = match mode {
        WriteMode::Streaming => {
            let output = create_output(output_path)?;
            interleave_stream(BufReader::new(input), BufWriter::new(output), options.color_byte)
                .with_context(|| {
                    format!(
                        "Failed to convert {} into {}",
                        input_path.display(),
                        output_path.display()
                    )
                })?
        }
        WriteMode::Buffered => {
            let mut data = Vec::new();
            BufReader::new(input)
                .read_to_end(&mut data)
                .with_context(|| format!("Failed to read input file {}", input_path.display()))?;
            let converted = interleave_bytes(&data, options.color_byte);

            let mut output = create_output(output_path)?;
            output
                .write_all(&converted)
                .with_context(|| format!("Failed to write output file {}", output_path.display()))?;
            data.len() as u64
        }
    };

    let summary = ConversionSummary {
        input_path: input_path.to_path_buf(),
        output_path: output_path.to_path_buf(),
        color_byte: options.color_byte,
        mode,
        bytes_read,
        bytes_written: bytes_read * 2,
    };

    log_with_context(
        log::Level::Info,
        LogMessage {
            message: "Splash screen converted".to_string(),
            module: "convert",
            context: Some(vec![
                ("input", summary.input_path.display().to_string()),
                ("output", summary.output_path.display().to_string()),
                ("bytes_read", summary.bytes_read.to_string()),
                ("bytes_written", summary.bytes_written.to_string()),
            ]),
        },
    );

    Ok(summary)
}

/// Whether both paths resolve to the same existing file.
fn is_same_file(input_path: &Path, output_path: &Path) -> bool {
    match (fs::canonicalize(input_path), fs::canonicalize(output_path)) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    }
}

fn create_output(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to create output file {}", path.display()))
}
