//! Checks converted splash screens against their source image.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// First position where a converted file diverges from the expected bytes.
///
/// `expected` or `found` is `None` when the offset lies past the end of the
/// corresponding sequence.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub offset: usize,
    pub expected: Option<u8>,
    pub found: Option<u8>,
}

#[derive(Serialize, Debug, Clone)]
pub struct VerifyReport {
    pub source_len: usize,
    pub converted_len: usize,
    pub color_byte: u8,
    pub first_mismatch: Option<Mismatch>,
}

impl VerifyReport {
    pub fn is_valid(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// Compares `converted` with the interleave of `source` and `color_byte`.
pub fn verify_bytes(source: &[u8], converted: &[u8], color_byte: u8) -> VerifyReport {
    let expected = source.iter().flat_map(|&b| [b, color_byte]);

    let mut first_mismatch = expected
        .zip(converted.iter().copied())
        .position(|(e, f)| e != f)
        .map(|offset| Mismatch {
            offset,
            expected: Some(expected_at(source, color_byte, offset)),
            found: Some(converted[offset]),
        });

    let expected_len = source.len() * 2;
    if first_mismatch.is_none() && converted.len() != expected_len {
        let offset = expected_len.min(converted.len());
        first_mismatch = Some(Mismatch {
            offset,
            expected: (offset < expected_len).then(|| expected_at(source, color_byte, offset)),
            found: converted.get(offset).copied(),
        });
    }

    VerifyReport {
        source_len: source.len(),
        converted_len: converted.len(),
        color_byte,
        first_mismatch,
    }
}

/// Reads both files and checks that `converted_path` holds the conversion of `source_path`.
///
/// # Errors
///
/// Returns an error if either file cannot be read
pub fn verify_files(
    source_path: &Path,
    converted_path: &Path,
    color_byte: u8,
) -> Result<VerifyReport> {
    let source = std::fs::read(source_path)
        .with_context(|| format!("Failed to read source file {}", source_path.display()))?;
    let converted = std::fs::read(converted_path)
        .with_context(|| format!("Failed to read converted file {}", converted_path.display()))?;

    Ok(verify_bytes(&source, &converted, color_byte))
}

fn expected_at(source: &[u8], color_byte: u8, offset: usize) -> u8 {
    if offset % 2 == 0 {
        source[offset / 2]
    } else {
        color_byte
    }
}
