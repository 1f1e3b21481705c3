//! Splash screen file naming.
//!
//! This module holds the default asset names used by the emulator build and
//! derives converted file names from arbitrary inputs.

use std::path::{Path, PathBuf};

/// Raw splash screen read when no input is given.
pub const DEFAULT_INPUT: &str = "6502burken_splash_screen.bin";

/// Converted splash screen written when no output is given.
pub const DEFAULT_OUTPUT: &str = "6502burken_splash_screen_converted.bin";

/// Derives the converted file name for `input`.
///
/// The `_converted` suffix is appended to the file stem, keeping the
/// directory and extension. Inputs without an extension get `.bin`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use splashconv::paths::converted_path;
///
/// let result = converted_path(Path::new("extra/6502burken_splash_screen.bin"));
/// assert_eq!(result, PathBuf::from("extra/6502burken_splash_screen_converted.bin"));
///
/// let result = converted_path(Path::new("splash"));
/// assert_eq!(result, PathBuf::from("splash_converted.bin"));
/// ```
pub fn converted_path<P: AsRef<Path>>(input: P) -> PathBuf {
    let input = input.as_ref();

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bin".to_string());

    input.with_file_name(format!("{stem}_converted.{extension}"))
}

/// Resolves the conversion input and output from optional user choices.
///
/// Without an input the reference asset names are used for both ends and any
/// given output is ignored. An input without an output converts next to the
/// input using [`converted_path`].
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use splashconv::paths::{DEFAULT_INPUT, DEFAULT_OUTPUT, resolve_io};
///
/// let (input, output) = resolve_io(None, None);
/// assert_eq!(input, PathBuf::from(DEFAULT_INPUT));
/// assert_eq!(output, PathBuf::from(DEFAULT_OUTPUT));
///
/// let (_, output) = resolve_io(Some(PathBuf::from("title.bin")), None);
/// assert_eq!(output, PathBuf::from("title_converted.bin"));
/// ```
pub fn resolve_io(input: Option<PathBuf>, output: Option<PathBuf>) -> (PathBuf, PathBuf) {
    match (input, output) {
        (Some(input), Some(output)) => (input, output),
        (Some(input), None) => {
            let output = converted_path(&input);
            (input, output)
        }
        (None, _) => (PathBuf::from(DEFAULT_INPUT), PathBuf::from(DEFAULT_OUTPUT)),
    }
}
