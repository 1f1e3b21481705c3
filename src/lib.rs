//! # Splashconv
//!
//! Splashconv turns a raw splash screen image into the character/color byte
//! pairs loaded into the 6502burken text buffer.
//!
//! ## Features
//!
//! * Conversion - Interleave every image byte with a constant color byte
//! * Verification - Check a converted file against its source image
//! * Naming - Default asset names and derived output paths

/// Byte interleaving of splash screen images
pub mod convert;
/// Default asset names and output path derivation
pub mod paths;
/// Logging setup and contextual log messages
pub mod telemetry;
/// Validation of converted files against their source
pub mod verify;
