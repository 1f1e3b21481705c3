use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use splashconv::convert::{
    ConvertOptions, DEFAULT_COLOR_BYTE, WriteMode, convert_file, parse_color_byte,
};
use splashconv::paths::resolve_io;
use splashconv::verify::verify_files;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Converts a raw splash screen into character/color byte pairs"
)]
struct Cli {
    /// Without a subcommand the default splash screen asset is converted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interleave every byte of an image with a color byte
    Convert {
        /// Raw image to convert
        input: Option<PathBuf>,

        /// Destination file (derived from the input name when omitted)
        output: Option<PathBuf>,

        /// Color byte written after each image byte (decimal, 0x hex or 0b binary)
        #[arg(long, default_value = "0x07", value_parser = parse_color_byte)]
        color: u8,

        /// Read the whole image before creating the output file
        #[arg(long)]
        buffered: bool,

        /// Print the conversion summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that a converted file matches its source image
    Verify {
        /// Raw source image
        source: PathBuf,

        /// Converted file to check
        converted: PathBuf,

        /// Color byte expected after each image byte
        #[arg(long, default_value = "0x07", value_parser = parse_color_byte)]
        color: u8,

        /// Print the verification report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    splashconv::telemetry::init()?;
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Convert {
        input: None,
        output: None,
        color: DEFAULT_COLOR_BYTE,
        buffered: false,
        json: false,
    });

    match command {
        Commands::Convert {
            input,
            output,
            color,
            buffered,
            json,
        } => {
            let (input, output) = resolve_io(input, output);

            let options = ConvertOptions {
                color_byte: color,
                mode: if buffered {
                    WriteMode::Buffered
                } else {
                    WriteMode::Streaming
                },
            };

            let summary = convert_file(&input, &output, &options)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} -> {}: {} bytes read, {} bytes written (color 0x{:02X})",
                    summary.input_path.display(),
                    summary.output_path.display(),
                    summary.bytes_read,
                    summary.bytes_written,
                    summary.color_byte
                );
            }
        }

        Commands::Verify {
            source,
            converted,
            color,
            json,
        } => {
            let report = verify_files(&source, &converted, color)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if let Some(mismatch) = &report.first_mismatch {
                println!(
                    "{}: mismatch at offset {} (expected {}, found {})",
                    converted.display(),
                    mismatch.offset,
                    format_byte(mismatch.expected),
                    format_byte(mismatch.found)
                );
            } else {
                println!(
                    "{}: OK ({} bytes from {} source bytes)",
                    converted.display(),
                    report.converted_len,
                    report.source_len
                );
            }

            if !report.is_valid() {
                bail!("{} does not match {}", converted.display(), source.display());
            }
        }
    }

    Ok(())
}

fn format_byte(byte: Option<u8>) -> String {
    match byte {
        Some(b) => format!("0x{:02X}", b),
        None => "end of file".to_string(),
    }
}
