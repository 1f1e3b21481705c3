use anyhow::Result;
use serial_test::serial;
use splashconv::convert::{
    ConvertOptions, DEFAULT_COLOR_BYTE, WriteMode, convert_file, interleave, interleave_bytes,
};
use splashconv::paths::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use std::fs;
use std::path::Path;

use test_helpers::{TestEnvironment, io_error_kind, sample_splash};

const MODES: [WriteMode; 2] = [WriteMode::Streaming, WriteMode::Buffered];

fn convert_with(
    env: &TestEnvironment,
    input: &[u8],
    color_byte: u8,
    mode: WriteMode,
) -> Result<Vec<u8>> {
    let input_path = env.write_file("in.bin", input)?;
    let output_path = env.path("out.bin");
    let options = ConvertOptions { color_byte, mode };

    convert_file(&input_path, &output_path, &options)?;

    Ok(fs::read(&output_path)?)
}

#[test]
fn test_reference_scenarios() -> Result<()> {
    let env = TestEnvironment::setup()?;

    for mode in MODES {
        assert_eq!(convert_with(&env, &[], 0x07, mode)?, Vec::<u8>::new());
        assert_eq!(convert_with(&env, &[0x41], 0x07, mode)?, vec![0x41, 0x07]);
        assert_eq!(
            convert_with(&env, &[0x00, 0xFF, 0x10], 0x07, mode)?,
            vec![0x00, 0x07, 0xFF, 0x07, 0x10, 0x07]
        );
        assert_eq!(
            convert_with(&env, &[0x07, 0x07], 0x07, mode)?,
            vec![0x07, 0x07, 0x07, 0x07]
        );
    }

    Ok(())
}

#[test]
fn test_full_splash_screen_interleave() -> Result<()> {
    let env = TestEnvironment::setup()?;
    let input = sample_splash();

    for mode in MODES {
        let output = convert_with(&env, &input, 0x1E, mode)?;

        assert_eq!(output.len(), input.len() * 2);
        for (i, &byte) in input.iter().enumerate() {
            assert_eq!(output[2 * i], byte, "data byte at {}", i);
            assert_eq!(output[2 * i + 1], 0x1E, "color byte at {}", i);
        }
    }

    Ok(())
}

#[test]
fn test_streaming_and_buffered_agree() -> Result<()> {
    let env = TestEnvironment::setup()?;
    let input = sample_splash();

    let streamed = convert_with(&env, &input, DEFAULT_COLOR_BYTE, WriteMode::Streaming)?;
    let buffered = convert_with(&env, &input, DEFAULT_COLOR_BYTE, WriteMode::Buffered)?;

    assert_eq!(streamed, buffered);
    assert_eq!(streamed, interleave_bytes(&input, DEFAULT_COLOR_BYTE));
    Ok(())
}

#[test]
fn test_rerun_is_identical() -> Result<()> {
    let env = TestEnvironment::setup()?;
    let input_path = env.write_file("splash.bin", &sample_splash())?;
    let output_path = env.path("splash_converted.bin");

    interleave(&input_path, &output_path, DEFAULT_COLOR_BYTE)?;
    let first = fs::read(&output_path)?;
    interleave(&input_path, &output_path, DEFAULT_COLOR_BYTE)?;
    let second = fs::read(&output_path)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_existing_output_is_truncated() -> Result<()> {
    let env = TestEnvironment::setup()?;

    for mode in MODES {
        let input_path = env.write_file("in.bin", &[0x41])?;
        let output_path = env.write_file("out.bin", &[0xEE; 64])?;

        let options = ConvertOptions {
            mode,
            ..ConvertOptions::default()
        };
        convert_file(&input_path, &output_path, &options)?;

        assert_eq!(fs::read(&output_path)?, vec![0x41, 0x07]);
    }

    Ok(())
}

#[test]
fn test_convert_file_onto_itself() -> Result<()> {
    let env = TestEnvironment::setup()?;

    for mode in MODES {
        let path = env.write_file("splash.bin", &[0x41, 0x42])?;
        let options = ConvertOptions {
            mode,
            ..ConvertOptions::default()
        };

        let summary = convert_file(&path, &path, &options)?;

        assert_eq!(summary.bytes_read, 2, "{:?}", mode);
        assert_eq!(summary.mode, WriteMode::Buffered);
        assert_eq!(fs::read(&path)?, vec![0x41, 0x07, 0x42, 0x07], "{:?}", mode);
    }

    Ok(())
}

#[test]
fn test_convert_file_onto_itself_through_other_spelling() -> Result<()> {
    let env = TestEnvironment::setup()?;
    let path = env.write_file("splash.bin", &[0x00, 0xFF])?;
    let alias = env.dir.path().join(".").join("splash.bin");

    let summary = convert_file(&path, &alias, &ConvertOptions::default())?;

    assert_eq!(summary.bytes_read, 2);
    assert_eq!(fs::read(&path)?, vec![0x00, 0x07, 0xFF, 0x07]);
    Ok(())
}

#[test]
fn test_summary_counts() -> Result<()> {
    let env = TestEnvironment::setup()?;
    let input_path = env.write_file("in.bin", &[1, 2, 3, 4, 5])?;
    let output_path = env.path("out.bin");

    let options = ConvertOptions {
        color_byte: 0x4F,
        mode: WriteMode::Buffered,
    };
    let summary = convert_file(&input_path, &output_path, &options)?;

    assert_eq!(summary.input_path, input_path);
    assert_eq!(summary.output_path, output_path);
    assert_eq!(summary.color_byte, 0x4F);
    assert_eq!(summary.mode, WriteMode::Buffered);
    assert_eq!(summary.bytes_read, 5);
    assert_eq!(summary.bytes_written, 10);
    assert_eq!(fs::metadata(&output_path)?.len(), summary.bytes_written);

    let json = serde_json::to_value(&summary)?;
    assert_eq!(json["mode"], "buffered");
    assert_eq!(json["bytes_written"], 10);

    Ok(())
}

#[test]
fn test_missing_input_fails_without_creating_output() -> Result<()> {
    let env = TestEnvironment::setup()?;
    let input_path = env.path("does_not_exist.bin");
    let output_path = env.path("out.bin");

    for mode in MODES {
        let options = ConvertOptions {
            mode,
            ..ConvertOptions::default()
        };
        let err = convert_file(&input_path, &output_path, &options).unwrap_err();

        assert_eq!(io_error_kind(&err), Some(std::io::ErrorKind::NotFound));
        assert!(format!("{:?}", err).contains("Failed to open input file"));
        assert!(!output_path.exists());
    }

    Ok(())
}

#[test]
fn test_missing_input_leaves_existing_output_untouched() -> Result<()> {
    let env = TestEnvironment::setup()?;
    let output_path = env.write_file("out.bin", b"previous")?;

    let result = interleave(&env.path("missing.bin"), &output_path, DEFAULT_COLOR_BYTE);

    assert!(result.is_err());
    assert_eq!(fs::read(&output_path)?, b"previous");
    Ok(())
}

#[test]
fn test_unwritable_output_fails() -> Result<()> {
    let env = TestEnvironment::setup()?;
    let input_path = env.write_file("in.bin", &[0x41])?;
    let output_path = env.path("no_such_dir").join("out.bin");

    for mode in MODES {
        let options = ConvertOptions {
            mode,
            ..ConvertOptions::default()
        };
        let err = convert_file(&input_path, &output_path, &options).unwrap_err();

        assert!(io_error_kind(&err).is_some());
        assert!(format!("{:?}", err).contains("Failed to create output file"));
    }

    Ok(())
}

#[test]
#[serial]
fn test_default_asset_names() -> Result<()> {
    let env = TestEnvironment::setup()?;
    env.write_file(DEFAULT_INPUT, &[0x53, 0x50])?;

    let original_dir = std::env::current_dir()?;
    std::env::set_current_dir(env.dir.path())?;
    let result = interleave(
        Path::new(DEFAULT_INPUT),
        Path::new(DEFAULT_OUTPUT),
        DEFAULT_COLOR_BYTE,
    );
    std::env::set_current_dir(original_dir)?;
    result?;

    assert_eq!(
        fs::read(env.path(DEFAULT_OUTPUT))?,
        vec![0x53, 0x07, 0x50, 0x07]
    );
    Ok(())
}
