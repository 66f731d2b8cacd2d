//! Command-line JPEG XL converter.
//!
//! Dispatches on the input file's extension: `.jpg`/`.jpeg` transcodes to
//! JPEG XL, `.jxl` decodes back to JPEG (once the decode direction
//! exists). The result is written next to the input with the target
//! extension appended, and the output path is printed on success. Any
//! missing file or unsupported extension fails the process.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use jxlcoder_core::{decode, encode_jpeg, EncoderConfig};

/// Convert between JPEG and JPEG XL, dispatching on file extension.
#[derive(Parser)]
#[command(name = "jxlcoder")]
struct Cli {
    /// Path to a .jpg/.jpeg file to encode or a .jxl file to decode.
    input: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let data = std::fs::read(&cli.input)
        .with_context(|| format!("could not read {}", cli.input.display()))?;

    let extension = cli
        .input
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let (output, out_path) = match extension.as_deref() {
        Some("jpg") | Some("jpeg") => {
            log::info!("encoding {} to JPEG XL", cli.input.display());
            let encoded = encode_jpeg(&data, &EncoderConfig::default())
                .with_context(|| format!("could not encode {}", cli.input.display()))?;
            (encoded, sibling_with_suffix(&cli.input, "jxl"))
        }
        Some("jxl") => {
            log::info!("decoding {} to JPEG", cli.input.display());
            let decoded = decode(&data)
                .with_context(|| format!("could not decode {}", cli.input.display()))?;
            (decoded, sibling_with_suffix(&cli.input, "jpg"))
        }
        _ => bail!("unsupported file type {}", cli.input.display()),
    };

    std::fs::write(&out_path, output)
        .with_context(|| format!("could not write {}", out_path.display()))?;
    println!("{}", out_path.display());
    Ok(())
}

/// Derive the output path next to the input: `photo.jpg` + `jxl` becomes
/// `photo.jpg.jxl` in the same directory.
fn sibling_with_suffix(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    input.with_file_name(name)
}
