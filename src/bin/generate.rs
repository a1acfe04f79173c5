//! # Generator Binary Entry Point
//!
//! Writes one noise image per flag character into an output directory.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin generate -- "TUDCTF{example}" out
//! cargo run --bin generate -- "TUDCTF{example}" out --width 256 --height 256 --ext png
//! ```

use clap::Parser;
use log::info;
use std::path::PathBuf;

use just_noise::common::logging::init_logger;
use just_noise::processing::generator::{generate, GenerateOptions, OutputFormat};
use just_noise::scheme::{Dimensions, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Command-line arguments for the generator binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ASCII text to hide, one character per image
    flag: String,

    /// Directory the images are written to (created if missing)
    out_dir: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Output image format
    #[arg(long, value_enum, default_value_t = OutputFormat::Ppm)]
    ext: OutputFormat,
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();

    let options = GenerateOptions {
        dims: Dimensions::new(args.width, args.height),
        format: args.ext,
    };
    let written = generate(&args.flag, &args.out_dir, &options)?;

    info!(
        "Generated {} images in {}",
        written.len(),
        args.out_dir.display()
    );

    Ok(())
}
