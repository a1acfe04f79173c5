//! # Decoder Binary Entry Point
//!
//! Reads every image in a directory and prints the hidden flag.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin decode
//! ```
//!
//! With no arguments it scans `out/` for 128×128 images sorted by file name.
//! Every setting can come from a TOML file and be overridden on the command line:
//! ```bash
//! cargo run --bin decode -- --config config/decode.toml --dir frames --order numeric
//! ```
//!
//! The only line written to stdout is `Flag: <decoded string>`; logs go to stderr.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use just_noise::common::config::{load_config, DecoderSettings};
use just_noise::common::logging::init_logger;
use just_noise::{Decoder, SortOrder};

/// Command-line arguments for the decoder binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the image sequence (default: out)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Path to a decoder configuration file (TOML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Processing order of the image files
    #[arg(long, value_enum)]
    order: Option<SortOrder>,
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();

    let settings: DecoderSettings = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => DecoderSettings::default(),
    };
    let settings = settings.with_overrides(args.dir, args.order);

    let decoder = Decoder::new(settings.image, settings.decoder.order)?;
    let flag = decoder.decode_dir(&settings.decoder.input_dir)?;

    println!("Flag: {}", flag);

    Ok(())
}
