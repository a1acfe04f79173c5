//! # Flag Generator
//!
//! Writes the image sequence that [`Decoder`](super::decoder::Decoder) reads
//! back.
//!
//! ## Encoding Process
//! 1. For each flag byte `i`, fill a W×H RGB buffer with LCG noise seeded by `i + 1`
//! 2. Rotate the byte by [`rotation_amount`]`(i)`
//! 3. Overwrite the red channel at [`position`]`(i)` with the rotated byte
//! 4. Save as `img_<i>.<ext>`, zero-padded so file names sort in index order

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use image::{ImageFormat, RgbImage};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scheme::{position, rotate, rotation_amount, Dimensions};

/// Minimum number of digits in generated file indices.
const MIN_INDEX_WIDTH: usize = 3;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// File format of generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Binary PPM (P6)
    #[default]
    Ppm,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Ppm => "ppm",
            OutputFormat::Png => "png",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Ppm => ImageFormat::Pnm,
            OutputFormat::Png => ImageFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub dims: Dimensions,
    pub format: OutputFormat,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("flag character {character:?} at position {position} is not ASCII")]
    NonAsciiFlag { position: usize, character: char },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to create output directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write image {}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Per-image noise stream. The state depends only on the index.
struct Noise(u32);

impl Noise {
    fn for_index(index: u64) -> Self {
        // Seed is the low 32 bits of index + 1.
        Noise((index as u32).wrapping_add(1))
    }

    fn next_byte(&mut self) -> u8 {
        self.0 = self
            .0
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        (self.0 >> 24) as u8
    }
}

/// Render the noise image for `index` with `secret` hidden in it.
pub fn render(index: u64, secret: u8, dims: Dimensions) -> RgbImage {
    let mut img = RgbImage::new(dims.width, dims.height);
    let mut noise = Noise::for_index(index);
    for byte in img.iter_mut() {
        *byte = noise.next_byte();
    }

    let (x, y) = position(index, dims);
    let hidden = rotate(char::from(secret), rotation_amount(index)) as u8;
    img.get_pixel_mut(x, y)[0] = hidden;
    img
}

/// File name for image `index` in a sequence of `count` images.
pub fn file_name(index: u64, count: usize, format: OutputFormat) -> String {
    let last = count.saturating_sub(1).to_string();
    let width = last.len().max(MIN_INDEX_WIDTH);
    format!("img_{:0width$}.{}", index, format.extension(), width = width)
}

/// Write one image per character of `flag` into `out_dir`.
///
/// Returns the written paths in index order.
pub fn generate(
    flag: &str,
    out_dir: &Path,
    options: &GenerateOptions,
) -> Result<Vec<PathBuf>, GenerateError> {
    let dims = options.dims;
    if !dims.is_valid() {
        return Err(GenerateError::InvalidDimensions {
            width: dims.width,
            height: dims.height,
        });
    }
    if let Some((position, character)) = flag.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(GenerateError::NonAsciiFlag {
            position,
            character,
        });
    }

    fs::create_dir_all(out_dir).map_err(|source| GenerateError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let count = flag.len();
    let mut written = Vec::with_capacity(count);
    for (index, secret) in (0u64..).zip(flag.bytes()) {
        let path = out_dir.join(file_name(index, count, options.format));
        let img = render(index, secret, dims);
        img.save_with_format(&path, options.format.image_format())
            .map_err(|source| GenerateError::Save {
                path: path.clone(),
                source,
            })?;

        let (x, y) = position(index, dims);
        info!("Wrote {} (secret at x={}, y={})", path.display(), x, y);
        written.push(path);
    }

    Ok(written)
}
