//! # Flag Decoder
//!
//! Recovers a message hidden one character per image.
//!
//! ## Algorithm
//!
//! For every image, taken in [`SortOrder`]:
//! 1. Parse the index out of the file name
//! 2. Compute the secret coordinate with [`position`]
//! 3. Read the red channel at that coordinate as a Latin-1 character
//! 4. Reverse the Caesar shift given by [`rotation_amount`]
//! 5. Append the character to the [`Flag`]
//!
//! Any malformed name or unreadable image aborts the whole run; no partial
//! flag is ever returned.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use image::io::Reader;
use image::{DynamicImage, GenericImageView, ImageError, ImageResult, Rgba};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filename::{parse_index, FilenameError};
use crate::scheme::{position, rotation_amount, unrotate, Dimensions};

/// Order in which image files are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Sort by file name as a string. Only matches index order when the
    /// indices are zero-padded to equal width (`img_10` sorts before `img_2`).
    #[default]
    Lexicographic,
    /// Sort by parsed index, ties broken by file name.
    Numeric,
}

/// Errors that abort decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to read directory {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file name {0:?} is not valid UTF-8")]
    NonUtf8Name(OsString),

    #[error("malformed file name {name:?}")]
    MalformedFilename {
        name: String,
        #[source]
        source: FilenameError,
    },

    #[error("failed to load image {}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "image {} is {actual_width}x{actual_height}, smaller than {}x{}",
        .path.display(),
        .expected.width,
        .expected.height
    )]
    TooSmall {
        path: PathBuf,
        actual_width: u32,
        actual_height: u32,
        expected: Dimensions,
    },
}

/// The recovered message. Only grows while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flag(String);

impl Flag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.0.push(c);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directory entry whose name carried a valid index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub name: String,
    pub index: u64,
    pub path: PathBuf,
}

impl ImageEntry {
    /// Build an entry from a bare file name located in `dir`.
    pub fn from_name(dir: &Path, name: String) -> Result<Self, DecodeError> {
        let index = parse_index(&name).map_err(|source| DecodeError::MalformedFilename {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            path: dir.join(&name),
            name,
            index,
        })
    }
}

/// Sort entries in place according to `order`.
pub fn sort_entries(entries: &mut [ImageEntry], order: SortOrder) {
    match order {
        SortOrder::Lexicographic => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::Numeric => {
            entries.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)))
        }
    }
}

fn open_image(path: &Path) -> ImageResult<DynamicImage> {
    Reader::open(path)
        .and_then(Reader::with_guessed_format)
        .map_err(ImageError::IoError)?
        .decode()
}

/// Reads one character per image and assembles the flag.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    dims: Dimensions,
    order: SortOrder,
}

impl Decoder {
    pub fn new(dims: Dimensions, order: SortOrder) -> Result<Self, DecodeError> {
        if !dims.is_valid() {
            return Err(DecodeError::InvalidDimensions {
                width: dims.width,
                height: dims.height,
            });
        }
        Ok(Self { dims, order })
    }

    /// List `dir`, parse every file name and return the entries in processing order.
    ///
    /// Subdirectories, including symlinks to them, are skipped. A single
    /// malformed name fails the whole listing.
    pub fn collect_entries(&self, dir: &Path) -> Result<Vec<ImageEntry>, DecodeError> {
        let read_dir_err = |source| DecodeError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            if fs::metadata(entry.path()).map_err(read_dir_err)?.is_dir() {
                warn!("Skipping subdirectory {}", entry.path().display());
                continue;
            }
            let name = entry
                .file_name()
                .into_string()
                .map_err(DecodeError::NonUtf8Name)?;
            entries.push(ImageEntry::from_name(dir, name)?);
        }

        sort_entries(&mut entries, self.order);
        Ok(entries)
    }

    /// Recover the character hidden in `img` for image number `index`.
    ///
    /// Returns `None` if the secret coordinate lies outside `img`.
    pub fn recover_char<I>(&self, index: u64, img: &I) -> Option<char>
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        let (x, y) = position(index, self.dims);
        if !img.in_bounds(x, y) {
            return None;
        }
        let red = img.get_pixel(x, y)[0];
        let amount = rotation_amount(index);
        let c = unrotate(char::from(red), amount);
        debug!(
            "index={} pos=({}, {}) red={} rot={} -> {:?}",
            index, x, y, red, amount, c
        );
        Some(c)
    }

    /// Open one image file and recover its character.
    ///
    /// The format is detected from the file contents, so the extension is free.
    pub fn decode_entry(&self, entry: &ImageEntry) -> Result<char, DecodeError> {
        let img = open_image(&entry.path).map_err(|source| DecodeError::Image {
            path: entry.path.clone(),
            source,
        })?;

        let too_small = || DecodeError::TooSmall {
            path: entry.path.clone(),
            actual_width: img.width(),
            actual_height: img.height(),
            expected: self.dims,
        };
        if img.width() < self.dims.width || img.height() < self.dims.height {
            return Err(too_small());
        }

        self.recover_char(entry.index, &img).ok_or_else(too_small)
    }

    /// Decode every image in `dir` into a flag.
    pub fn decode_dir(&self, dir: &Path) -> Result<Flag, DecodeError> {
        let entries = self.collect_entries(dir)?;
        info!(
            "Decoding {} images from {} ({:?} order)",
            entries.len(),
            dir.display(),
            self.order
        );

        let mut flag = Flag::new();
        for entry in &entries {
            debug!("Reading {}", entry.name);
            flag.push(self.decode_entry(entry)?);
        }

        info!("Recovered {} characters", flag.as_str().chars().count());
        Ok(flag)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            dims: Dimensions::default(),
            order: SortOrder::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::rotate;
    use image::RgbaImage;

    fn entry(name: &str) -> ImageEntry {
        ImageEntry::from_name(Path::new("out"), name.to_string()).unwrap()
    }

    fn indices(entries: &[ImageEntry]) -> Vec<u64> {
        entries.iter().map(|e| e.index).collect()
    }

    #[test]
    fn test_lexicographic_order_is_not_numeric() {
        let mut entries = vec![
            entry("img_2.png"),
            entry("img_10.png"),
            entry("img_0.png"),
            entry("img_1.png"),
        ];
        sort_entries(&mut entries, SortOrder::Lexicographic);
        assert_eq!(indices(&entries), vec![0, 1, 10, 2]);

        sort_entries(&mut entries, SortOrder::Numeric);
        assert_eq!(indices(&entries), vec![0, 1, 2, 10]);
    }

    #[test]
    fn test_numeric_ties_broken_by_name() {
        let mut entries = vec![entry("b_1.png"), entry("a_01.png"), entry("a_0.png")];
        sort_entries(&mut entries, SortOrder::Numeric);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a_0.png", "a_01.png", "b_1.png"]);
    }

    #[test]
    fn test_entry_rejects_malformed_name() {
        let err = ImageEntry::from_name(Path::new("out"), "readme.txt".to_string()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedFilename {
                source: FilenameError::MissingSeparator,
                ..
            }
        ));
    }

    #[test]
    fn test_recover_char_from_red_channel() {
        let decoder = Decoder::default();
        let mut img = RgbaImage::from_pixel(128, 128, Rgba([1, 2, 3, 255]));
        // Index 0: position (17, 23), rotation 5. 'C' rotates to 'H'.
        img.put_pixel(17, 23, Rgba([b'H', 200, 200, 255]));
        assert_eq!(decoder.recover_char(0, &img), Some('C'));
    }

    #[test]
    fn test_recover_char_passes_non_letters_through() {
        let decoder = Decoder::default();
        let mut img = RgbaImage::new(128, 128);
        let (x, y) = position(3, Dimensions::default());
        img.put_pixel(x, y, Rgba([b'{', 0, 0, 0]));
        assert_eq!(decoder.recover_char(3, &img), Some('{'));
    }

    #[test]
    fn test_recover_char_high_byte_is_latin1() {
        let decoder = Decoder::default();
        let mut img = RgbaImage::new(128, 128);
        let (x, y) = position(4, Dimensions::default());
        img.put_pixel(x, y, Rgba([0xE9, 0, 0, 0]));
        assert_eq!(decoder.recover_char(4, &img), Some('é'));
    }

    #[test]
    fn test_recover_char_every_index_matches_rotation() {
        let decoder = Decoder::default();
        for index in 0..64u64 {
            let secret = (b'a' + (index % 26) as u8) as char;
            let mut img = RgbaImage::new(128, 128);
            let (x, y) = position(index, Dimensions::default());
            let hidden = rotate(secret, rotation_amount(index));
            img.put_pixel(x, y, Rgba([hidden as u8, 0, 0, 255]));
            assert_eq!(decoder.recover_char(index, &img), Some(secret));
        }
    }

    #[test]
    fn test_recover_char_out_of_bounds() {
        let decoder = Decoder::default();
        let img = RgbaImage::new(8, 8);
        // Index 0 reads (17, 23), outside an 8x8 image.
        assert_eq!(decoder.recover_char(0, &img), None);
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        let result = Decoder::new(Dimensions::new(0, 128), SortOrder::Lexicographic);
        assert!(matches!(
            result,
            Err(DecodeError::InvalidDimensions { width: 0, height: 128 })
        ));
    }

    #[test]
    fn test_flag_display() {
        let mut flag = Flag::new();
        flag.push('T');
        flag.push('U');
        flag.push('D');
        assert_eq!(flag.to_string(), "TUD");
        assert_eq!(flag.as_str(), "TUD");
        assert_eq!(flag.into_string(), "TUD".to_string());
    }
}
