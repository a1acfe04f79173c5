//! # Configuration Utilities
//!
//! TOML configuration for the decoder. Every field is optional; an absent file
//! or table falls back to the defaults (read `out/`, 128×128 images,
//! lexicographic order).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::processing::decoder::SortOrder;
use crate::scheme::Dimensions;

/// Default directory scanned for images, relative to the working directory.
pub const DEFAULT_INPUT_DIR: &str = "out";

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let settings: DecoderSettings = load_config("config/decode.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Top-level decoder configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderSettings {
    /// Where to look for images and how to order them
    pub decoder: DecoderSection,
    /// Dimensions the positional scheme is computed against
    pub image: Dimensions,
}

impl DecoderSettings {
    /// Apply command-line values on top of the file's; `None` keeps the file value.
    pub fn with_overrides(mut self, input_dir: Option<PathBuf>, order: Option<SortOrder>) -> Self {
        if let Some(dir) = input_dir {
            self.decoder.input_dir = dir;
        }
        if let Some(order) = order {
            self.decoder.order = order;
        }
        self
    }
}

/// The `[decoder]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderSection {
    /// Directory holding the image sequence (e.g., "out")
    pub input_dir: PathBuf,
    /// Processing order of the files
    pub order: SortOrder,
}

impl Default for DecoderSection {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            order: SortOrder::default(),
        }
    }
}
