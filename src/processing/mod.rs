//! # Image Processing
//!
//! Hiding and recovering a message one character per image.
//!
//! - [`decoder`]: reads the secret pixel of each image and reassembles the flag
//! - [`generator`]: writes a noise image sequence carrying a flag

pub mod decoder;
pub mod generator;

// Re-export main types for convenience
pub use decoder::{DecodeError, Decoder, Flag, SortOrder};
pub use generator::{generate, GenerateError, GenerateOptions, OutputFormat};
