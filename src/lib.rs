//! Recovers a message hidden across a sequence of noise images, one
//! Caesar-rotated character per image, and generates such sequences.

pub mod common;
pub mod filename;
pub mod processing;
pub mod scheme;

pub use processing::{Decoder, Flag, SortOrder};
pub use scheme::Dimensions;
