//! # Filename Index Parser
//!
//! Image files are named `<anything>_<index>.<ext>`. The index is the text
//! after the first `_`, cut at the next `_` and then at the first `.`, and it
//! must consist solely of ASCII digits.

use thiserror::Error;

/// Reasons a file name does not carry a usable index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilenameError {
    /// The name has no `_` separator.
    #[error("no '_' separator before the index")]
    MissingSeparator,

    /// The segment after `_` is empty.
    #[error("index segment is empty")]
    EmptyIndex,

    /// The segment contains something other than ASCII digits.
    #[error("index segment {0:?} is not a base-10 number")]
    InvalidDigit(String),

    /// The index does not fit in 64 bits.
    #[error("index {0} is too large")]
    Overflow(String),
}

/// Extract the numeric index embedded in `name`.
///
/// # Example
/// ```
/// use just_noise::filename::parse_index;
///
/// assert_eq!(parse_index("img_007.ppm"), Ok(7));
/// assert!(parse_index("notes.txt").is_err());
/// ```
pub fn parse_index(name: &str) -> Result<u64, FilenameError> {
    let (_, rest) = name
        .split_once('_')
        .ok_or(FilenameError::MissingSeparator)?;
    let field = rest.split('_').next().unwrap_or(rest);
    let digits = field.split('.').next().unwrap_or(field);

    if digits.is_empty() {
        return Err(FilenameError::EmptyIndex);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FilenameError::InvalidDigit(digits.to_string()));
    }

    digits
        .parse::<u64>()
        .map_err(|_| FilenameError::Overflow(digits.to_string()))
}
