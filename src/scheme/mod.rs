//! # Positional Scheme
//!
//! Pure functions shared by the decoder and the generator. Every image index
//! maps to exactly one pixel coordinate and one rotation amount:
//!
//! ```text
//! x = (73·i + 19·i² + 17) mod W
//! y = (131·i + 7·i² + 23) mod H
//! r = (7·i + 3·i² + 5) mod 26
//! ```
//!
//! The index is reduced modulo the target before squaring, so every `u64`
//! index is valid and nothing overflows.

pub mod rotation;

use serde::{Deserialize, Serialize};

pub use rotation::{rotate, unrotate, ALPHABET_LEN};

/// Default image width.
pub const DEFAULT_WIDTH: u32 = 128;
/// Default image height.
pub const DEFAULT_HEIGHT: u32 = 128;

/// Image dimensions the scheme is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both sides must be non-zero for the modulo arithmetic to be defined.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Evaluates `(a·i + b·i² + c) mod m` without overflow for any `i`.
fn quadratic_mod(i: u64, a: u64, b: u64, c: u64, m: u64) -> u64 {
    let m = u128::from(m);
    let i = u128::from(i) % m;
    let value = (u128::from(a) * i + u128::from(b) * i * i + u128::from(c)) % m;
    // value < m <= u64::MAX
    value as u64
}

/// Pixel coordinate holding the secret byte for image `index`.
///
/// # Panics
/// If `dims` has a zero side. Callers validate dimensions up front.
pub fn position(index: u64, dims: Dimensions) -> (u32, u32) {
    let x = quadratic_mod(index, 73, 19, 17, u64::from(dims.width));
    let y = quadratic_mod(index, 131, 7, 23, u64::from(dims.height));
    // Both values are below a u32 modulus.
    (x as u32, y as u32)
}

/// Caesar shift applied to the character hidden in image `index`, in `0..26`.
pub fn rotation_amount(index: u64) -> u8 {
    quadratic_mod(index, 7, 3, 5, u64::from(ALPHABET_LEN)) as u8
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn naive(i: u64, a: u128, b: u128, c: u128, m: u128) -> u128 {
        let i = u128::from(i);
        // i² fits in u128; the linear and quadratic terms are reduced separately.
        ((a * i) % m + (b % m) * ((i * i) % m) + c) % m
    }

    proptest! {
        /// Property: coordinates always land inside the image.
        #[test]
        fn prop_position_in_bounds(i in any::<u64>(), w in 1u32..=4096, h in 1u32..=4096) {
            let (x, y) = position(i, Dimensions::new(w, h));
            prop_assert!(x < w);
            prop_assert!(y < h);
        }

        /// Property: reducing the index first agrees with the unreduced formula.
        #[test]
        fn prop_position_matches_unreduced_formula(i in any::<u64>()) {
            let (x, y) = position(i, Dimensions::default());
            prop_assert_eq!(u128::from(x), naive(i, 73, 19, 17, 128));
            prop_assert_eq!(u128::from(y), naive(i, 131, 7, 23, 128));
        }

        /// Property: rotation amount is always a valid shift.
        #[test]
        fn prop_rotation_amount_in_range(i in any::<u64>()) {
            let r = rotation_amount(i);
            prop_assert!(r < ALPHABET_LEN);
            prop_assert_eq!(u128::from(r), naive(i, 7, 3, 5, 26));
        }
    }
}
