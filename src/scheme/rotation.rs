//! Caesar rotation restricted to ASCII letters.
//!
//! Upper- and lowercase letters rotate within their own alphabet. Every other
//! character, including non-ASCII letters, passes through unchanged.

/// Number of letters in each rotated alphabet.
pub const ALPHABET_LEN: u8 = 26;

/// Shift `c` forward by `amount` positions within its alphabet.
pub fn rotate(c: char, amount: u8) -> char {
    let base = match c {
        'A'..='Z' => b'A',
        'a'..='z' => b'a',
        _ => return c,
    };
    let offset = (c as u8 - base + amount % ALPHABET_LEN) % ALPHABET_LEN;
    char::from(base + offset)
}

/// Undo [`rotate`] with the same `amount`.
pub fn unrotate(c: char, amount: u8) -> char {
    rotate(c, (ALPHABET_LEN - amount % ALPHABET_LEN) % ALPHABET_LEN)
}
