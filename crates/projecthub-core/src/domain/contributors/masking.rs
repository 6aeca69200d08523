//! Display masking of contributor identifiers
//!
//! This is cosmetic obfuscation for presentation, not a privacy guarantee:
//! the last characters stay visible and the length is preserved, so a masked
//! id can still be linked back to its owner. Grouping and equality always
//! use the raw identifier.

/// Character that replaces hidden positions
pub const MASK_CHAR: char = '*';

/// Number of trailing characters left visible
pub const VISIBLE_SUFFIX: usize = 3;

/// Mask all but the last three characters of an identifier.
///
/// Identifiers of three characters or fewer are returned unchanged. Length is
/// counted in characters, so multi-byte ids keep their character count.
pub fn mask(id: &str) -> String {
    let len = id.chars().count();
    if len <= VISIBLE_SUFFIX {
        return id.to_string();
    }

    let hidden = len - VISIBLE_SUFFIX;
    let mut masked: String = std::iter::repeat_n(MASK_CHAR, hidden).collect();
    masked.extend(id.chars().skip(hidden));
    masked
}
