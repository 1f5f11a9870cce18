//! Display-width primitive (`dw`).
//!
//! Delegates entirely to `unicode-width`: ASCII characters cost one display
//! column, East-Asian Fullwidth/Wide characters cost two.

use unicode_width::UnicodeWidthStr;

/// Display columns consumed by `s` when printed to a monospace terminal.
pub fn dw(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_is_length() {
        assert_eq!(dw("hello"), 5);
        assert_eq!(dw(""), 0);
    }

    #[test]
    fn wide_characters_cost_two() {
        // CJK ideographs are double-width.
        assert_eq!(dw("日本語"), 6);
        assert_eq!(dw("a日b"), 4);
    }
}
