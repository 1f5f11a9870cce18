//! The word-wrapping primitive.
//!
//! `wrap` never fails: when a single token is wider than the available
//! width and long-word breaking is disabled, the token is emitted as its
//! own over-width line and the caller (the [`crate::oracle`]) is
//! responsible for noticing.

use unicode_width::UnicodeWidthChar;

use crate::width::dw;

/// Options threaded through to the wrapper. Mirrors the small surface
/// `textwrap::Options` exposes, kept intentionally narrow.
#[derive(Debug, Clone)]
pub struct WrapOpts {
    /// Split a token that doesn't fit on one line into multiple
    /// character-level chunks instead of leaving it over-width.
    pub break_long_words: bool,
    /// Allow breaking inside a hyphenated word at each `-`.
    pub break_on_hyphens: bool,
    /// Text prepended to every line after the first.
    pub subsequent_indent: String,
}

impl Default for WrapOpts {
    fn default() -> Self {
        WrapOpts {
            break_long_words: true,
            break_on_hyphens: false,
            subsequent_indent: String::new(),
        }
    }
}

/// One token to be placed on a line, and whether it glues directly to the
/// previous token (no intervening space), used for hyphen sub-pieces.
struct Token<'a> {
    text: &'a str,
    glue_before: bool,
}

fn tokenize(text: &str, break_on_hyphens: bool) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        if !break_on_hyphens {
            tokens.push(Token {
                text: word,
                glue_before: false,
            });
            continue;
        }
        let mut start = 0;
        let mut first_piece = true;
        for (idx, ch) in word.char_indices() {
            if ch == '-' {
                let end = idx + ch.len_utf8();
                tokens.push(Token {
                    text: &word[start..end],
                    glue_before: !first_piece,
                });
                first_piece = false;
                start = end;
            }
        }
        if start < word.len() {
            tokens.push(Token {
                text: &word[start..],
                glue_before: !first_piece,
            });
        }
    }
    tokens
}

/// Splits `token` into the longest prefix that fits within `cap` display
/// columns and the remainder. Always consumes at least one character, so
/// repeated calls make progress even when `cap` is smaller than the widest
/// character in `token`.
fn split_fitting(token: &str, cap: usize) -> (&str, &str) {
    let mut width = 0;
    let mut end = 0;
    for (idx, ch) in token.char_indices() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width > 0 && width + cw > cap {
            break;
        }
        width += cw;
        end = idx + ch.len_utf8();
    }
    if end == 0 {
        if let Some(ch) = token.chars().next() {
            end = ch.len_utf8();
        }
    }
    token.split_at(end)
}

/// Wraps `text` to `width` display columns, honoring `opts`.
///
/// Guarantees:
/// - non-empty input produces at least one line;
/// - `len(wrap(text, w1, opts)) >= len(wrap(text, w2, opts))` for `w1 <= w2`;
/// - every line has `dw(line) <= width` when `opts.break_long_words` is set;
///   otherwise a single over-long token may appear as its own over-width line.
pub fn wrap(text: &str, width: usize, opts: &WrapOpts) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let tokens = tokenize(text, opts.break_on_hyphens);
    if tokens.is_empty() {
        return vec![String::new()];
    }

    let indent_w = dw(&opts.subsequent_indent);
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut cur_width = 0usize;

    let capacity = |line_count: usize| -> usize {
        if line_count == 0 {
            width
        } else {
            width.saturating_sub(indent_w).max(1)
        }
    };

    for token in &tokens {
        let mut remaining = token.text;
        let mut glue = token.glue_before;
        loop {
            if cur_width == 0 {
                let cap = capacity(lines.len());
                let tok_w = dw(remaining);
                if tok_w <= cap {
                    cur.push_str(remaining);
                    cur_width = tok_w;
                    break;
                } else if opts.break_long_words {
                    let (chunk, rest) = split_fitting(remaining, cap);
                    lines.push(chunk.to_string());
                    if rest.is_empty() {
                        break;
                    }
                    remaining = rest;
                    glue = true;
                    continue;
                } else {
                    lines.push(remaining.to_string());
                    break;
                }
            } else {
                let cap = capacity(lines.len());
                let tok_w = dw(remaining);
                let needed = if glue { tok_w } else { 1 + tok_w };
                if cur_width + needed <= cap {
                    if !glue {
                        cur.push(' ');
                    }
                    cur.push_str(remaining);
                    cur_width += needed;
                    break;
                } else {
                    lines.push(std::mem::take(&mut cur));
                    cur_width = 0;
                    continue;
                }
            }
        }
    }

    if cur_width > 0 || lines.is_empty() {
        lines.push(cur);
    }

    if lines.len() > 1 {
        for line in lines.iter_mut().skip(1) {
            line.insert_str(0, &opts.subsequent_indent);
        }
    }

    lines
}
