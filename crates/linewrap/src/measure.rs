//! Token measurement.
//!
//! A token is the text between two consecutive boundaries. Wrapping needs
//! two widths per token: the full width, and the width without its
//! trailing whitespace run (what remains visible when the token ends a
//! line). The byte offset where that visible part ends is recorded too, so
//! lines can be sliced out of the source without trailing blanks.

use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::segment::CodepointClass;

/// Unit used to measure token widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthMetric {
    /// One unit per Unicode scalar value.
    #[default]
    Codepoints,
    /// Terminal cell width (East Asian wide characters count 2, combining
    /// marks 0).
    Cells,
}

impl WidthMetric {
    /// Width of a single codepoint under this metric.
    #[inline]
    #[must_use]
    pub fn of(self, c: char) -> usize {
        match self {
            Self::Codepoints => 1,
            Self::Cells => c.width().unwrap_or(0),
        }
    }

    /// Parse a metric name (`codepoints` or `cells`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "codepoints" | "codepoint" | "chars" => Some(Self::Codepoints),
            "cells" | "cell" | "columns" => Some(Self::Cells),
            _ => None,
        }
    }
}

impl fmt::Display for WidthMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Codepoints => "codepoints",
            Self::Cells => "cells",
        })
    }
}

/// A measured token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Byte offset of the token's first byte.
    pub start: usize,
    /// Byte offset one past the token's last byte.
    pub end: usize,
    /// Byte offset one past the last non-whitespace codepoint, or `start`
    /// if the token is all whitespace.
    pub end_trimmed: usize,
    /// Width including trailing whitespace.
    pub original_width: usize,
    /// Width excluding the trailing whitespace run.
    pub trimmed_width: usize,
}

/// A hard line-break codepoint found while measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardBreak {
    pub byte_offset: usize,
    pub codepoint: char,
}

/// Measure the tokens delimited by `boundaries`.
///
/// `boundaries` must be in the canonical form produced by
/// [`normalize_boundaries`](crate::segment::normalize_boundaries). Fewer
/// than two offsets yield no tokens.
///
/// # Errors
///
/// Returns the first codepoint that `classes` reports as a hard line
/// break. The whole text is scanned, so a newline anywhere is found.
pub fn measure_tokens<C>(
    text: &str,
    boundaries: &[usize],
    classes: &C,
    metric: WidthMetric,
) -> Result<Vec<Token>, HardBreak>
where
    C: CodepointClass + ?Sized,
{
    if boundaries.len() < 2 {
        return Ok(Vec::new());
    }

    let token_count = boundaries.len() - 1;
    let mut tokens = Vec::with_capacity(token_count);

    let mut start = boundaries[0];
    let mut width = 0usize;
    let mut trailing_ws = 0usize;
    let mut end_trimmed = start;

    for (offset, c) in text.char_indices() {
        if classes.is_hard_break(c) {
            return Err(HardBreak {
                byte_offset: offset,
                codepoint: c,
            });
        }

        let next = offset + c.len_utf8();
        let w = metric.of(c);
        width += w;
        if classes.is_whitespace(c) {
            trailing_ws += w;
        } else {
            trailing_ws = 0;
            end_trimmed = next;
        }

        let block = tokens.len();
        if block < token_count && (next >= text.len() || boundaries[block + 1] <= next) {
            tokens.push(Token {
                start,
                end: next,
                end_trimmed,
                original_width: width,
                trimmed_width: width - trailing_ws,
            });
            start = next;
            width = 0;
            trailing_ws = 0;
            end_trimmed = next;
        }
    }

    Ok(tokens)
}

/// Tokens for an ASCII text with the given `(original, trimmed)` widths.
#[cfg(test)]
pub(crate) fn tokens_from_widths(widths: &[(usize, usize)]) -> Vec<Token> {
    let mut start = 0;
    widths
        .iter()
        .map(|&(original_width, trimmed_width)| {
            let token = Token {
                start,
                end: start + original_width,
                end_trimmed: start + trimmed_width,
                original_width,
                trimmed_width,
            };
            start += original_width;
            token
        })
        .collect()
}
