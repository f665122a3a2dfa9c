#![forbid(unsafe_code)]

//! Break boundaries and codepoint classes.
//!
//! The wrapping core never decides where a line may break or what counts
//! as whitespace. Both decisions come from the two traits in this module:
//!
//! - [`LineSegmenter`] yields the ordered byte offsets at which a line may
//!   end (the boundary list).
//! - [`CodepointClass`] answers "is this a hard line break?" and "is this
//!   whitespace?" for single codepoints.
//!
//! [`UaxSegmenter`] and [`UnicodeClasses`] are the stock implementations
//! (UAX #14 line breaking, `White_Space` property).
//!
//! # Example
//! ```
//! use linewrap::segment::{LineSegmenter, UaxSegmenter};
//!
//! let offsets = UaxSegmenter::new().boundaries("one two three");
//! assert_eq!(offsets, vec![0, 4, 8, 13]);
//! ```

use unicode_linebreak::linebreaks;

/// Source of legal line-break positions.
///
/// Offsets are byte positions into `text`, strictly increasing. A complete
/// list starts at `0` and ends at `text.len()`; consecutive offsets delimit
/// one token each. Fewer than two offsets means the text has no usable
/// break point.
pub trait LineSegmenter {
    fn boundaries(&self, text: &str) -> Vec<usize>;
}

impl<F> LineSegmenter for F
where
    F: Fn(&str) -> Vec<usize>,
{
    fn boundaries(&self, text: &str) -> Vec<usize> {
        self(text)
    }
}

/// Per-codepoint classification consulted while measuring tokens.
///
/// Implementations must be pure: the same codepoint always classifies the
/// same way for the lifetime of a wrapping call.
pub trait CodepointClass {
    /// Codepoints that force a line break (text containing them cannot be
    /// wrapped).
    fn is_hard_break(&self, c: char) -> bool;

    /// Codepoints that are invisible at the end of a line.
    fn is_whitespace(&self, c: char) -> bool;
}

/// Line-break segmentation per Unicode Standard Annex #14.
///
/// The locale is recorded for callers that tailor segmentation per
/// language; the UAX #14 default rules themselves are locale independent.
#[derive(Debug, Clone, Default)]
pub struct UaxSegmenter {
    locale: Option<String>,
}

impl UaxSegmenter {
    /// Create a segmenter using the default (root) rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter for the given locale identifier.
    #[must_use]
    pub fn for_locale(locale: Option<&str>) -> Self {
        if let Some(tag) = locale {
            tracing::debug!(locale = tag, "uax14 segmenter has no locale tailoring");
        }
        Self {
            locale: locale.map(str::to_owned),
        }
    }

    /// Locale this segmenter was created for, if any.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

impl LineSegmenter for UaxSegmenter {
    fn boundaries(&self, text: &str) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(text.len() / 4 + 2);
        offsets.push(0);
        for (offset, _) in linebreaks(text) {
            if offset > 0 {
                offsets.push(offset);
            }
        }
        offsets
    }
}

/// Stock codepoint classes.
///
/// Hard breaks follow the Unicode newline guidelines (UTR #13):
/// `U+000A..=U+000D`, `U+0085`, `U+2028`, `U+2029`. Whitespace is the
/// `White_Space` property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnicodeClasses;

impl CodepointClass for UnicodeClasses {
    #[inline]
    fn is_hard_break(&self, c: char) -> bool {
        matches!(
            c,
            '\u{000A}'..='\u{000D}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
        )
    }

    #[inline]
    fn is_whitespace(&self, c: char) -> bool {
        c.is_whitespace()
    }
}

/// Bring a collaborator-supplied boundary list into canonical form.
///
/// Lists with fewer than two offsets are returned unchanged (no usable
/// break point). Otherwise the result starts at `0`, ends at `text.len()`,
/// is strictly increasing and only contains char boundaries; offending
/// offsets are dropped.
#[must_use]
pub fn normalize_boundaries(text: &str, raw: Vec<usize>) -> Vec<usize> {
    if raw.len() <= 1 {
        return raw;
    }

    let mut offsets = Vec::with_capacity(raw.len() + 2);
    offsets.push(0);
    let mut dropped = 0usize;
    for offset in raw {
        if offset == 0 {
            continue;
        }
        let last = offsets.last().copied().unwrap_or(0);
        if offset <= last || offset > text.len() || !text.is_char_boundary(offset) {
            dropped += 1;
            continue;
        }
        offsets.push(offset);
    }
    if offsets.last().copied() != Some(text.len()) {
        offsets.push(text.len());
    }

    if dropped > 0 {
        tracing::warn!(dropped, len = text.len(), "ignored invalid break offsets");
    }
    offsets
}
