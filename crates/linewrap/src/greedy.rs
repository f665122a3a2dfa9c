//! First-fit line filling.

use crate::measure::Token;
use crate::wrap::WrapPoints;

/// Greedy wrap: fill each line with as many tokens as fit, left to right.
///
/// A candidate token fits when the running line width plus its *trimmed*
/// width stays within `width`; once placed it contributes its full width,
/// trailing whitespace included. A token that alone exceeds `width` still
/// gets a line of its own. Never looks ahead.
///
/// Returns the indices of tokens after which a line break goes.
#[must_use]
pub fn wrap_greedy(tokens: &[Token], width: usize) -> WrapPoints {
    let mut points = WrapPoints::new();
    let Some(first) = tokens.first() else {
        return points;
    };

    let mut line_width = first.original_width;
    for (j, token) in tokens.iter().enumerate().skip(1) {
        if line_width + token.trimmed_width > width {
            points.push(j - 1);
            line_width = token.original_width;
        } else {
            line_width += token.original_width;
        }
    }

    points
}
