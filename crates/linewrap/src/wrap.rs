#![forbid(unsafe_code)]

//! Wrapping orchestration.
//!
//! For each input string: ask the segmenter for break boundaries, measure
//! the tokens between them, run one wrapping algorithm, then slice the
//! resulting lines out of the source.
//!
//! # Example
//! ```
//! use linewrap::wrap::wrap_text;
//!
//! // Greedy (exponent <= 0)
//! let lines = wrap_text("aaa bb cc ddddd", 6, 0.0).unwrap();
//! assert_eq!(lines, vec!["aaa bb", "cc", "ddddd"]);
//!
//! // Minimum raggedness
//! let lines = wrap_text("aaa bb cc ddddd", 6, 2.0).unwrap();
//! assert_eq!(lines, vec!["aaa", "bb cc", "ddddd"]);
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Scope | Behavior |
//! |---------|-------|----------|
//! | Width `<= 0`, NaN exponent | whole call | `WrapError::InvalidConfig` before any element |
//! | Absent element | element | `WrappedText::Absent` |
//! | Malformed UTF-8 | element | `WrappedText::Verbatim` with the original bytes |
//! | Hard line break, `Fail` policy | whole call | `WrapError::EmbeddedLineBreak` |
//! | Hard line break, `PassThrough` policy | element | element returned unwrapped |

use std::fmt;

use smallvec::SmallVec;

use crate::config::{LineBreakPolicy, WrapConfig};
use crate::error::{ConfigError, WrapError};
use crate::greedy::wrap_greedy;
use crate::measure::{Token, WidthMetric, measure_tokens};
use crate::optimal::{LineCost, line_costs, wrap_optimal};
use crate::segment::{
    CodepointClass, LineSegmenter, UaxSegmenter, UnicodeClasses, normalize_boundaries,
};

/// Token indices after which a line break is inserted, increasing.
pub type WrapPoints = SmallVec<[usize; 16]>;

/// Wrapping algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Algorithm {
    /// First-fit, single pass.
    Greedy,
    /// Minimum total `slack ^ exponent` over all lines.
    Optimal { exponent: f64 },
}

impl Algorithm {
    /// `exponent > 0` selects [`Optimal`](Self::Optimal), anything else
    /// [`Greedy`](Self::Greedy).
    #[must_use]
    pub fn from_exponent(exponent: f64) -> Self {
        if exponent > 0.0 {
            Self::Optimal { exponent }
        } else {
            Self::Greedy
        }
    }

    /// Break indices for `tokens` at the given width.
    #[must_use]
    pub fn wrap_points(self, tokens: &[Token], width: usize) -> WrapPoints {
        match self {
            Self::Greedy => wrap_greedy(tokens, width),
            Self::Optimal { exponent } => wrap_optimal(tokens, width, exponent),
        }
    }

    /// Exponent used to score lines. Greedy output is scored linearly.
    #[must_use]
    pub fn penalty_exponent(self) -> f64 {
        match self {
            Self::Greedy => 1.0,
            Self::Optimal { exponent } => exponent,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greedy => f.write_str("greedy"),
            Self::Optimal { exponent } => write!(f, "optimal(exponent={exponent})"),
        }
    }
}

/// Chosen breaks for one string, with diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Breaks {
    /// Token indices after which a line break goes.
    pub points: WrapPoints,
    /// Per-line penalty, scored with [`Algorithm::penalty_exponent`].
    pub line_costs: Vec<LineCost>,
    /// Sum of `line_costs` (infinite if any line is infeasible).
    pub total_cost: f64,
}

/// Wrapping result for one element of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrappedText {
    /// The wrapped lines, trailing whitespace removed at each break.
    Lines(Vec<String>),
    /// The input element was absent.
    Absent,
    /// The element could not be wrapped and is returned as given.
    Verbatim(Vec<u8>),
}

impl WrappedText {
    /// The lines, if the element was wrapped.
    #[must_use]
    pub fn lines(&self) -> Option<&[String]> {
        match self {
            Self::Lines(lines) => Some(lines.as_slice()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Tokens of one element, or why there are none.
enum Layout {
    /// Fewer than two boundaries: the text is one unbreakable line.
    Unbreakable,
    /// Hard line break under [`LineBreakPolicy::PassThrough`].
    PassedThrough,
    Tokens(Vec<Token>),
}

/// A validated wrapping setup with its segmentation collaborators.
#[derive(Debug, Clone)]
pub struct Wrapper<S = UaxSegmenter, C = UnicodeClasses> {
    width: usize,
    algorithm: Algorithm,
    metric: WidthMetric,
    policy: LineBreakPolicy,
    segmenter: S,
    classes: C,
}

impl Wrapper {
    /// Wrapper with UAX #14 segmentation for `config.locale` and the stock
    /// codepoint classes.
    ///
    /// # Errors
    ///
    /// [`WrapError::InvalidConfig`] listing every violation.
    pub fn new(config: &WrapConfig) -> Result<Self, WrapError> {
        let segmenter = UaxSegmenter::for_locale(config.locale.as_deref());
        Self::with_collaborators(config, segmenter, UnicodeClasses)
    }
}

impl<S, C> Wrapper<S, C>
where
    S: LineSegmenter,
    C: CodepointClass,
{
    /// Wrapper with injected segmentation collaborators.
    ///
    /// # Errors
    ///
    /// [`WrapError::InvalidConfig`] listing every violation.
    pub fn with_collaborators(
        config: &WrapConfig,
        segmenter: S,
        classes: C,
    ) -> Result<Self, WrapError> {
        config.validate()?;
        let width = usize::try_from(config.width).map_err(|_| {
            WrapError::InvalidConfig(vec![ConfigError::new(
                "width",
                config.width.to_string(),
                "out of range",
            )])
        })?;

        let algorithm = config.algorithm();
        tracing::debug!(width, %algorithm, metric = %config.width_metric, "wrapper configured");
        Ok(Self {
            width,
            algorithm,
            metric: config.width_metric,
            policy: config.line_break_policy,
            segmenter,
            classes,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Wrap one string, returning borrowed line slices.
    ///
    /// # Errors
    ///
    /// [`WrapError::EmbeddedLineBreak`] if `text` contains a hard line
    /// break and the policy is [`LineBreakPolicy::Fail`].
    pub fn wrap_str<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, WrapError> {
        self.wrap_element(0, text)
    }

    /// Break set and line costs for one string, without slicing lines.
    ///
    /// Returns `None` when the string is not broken at all (no usable
    /// break point, or passed through).
    ///
    /// # Errors
    ///
    /// As [`wrap_str`](Self::wrap_str).
    pub fn breaks(&self, text: &str) -> Result<Option<Breaks>, WrapError> {
        let Layout::Tokens(tokens) = self.layout(0, text)? else {
            return Ok(None);
        };
        let points = self.algorithm.wrap_points(&tokens, self.width);
        let costs = line_costs(
            &tokens,
            &points,
            self.width,
            self.algorithm.penalty_exponent(),
        );
        let total_cost = costs
            .iter()
            .map(|cost| cost.value().unwrap_or(f64::INFINITY))
            .sum();
        Ok(Some(Breaks {
            points,
            line_costs: costs,
            total_cost,
        }))
    }

    /// Wrap one raw element. Malformed UTF-8 comes back verbatim.
    ///
    /// # Errors
    ///
    /// As [`wrap_str`](Self::wrap_str).
    pub fn wrap_bytes(&self, bytes: &[u8]) -> Result<WrappedText, WrapError> {
        self.wrap_item(0, Some(bytes))
    }

    /// Wrap a batch of possibly absent raw elements.
    ///
    /// Elements are independent; absent and malformed ones are handled in
    /// place. A hard line break under [`LineBreakPolicy::Fail`] aborts the
    /// call and no output is produced.
    ///
    /// # Errors
    ///
    /// [`WrapError::EmbeddedLineBreak`] naming the first offending element.
    pub fn wrap_batch<'b, I>(&self, items: I) -> Result<Vec<WrappedText>, WrapError>
    where
        I: IntoIterator<Item = Option<&'b [u8]>>,
    {
        items
            .into_iter()
            .enumerate()
            .map(|(element, item)| self.wrap_item(element, item))
            .collect()
    }

    fn wrap_item(&self, element: usize, item: Option<&[u8]>) -> Result<WrappedText, WrapError> {
        let Some(bytes) = item else {
            return Ok(WrappedText::Absent);
        };
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    element,
                    valid_up_to = err.valid_up_to(),
                    "malformed utf-8, element left unwrapped"
                );
                return Ok(WrappedText::Verbatim(bytes.to_vec()));
            }
        };

        match self.layout(element, text)? {
            Layout::PassedThrough => Ok(WrappedText::Verbatim(bytes.to_vec())),
            layout => {
                let lines = self.lines_for(text, layout);
                Ok(WrappedText::Lines(
                    lines.into_iter().map(str::to_owned).collect(),
                ))
            }
        }
    }

    fn wrap_element<'a>(&self, element: usize, text: &'a str) -> Result<Vec<&'a str>, WrapError> {
        let layout = self.layout(element, text)?;
        Ok(self.lines_for(text, layout))
    }

    fn lines_for<'a>(&self, text: &'a str, layout: Layout) -> Vec<&'a str> {
        match layout {
            Layout::Unbreakable | Layout::PassedThrough => vec![text],
            Layout::Tokens(tokens) => {
                let points = self.algorithm.wrap_points(&tokens, self.width);
                tracing::trace!(breaks = ?points.as_slice(), "wrap points");
                materialize(text, &tokens, &points)
            }
        }
    }

    fn layout(&self, element: usize, text: &str) -> Result<Layout, WrapError> {
        let raw = self.segmenter.boundaries(text);
        if raw.len() <= 1 {
            return Ok(Layout::Unbreakable);
        }
        let boundaries = normalize_boundaries(text, raw);

        match measure_tokens(text, &boundaries, &self.classes, self.metric) {
            Ok(tokens) => {
                tracing::debug!(
                    element,
                    tokens = tokens.len(),
                    algorithm = %self.algorithm,
                    "measured element"
                );
                Ok(Layout::Tokens(tokens))
            }
            Err(found) => match self.policy {
                LineBreakPolicy::Fail => Err(WrapError::EmbeddedLineBreak {
                    element,
                    byte_offset: found.byte_offset,
                    codepoint: found.codepoint,
                }),
                LineBreakPolicy::PassThrough => {
                    tracing::warn!(
                        element,
                        byte_offset = found.byte_offset,
                        "line break in element, left unwrapped"
                    );
                    Ok(Layout::PassedThrough)
                }
            },
        }
    }
}

/// Slice lines out of `text` for the given break set.
///
/// Each line runs from the first byte of its first token to the trimmed
/// end of its last token; the next line starts at the token after the
/// break. No tokens means the whole text is one line.
#[must_use]
pub fn materialize<'a>(text: &'a str, tokens: &[Token], points: &[usize]) -> Vec<&'a str> {
    let Some(last) = tokens.len().checked_sub(1) else {
        return vec![text];
    };
    debug_assert!(points.iter().all(|&p| p < last));

    let mut lines = Vec::with_capacity(points.len() + 1);
    let mut line_start = tokens[0].start;
    for &k in points.iter().chain(std::iter::once(&last)) {
        let end = tokens[k].end_trimmed.max(line_start);
        lines.push(&text[line_start..end]);
        if let Some(next) = tokens.get(k + 1) {
            line_start = next.start;
        }
    }
    lines
}

/// Wrap `text` with the default collaborators.
///
/// `cost_exponent <= 0` wraps greedily; `> 0` minimizes raggedness.
///
/// # Errors
///
/// [`WrapError::InvalidConfig`] for `width == 0` or a NaN exponent;
/// [`WrapError::EmbeddedLineBreak`] if `text` contains a newline.
pub fn wrap_text(text: &str, width: usize, cost_exponent: f64) -> Result<Vec<String>, WrapError> {
    let width = i64::try_from(width).unwrap_or(i64::MAX);
    let config = WrapConfig::new(width).cost_exponent(cost_exponent);
    let wrapper = Wrapper::new(&config)?;
    Ok(wrapper
        .wrap_str(text)?
        .into_iter()
        .map(str::to_owned)
        .collect())
}
