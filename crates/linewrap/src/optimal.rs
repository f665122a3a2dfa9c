#![forbid(unsafe_code)]

//! Minimum-raggedness wrapping.
//!
//! Chooses the break set that minimizes the sum of a convex penalty on the
//! unused space of every line, including the last one. This is the
//! non-hyphenating core of Knuth's paragraph formatter, reduced to a single
//! cost term.
//!
//! ## Cost Model
//!
//! For a line holding tokens `i..=j`:
//!
//! ```text
//! used  = original[i] + ... + original[j-1] + trimmed[j]
//! slack = width - used
//! ```
//!
//! - `slack >= 0`: cost is `slack ^ exponent`.
//! - `slack < 0`, `i == j`: cost is 0. A single over-wide token cannot be
//!   shortened, so it is not penalized.
//! - `slack < 0`, `i < j`: infeasible.
//!
//! For fixed `i`, once `i..=j` is infeasible so is every longer line, so
//! each row of the [`CostMatrix`] stops at its first infeasible entry.
//!
//! ## DP Recurrence
//!
//! ```text
//! best[j] = min over k in -1..j of best[k] + cost(k+1, j),   best[-1] = 0
//! ```
//!
//! `k = -1` is "tokens `0..=j` on one line". Back pointers recover the
//! break set from `best[n-1]`.
//!
//! ## Tie-Breaking
//!
//! Candidates are scanned in increasing `k` and only a strictly smaller
//! total replaces the current one, so among equal-cost choices the
//! smallest `k` wins (no split at all, if that ties). The first feasible
//! candidate is always accepted, so totals that overflow to infinity still
//! yield a feasible break set.

use crate::measure::Token;
use crate::wrap::WrapPoints;

/// Penalty of placing a token range on one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineCost {
    Feasible(f64),
    /// The range does not fit on one line.
    Infeasible,
}

impl LineCost {
    /// The penalty, if feasible.
    #[inline]
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Feasible(cost) => Some(cost),
            Self::Infeasible => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_feasible(self) -> bool {
        matches!(self, Self::Feasible(_))
    }
}

/// Cost of a line whose visible content is `used` wide.
///
/// `single` tells whether the line holds exactly one token.
#[inline]
#[must_use]
pub fn line_penalty(used: usize, width: usize, single: bool, exponent: f64) -> LineCost {
    if used > width {
        return if single {
            LineCost::Feasible(0.0)
        } else {
            LineCost::Infeasible
        };
    }
    LineCost::Feasible(((width - used) as f64).powf(exponent))
}

/// Upper-triangular table of [`LineCost`]s, `cost(i, j)` for `i <= j`.
///
/// Row `i` only stores its feasible prefix; everything past it is
/// infeasible. Lives for one wrapping call.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    rows: Vec<Vec<f64>>,
}

impl CostMatrix {
    /// Build the table, carrying each row's `used` width forward.
    #[must_use]
    pub fn build(tokens: &[Token], width: usize, exponent: f64) -> Self {
        let n = tokens.len();
        let mut rows = Vec::with_capacity(n);

        for i in 0..n {
            let mut row = Vec::new();
            let mut used = 0usize;
            for j in i..n {
                if j > i {
                    // The previous last token is now interior: count its whitespace.
                    let prev = &tokens[j - 1];
                    used += prev.original_width - prev.trimmed_width;
                }
                used += tokens[j].trimmed_width;

                match line_penalty(used, width, i == j, exponent) {
                    LineCost::Feasible(cost) => row.push(cost),
                    LineCost::Infeasible => break,
                }
            }
            rows.push(row);
        }

        Self { rows }
    }

    /// Number of tokens the table covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cost of tokens `i..=j` on one line. Out-of-range or `i > j` is
    /// infeasible.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> LineCost {
        if i > j {
            return LineCost::Infeasible;
        }
        self.rows
            .get(i)
            .and_then(|row| row.get(j - i))
            .map_or(LineCost::Infeasible, |&cost| LineCost::Feasible(cost))
    }
}

/// Optimal wrap: the break set of minimum total penalty.
///
/// `exponent` must be positive; larger values punish loose lines harder.
/// Returns the indices of tokens after which a line break goes.
#[must_use]
pub fn wrap_optimal(tokens: &[Token], width: usize, exponent: f64) -> WrapPoints {
    let n = tokens.len();
    if n == 0 {
        return WrapPoints::new();
    }

    let costs = CostMatrix::build(tokens, width, exponent);

    // best[j]: minimum total cost of tokens 0..=j.
    // split[j]: break preceding the last line of that optimum (None: no break).
    let mut best = vec![f64::INFINITY; n];
    let mut split: Vec<Option<usize>> = vec![None; n];

    for j in 0..n {
        // The first feasible start is taken even if its total overflowed to
        // infinity; a single-token line is always feasible, so one exists.
        let mut incumbent: Option<(f64, Option<usize>)> = None;
        for start in 0..=j {
            let Some(line) = costs.get(start, j).value() else {
                continue;
            };
            let prefix = match start {
                0 => 0.0,
                s => best[s - 1],
            };
            let candidate = prefix + line;
            if incumbent.is_none_or(|(total, _)| candidate < total) {
                incumbent = Some((candidate, start.checked_sub(1)));
            }
        }
        if let Some((total, at)) = incumbent {
            best[j] = total;
            split[j] = at;
        }
    }

    let mut points = WrapPoints::new();
    let mut cursor = split[n - 1];
    while let Some(k) = cursor {
        points.push(k);
        cursor = split[k];
    }
    points.reverse();

    tracing::trace!(
        tokens = n,
        total_cost = best[n - 1],
        breaks = points.len(),
        "optimal wrap solved"
    );
    points
}

/// Per-line costs of an arbitrary break set under the cost model above.
///
/// Lets break sets from any algorithm be compared on equal terms.
#[must_use]
pub fn line_costs(tokens: &[Token], points: &[usize], width: usize, exponent: f64) -> Vec<LineCost> {
    let Some(last) = tokens.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut costs = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for &end in points.iter().chain(std::iter::once(&last)) {
        let line = match tokens.get(start..=end) {
            Some(line) if !line.is_empty() => line,
            _ => {
                costs.push(LineCost::Infeasible);
                break;
            }
        };
        let used = line
            .split_last()
            .map_or(0, |(tail, interior)| {
                interior.iter().map(|t| t.original_width).sum::<usize>() + tail.trimmed_width
            });
        costs.push(line_penalty(used, width, start == end, exponent));
        start = end + 1;
    }
    costs
}

/// Sum of [`line_costs`]; infinite if any line is infeasible.
#[must_use]
pub fn penalty_of(tokens: &[Token], points: &[usize], width: usize, exponent: f64) -> f64 {
    line_costs(tokens, points, width, exponent)
        .into_iter()
        .map(|cost| cost.value().unwrap_or(f64::INFINITY))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::greedy::wrap_greedy;
    use crate::measure::tokens_from_widths;

    fn optimal(widths: &[(usize, usize)], width: usize, exponent: f64) -> Vec<usize> {
        wrap_optimal(&tokens_from_widths(widths), width, exponent).to_vec()
    }

    // "aaa " "bb " "cc " "ddddd"
    const RAGGED: [(usize, usize); 4] = [(4, 3), (3, 2), (3, 2), (5, 5)];

    // ==========================================================================
    // line_penalty / CostMatrix
    // ==========================================================================

    #[test]
    fn penalty_is_slack_to_the_exponent() {
        assert_eq!(line_penalty(7, 10, false, 2.0), LineCost::Feasible(9.0));
        assert_eq!(line_penalty(7, 10, false, 1.0), LineCost::Feasible(3.0));
        assert_eq!(line_penalty(10, 10, false, 3.0), LineCost::Feasible(0.0));
    }

    #[test]
    fn overwide_single_token_costs_nothing() {
        assert_eq!(line_penalty(15, 10, true, 2.0), LineCost::Feasible(0.0));
        assert_eq!(line_penalty(15, 10, false, 2.0), LineCost::Infeasible);
    }

    #[test]
    fn matrix_counts_only_last_token_trimmed() {
        let tokens = tokens_from_widths(&RAGGED);
        let m = CostMatrix::build(&tokens, 6, 1.0);
        assert_eq!(m.len(), 4);
        // "aaa" -> 3 used
        assert_eq!(m.get(0, 0), LineCost::Feasible(3.0));
        // "aaa bb" -> 4 + 2 = 6 used
        assert_eq!(m.get(0, 1), LineCost::Feasible(0.0));
        // "aaa bb cc" -> 4 + 3 + 2 = 9 used
        assert_eq!(m.get(0, 2), LineCost::Infeasible);
        // "bb cc" -> 3 + 2 = 5 used
        assert_eq!(m.get(1, 2), LineCost::Feasible(1.0));
        assert_eq!(m.get(2, 3), LineCost::Infeasible);
        assert_eq!(m.get(3, 3), LineCost::Feasible(1.0));
    }

    #[test]
    fn matrix_infeasibility_is_monotone() {
        let tokens = tokens_from_widths(&RAGGED);
        let m = CostMatrix::build(&tokens, 6, 2.0);
        for i in 0..m.len() {
            let mut seen_infeasible = false;
            for j in i..m.len() {
                let feasible = m.get(i, j).is_feasible();
                assert!(!(seen_infeasible && feasible), "row {i} col {j}");
                seen_infeasible |= !feasible;
            }
        }
    }

    #[test]
    fn matrix_out_of_range_is_infeasible() {
        let tokens = tokens_from_widths(&[(2, 2)]);
        let m = CostMatrix::build(&tokens, 6, 2.0);
        assert_eq!(m.get(1, 0), LineCost::Infeasible);
        assert_eq!(m.get(0, 5), LineCost::Infeasible);
        assert!(CostMatrix::build(&[], 6, 2.0).is_empty());
    }

    // ==========================================================================
    // wrap_optimal
    // ==========================================================================

    #[test]
    fn empty_and_single() {
        assert!(optimal(&[], 5, 2.0).is_empty());
        assert!(optimal(&[(3, 3)], 5, 2.0).is_empty());
        assert!(optimal(&[(30, 30)], 5, 2.0).is_empty());
    }

    #[test]
    fn fits_on_one_line() {
        assert!(optimal(&[(4, 3), (3, 2), (2, 2)], 20, 2.0).is_empty());
    }

    #[test]
    fn beats_greedy_on_ragged_text() {
        // greedy: "aaa bb" | "cc" | "ddddd" -> 0 + 16 + 1 = 17
        // optimal: "aaa" | "bb cc" | "ddddd" -> 9 + 1 + 1 = 11
        let tokens = tokens_from_widths(&RAGGED);
        let greedy = wrap_greedy(&tokens, 6);
        let best = wrap_optimal(&tokens, 6, 2.0);
        assert_eq!(greedy.as_slice(), &[1, 2]);
        assert_eq!(best.as_slice(), &[0, 2]);
        assert_eq!(penalty_of(&tokens, &greedy, 6, 2.0), 17.0);
        assert_eq!(penalty_of(&tokens, &best, 6, 2.0), 11.0);
    }

    #[test]
    fn ties_prefer_earliest_split() {
        // With exponent 1 both {0, 2} and {1, 2} cost 5; the last line's
        // predecessor is chosen with the smallest split index.
        let tokens = tokens_from_widths(&RAGGED);
        assert_eq!(penalty_of(&tokens, &[0, 2], 6, 1.0), 5.0);
        assert_eq!(penalty_of(&tokens, &[1, 2], 6, 1.0), 5.0);
        assert_eq!(optimal(&RAGGED, 6, 1.0), vec![0, 2]);
    }

    #[test]
    fn overwide_token_is_isolated() {
        assert_eq!(optimal(&[(3, 2), (12, 12), (3, 3)], 5, 2.0), vec![0, 1]);
    }

    #[test]
    fn balances_lines_under_high_exponent() {
        // "aa " x 4 at width 8: greedy packs 3 + 1, optimal splits 2 + 2.
        let widths = [(3, 2); 4];
        let tokens = tokens_from_widths(&widths);
        assert_eq!(wrap_greedy(&tokens, 8).as_slice(), &[2]);
        assert_eq!(optimal(&widths, 8, 3.0), vec![1]);
    }

    #[test]
    fn overflowing_penalties_still_respect_width() {
        // 15 ^ 5000 is infinite: every multi-line candidate totals inf.
        let widths = [(4, 3), (6, 5), (6, 5), (4, 3), (6, 5), (5, 4), (4, 3), (5, 4), (3, 3)];
        let tokens = tokens_from_widths(&widths);
        let points = wrap_optimal(&tokens, 20, 5000.0);
        assert!(!points.is_empty());
        assert!(
            line_costs(&tokens, &points, 20, 5000.0)
                .iter()
                .all(|c| c.is_feasible()),
            "{points:?}"
        );
    }

    #[test]
    fn overflow_ties_keep_scan_order() {
        // Every layout totals inf, so each prefix keeps its first feasible start.
        let tokens = tokens_from_widths(&RAGGED);
        let points = wrap_optimal(&tokens, 6, f64::MAX);
        assert_eq!(points.as_slice(), &[0, 2]);
    }

    #[test]
    fn dp_total_matches_recomputed_penalty() {
        let widths: Vec<(usize, usize)> = (0..40).map(|i| (i % 5 + 2, i % 5 + 1)).collect();
        let tokens = tokens_from_widths(&widths);
        let points = wrap_optimal(&tokens, 14, 2.0);
        let costs = line_costs(&tokens, &points, 14, 2.0);
        assert_eq!(costs.len(), points.len() + 1);
        assert!(costs.iter().all(|c| c.is_feasible()));
    }

    // ==========================================================================
    // line_costs
    // ==========================================================================

    #[test]
    fn line_costs_flags_infeasible_lines() {
        let tokens = tokens_from_widths(&RAGGED);
        let costs = line_costs(&tokens, &[2], 6, 1.0);
        assert_eq!(costs, vec![LineCost::Infeasible, LineCost::Feasible(1.0)]);
        assert_eq!(penalty_of(&tokens, &[2], 6, 1.0), f64::INFINITY);
    }

    #[test]
    fn line_costs_of_nothing() {
        assert!(line_costs(&[], &[], 6, 1.0).is_empty());
    }
}
