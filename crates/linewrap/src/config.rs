//! Wrapping configuration.
//!
//! # Environment Variables
//! - `LINEWRAP_WIDTH` (positive integer)
//! - `LINEWRAP_COST_EXPONENT` (finite float; `<= 0` selects greedy wrapping)
//! - `LINEWRAP_LOCALE` (locale identifier, passed to the segmenter)
//! - `LINEWRAP_LINE_BREAK_POLICY` = fail|passthrough
//! - `LINEWRAP_WIDTH_METRIC` = codepoints|cells

use std::env;
use std::fmt;

use crate::error::ConfigError;
use crate::measure::WidthMetric;
use crate::wrap::Algorithm;

const ENV_WIDTH: &str = "LINEWRAP_WIDTH";
const ENV_COST_EXPONENT: &str = "LINEWRAP_COST_EXPONENT";
const ENV_LOCALE: &str = "LINEWRAP_LOCALE";
const ENV_LINE_BREAK_POLICY: &str = "LINEWRAP_LINE_BREAK_POLICY";
const ENV_WIDTH_METRIC: &str = "LINEWRAP_WIDTH_METRIC";

/// What to do with an element that already contains a hard line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreakPolicy {
    /// Abort the whole call with
    /// [`WrapError::EmbeddedLineBreak`](crate::error::WrapError::EmbeddedLineBreak).
    #[default]
    Fail,
    /// Return that element unwrapped and keep going.
    PassThrough,
}

impl LineBreakPolicy {
    /// Parse a policy name (`fail` or `passthrough`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" | "error" => Some(Self::Fail),
            "passthrough" | "pass-through" | "pass" => Some(Self::PassThrough),
            _ => None,
        }
    }
}

impl fmt::Display for LineBreakPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::PassThrough => "passthrough",
        })
    }
}

/// Wrapping configuration (deterministic defaults, env-overridable).
///
/// `width` is signed so that out-of-range input survives parsing and is
/// reported by [`validate`](Self::validate) rather than lost.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapConfig {
    /// Target line width.
    pub width: i64,
    /// Raggedness exponent. `<= 0` selects greedy wrapping. `NaN` means
    /// "not given"; it and infinities fail validation.
    pub cost_exponent: f64,
    pub locale: Option<String>,
    pub line_break_policy: LineBreakPolicy,
    pub width_metric: WidthMetric,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            width: 80,
            cost_exponent: 2.0,
            locale: None,
            line_break_policy: LineBreakPolicy::Fail,
            width_metric: WidthMetric::Codepoints,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct WrapConfigParse {
    pub config: WrapConfig,
    pub errors: Vec<ConfigError>,
}

impl WrapConfig {
    /// Defaults with the given width.
    #[must_use]
    pub fn new(width: i64) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cost_exponent(mut self, exponent: f64) -> Self {
        self.cost_exponent = exponent;
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn line_break_policy(mut self, policy: LineBreakPolicy) -> Self {
        self.line_break_policy = policy;
        self
    }

    #[must_use]
    pub fn width_metric(mut self, metric: WidthMetric) -> Self {
        self.width_metric = metric;
        self
    }

    /// Algorithm selected by the cost exponent.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        Algorithm::from_exponent(self.cost_exponent)
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> WrapConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Same as [`from_env_with_diagnostics`](Self::from_env_with_diagnostics)
    /// but reads variables through `get`.
    pub fn from_lookup<F>(get: F) -> WrapConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        from_env_with(get)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.width <= 0 {
            errors.push(ConfigError::new(
                "width",
                self.width.to_string(),
                "must be >= 1",
            ));
        }
        if self.cost_exponent.is_nan() {
            errors.push(ConfigError::new(
                "cost_exponent",
                "NaN",
                "must be a number",
            ));
        } else if self.cost_exponent.is_infinite() {
            errors.push(ConfigError::new(
                "cost_exponent",
                self.cost_exponent.to_string(),
                "must be finite",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Short human-readable summary for logs.
    #[must_use]
    pub fn summary_short(&self) -> String {
        format!(
            "width={} · {} · {}",
            self.width,
            self.algorithm(),
            self.width_metric
        )
    }
}

pub(crate) fn from_env_with<F>(mut get: F) -> WrapConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = WrapConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_WIDTH) {
        match parse_i64(&value) {
            Some(parsed) => config.width = parsed,
            None => errors.push(ConfigError::new("width", value, "expected integer")),
        }
    }

    if let Some(value) = get(ENV_COST_EXPONENT) {
        match parse_f64(&value) {
            Some(parsed) => config.cost_exponent = parsed,
            None => errors.push(ConfigError::new("cost_exponent", value, "expected number")),
        }
    }

    if let Some(value) = get(ENV_LOCALE) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            config.locale = Some(trimmed.to_string());
        }
    }

    if let Some(value) = get(ENV_LINE_BREAK_POLICY) {
        match LineBreakPolicy::parse(&value) {
            Some(parsed) => config.line_break_policy = parsed,
            None => errors.push(ConfigError::new(
                "line_break_policy",
                value,
                "expected fail|passthrough",
            )),
        }
    }

    if let Some(value) = get(ENV_WIDTH_METRIC) {
        match WidthMetric::parse(&value) {
            Some(parsed) => config.width_metric = parsed,
            None => errors.push(ConfigError::new(
                "width_metric",
                value,
                "expected codepoints|cells",
            )),
        }
    }

    if let Err(mut invalid) = config.validate() {
        errors.append(&mut invalid);
    }

    WrapConfigParse { config, errors }
}

#[inline]
pub(crate) fn parse_i64(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

#[inline]
pub(crate) fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(vars: &[(&str, &str)]) -> WrapConfigParse {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        from_env_with(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_are_valid() {
        let config = WrapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.width, 80);
        assert_eq!(config.algorithm(), Algorithm::Optimal { exponent: 2.0 });
    }

    #[test]
    fn empty_env_gives_defaults() {
        let parsed = parse(&[]);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.config, WrapConfig::default());
    }

    #[test]
    fn env_overrides_every_field() {
        let parsed = parse(&[
            (ENV_WIDTH, "40"),
            (ENV_COST_EXPONENT, "0"),
            (ENV_LOCALE, " de_DE "),
            (ENV_LINE_BREAK_POLICY, "passthrough"),
            (ENV_WIDTH_METRIC, "cells"),
        ]);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let config = parsed.config;
        assert_eq!(config.width, 40);
        assert_eq!(config.algorithm(), Algorithm::Greedy);
        assert_eq!(config.locale.as_deref(), Some("de_DE"));
        assert_eq!(config.line_break_policy, LineBreakPolicy::PassThrough);
        assert_eq!(config.width_metric, WidthMetric::Cells);
    }

    #[test]
    fn bad_values_are_collected_not_fatal() {
        let parsed = parse(&[
            (ENV_WIDTH, "wide"),
            (ENV_COST_EXPONENT, "NaN"),
            (ENV_LINE_BREAK_POLICY, "ignore"),
        ]);
        let fields: Vec<&str> = parsed.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["width", "cost_exponent", "line_break_policy"]);
        // Unparseable values leave the defaults in place.
        assert_eq!(parsed.config.width, 80);
    }

    #[test]
    fn non_positive_width_fails_validation() {
        let parsed = parse(&[(ENV_WIDTH, "0")]);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].field, "width");

        let err = WrapConfig::new(-5).validate().unwrap_err();
        assert_eq!(err[0].to_string(), "width=-5 (must be >= 1)");
    }

    #[test]
    fn absent_exponent_fails_validation() {
        let err = WrapConfig::new(10)
            .cost_exponent(f64::NAN)
            .validate()
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].field, "cost_exponent");
    }

    #[test]
    fn infinite_exponent_fails_validation() {
        for exponent in [f64::INFINITY, f64::NEG_INFINITY] {
            let err = WrapConfig::new(10)
                .cost_exponent(exponent)
                .validate()
                .unwrap_err();
            assert_eq!(err[0].field, "cost_exponent");
            assert_eq!(err[0].message, "must be finite");
        }
        let parsed = parse(&[(ENV_COST_EXPONENT, "inf")]);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].to_string(), "cost_exponent=inf (must be finite)");
    }

    #[test]
    fn process_env_matches_lookup() {
        let direct = WrapConfig::from_env_with_diagnostics();
        let looked_up = WrapConfig::from_lookup(|key| env::var(key).ok());
        assert_eq!(direct.config, looked_up.config);
        assert_eq!(direct.errors, looked_up.errors);
        assert_eq!(WrapConfig::from_env(), direct.config);
    }

    #[test]
    fn blank_locale_is_ignored() {
        assert_eq!(parse(&[(ENV_LOCALE, "  ")]).config.locale, None);
    }

    #[test]
    fn builder_setters() {
        let config = WrapConfig::new(12)
            .cost_exponent(3.0)
            .locale("en_US")
            .line_break_policy(LineBreakPolicy::PassThrough)
            .width_metric(WidthMetric::Cells);
        assert_eq!(config.width, 12);
        assert_eq!(config.cost_exponent, 3.0);
        assert_eq!(config.locale.as_deref(), Some("en_US"));
        assert_eq!(config.line_break_policy, LineBreakPolicy::PassThrough);
        assert_eq!(config.width_metric, WidthMetric::Cells);
    }

    #[test]
    fn policy_parse_and_display() {
        assert_eq!(LineBreakPolicy::parse("FAIL"), Some(LineBreakPolicy::Fail));
        assert_eq!(
            LineBreakPolicy::parse("pass-through"),
            Some(LineBreakPolicy::PassThrough)
        );
        assert_eq!(LineBreakPolicy::parse("skip"), None);
        assert_eq!(LineBreakPolicy::PassThrough.to_string(), "passthrough");
    }

    #[test]
    fn summary_names_algorithm() {
        assert_eq!(
            WrapConfig::new(30).cost_exponent(0.0).summary_short(),
            "width=30 · greedy · codepoints"
        );
    }
}
