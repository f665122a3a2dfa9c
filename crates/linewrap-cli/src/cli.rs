#![forbid(unsafe_code)]

//! Command-line argument parsing for the `linewrap` binary.
//!
//! Args are parsed by hand. `LINEWRAP_*` environment variables provide
//! defaults; explicit flags override them.

use std::env;
use std::process;

use linewrap::{ConfigError, LineBreakPolicy, WidthMetric, WrapConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
linewrap: wrap each line of stdin to a target width

USAGE:
    linewrap [OPTIONS] < input.txt

OPTIONS:
    --width=N            Target line width (default: 80)
    --exponent=F         Raggedness exponent; <= 0 wraps greedily (default: 2)
    --locale=TAG         Locale passed to the line segmenter
    --policy=POLICY      Input lines with embedded breaks: 'fail' or 'passthrough'
                         (default: fail)
    --metric=METRIC      Width metric: 'codepoints' or 'cells' (default: codepoints)
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT:
    LINEWRAP_WIDTH                 Same as --width
    LINEWRAP_COST_EXPONENT         Same as --exponent
    LINEWRAP_LOCALE                Same as --locale
    LINEWRAP_LINE_BREAK_POLICY     Same as --policy
    LINEWRAP_WIDTH_METRIC          Same as --metric
    RUST_LOG                       Log filter for stderr diagnostics (default: warn)

Each input line is wrapped on its own. Lines that are not valid UTF-8 are
copied through unchanged.";

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    pub config: WrapConfig,
    /// Environment values that could not be parsed and were ignored.
    pub env_warnings: Vec<ConfigError>,
}

#[derive(Debug)]
pub enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    InvalidConfig(Vec<ConfigError>),
    UnknownArg(String),
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting the
    /// process on `--help`, `--version` or bad input.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("linewrap {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::InvalidConfig(errors)) => {
                for err in errors {
                    eprintln!("Invalid configuration: {err}");
                }
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let parsed = WrapConfig::from_lookup(|key| get_env(key));
        // Range checks are repeated against the final config below, so only
        // unparseable env values are kept as warnings.
        let out_of_range = parsed.config.validate().err().unwrap_or_default();
        let env_warnings: Vec<ConfigError> = parsed
            .errors
            .into_iter()
            .filter(|err| !out_of_range.contains(err))
            .collect();
        let mut config = parsed.config;

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                _ => {}
            }

            let Some((flag, value)) = arg.split_once('=') else {
                return Err(ParseError::UnknownArg(arg.to_string()));
            };
            let invalid = |flag: &'static str| ParseError::InvalidValue {
                flag,
                value: value.to_string(),
            };
            match flag {
                "--width" => {
                    config.width = value.trim().parse().map_err(|_| invalid("--width"))?;
                }
                "--exponent" => {
                    config.cost_exponent = value
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| !v.is_nan())
                        .ok_or_else(|| invalid("--exponent"))?;
                }
                "--locale" => {
                    let tag = value.trim();
                    config.locale = (!tag.is_empty()).then(|| tag.to_string());
                }
                "--policy" => {
                    config.line_break_policy =
                        LineBreakPolicy::parse(value).ok_or_else(|| invalid("--policy"))?;
                }
                "--metric" => {
                    config.width_metric =
                        WidthMetric::parse(value).ok_or_else(|| invalid("--metric"))?;
                }
                _ => return Err(ParseError::UnknownArg(arg.to_string())),
            }
        }

        config.validate().map_err(ParseError::InvalidConfig)?;
        Ok(Self {
            config,
            env_warnings,
        })
    }
}
