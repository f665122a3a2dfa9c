#![forbid(unsafe_code)]

//! Line wrapping over externally supplied break boundaries.
//!
//! Text is cut into tokens at the offsets a [`LineSegmenter`] reports; each
//! token is measured with and without its trailing whitespace; then either
//! a greedy first-fit pass or a minimum-raggedness dynamic program picks
//! the tokens after which lines end.
//!
//! ```
//! use linewrap::{WrapConfig, Wrapper};
//!
//! let wrapper = Wrapper::new(&WrapConfig::new(10).cost_exponent(2.0)).unwrap();
//! let lines = wrapper.wrap_str("the quick brown fox").unwrap();
//! assert_eq!(lines, vec!["the quick", "brown fox"]);
//! ```

pub mod config;
pub mod error;
pub mod greedy;
pub mod measure;
pub mod optimal;
pub mod segment;
pub mod wrap;

pub use config::{LineBreakPolicy, WrapConfig, WrapConfigParse};
pub use error::{ConfigError, WrapError};
pub use greedy::wrap_greedy;
pub use measure::{HardBreak, Token, WidthMetric, measure_tokens};
pub use optimal::{CostMatrix, LineCost, line_costs, line_penalty, penalty_of, wrap_optimal};
pub use segment::{CodepointClass, LineSegmenter, UaxSegmenter, UnicodeClasses};
pub use wrap::{Algorithm, Breaks, WrapPoints, WrappedText, Wrapper, materialize, wrap_text};
