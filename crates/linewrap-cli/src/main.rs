#![forbid(unsafe_code)]

//! `linewrap` binary entry point.
//!
//! Reads stdin, treats every line as one element, wraps the batch and writes
//! the resulting lines to stdout. Diagnostics go to stderr through
//! `tracing`, filtered by `RUST_LOG`.

mod cli;

use std::fmt;
use std::io::{self, BufRead, BufWriter, Write};

use linewrap::{WrapError, WrappedText, Wrapper};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum RunError {
    Io(io::Error),
    Wrap(WrapError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Wrap(err) => write!(f, "{err}"),
        }
    }
}

impl From<io::Error> for RunError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<WrapError> for RunError {
    fn from(err: WrapError) -> Self {
        Self::Wrap(err)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_logging();
    let opts = cli::Opts::parse();
    for warning in &opts.env_warnings {
        tracing::warn!(%warning, "ignoring environment value");
    }

    if let Err(e) = run(&opts) {
        eprintln!("linewrap: {e}");
        std::process::exit(1);
    }
}

fn run(opts: &cli::Opts) -> Result<(), RunError> {
    let wrapper = Wrapper::new(&opts.config)?;
    tracing::debug!(config = %opts.config.summary_short(), "wrapping stdin");

    let elements = read_elements(io::stdin().lock())?;
    let wrapped = wrapper.wrap_batch(elements.iter().map(|line| Some(line.as_slice())))?;
    tracing::info!(elements = wrapped.len(), "wrapped");

    let mut out = BufWriter::new(io::stdout().lock());
    write_wrapped(&mut out, &wrapped)?;
    out.flush()?;
    Ok(())
}

/// Split input into elements at `\n`, dropping the terminator and a
/// preceding `\r`.
fn read_elements<R: BufRead>(input: R) -> io::Result<Vec<Vec<u8>>> {
    input
        .split(b'\n')
        .map(|line| {
            line.map(|mut bytes| {
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                bytes
            })
        })
        .collect()
}

fn write_wrapped<W: Write>(out: &mut W, wrapped: &[WrappedText]) -> io::Result<()> {
    for item in wrapped {
        match item {
            WrappedText::Lines(lines) => {
                for line in lines {
                    writeln!(out, "{line}")?;
                }
            }
            WrappedText::Verbatim(bytes) => {
                out.write_all(bytes)?;
                out.write_all(b"\n")?;
            }
            WrappedText::Absent => {}
        }
    }
    Ok(())
}
