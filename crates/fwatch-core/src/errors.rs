use std::num::ParseIntError;

/// Core error type for the watcher.
///
/// Adapter crates map their specific errors into this type so the run can
/// decide consistently what gets reported by email and what is fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("error making HTTP request: {0}")]
    Transport(String),

    #[error("HTTP response code {status}")]
    HttpStatus { status: u16, reason: String },

    /// HTML itself always parses; this is only raised when a badge selector
    /// fails to compile.
    #[error("error parsing HTML: {0}")]
    Parse(String),

    #[error("invalid notification count {text:?}: {source}")]
    CountParse {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("email error: {0}")]
    Email(String),

    #[error("fetch failed ({fetch}) and the error report could not be sent ({email})")]
    Unreported { fetch: Box<Error>, email: Box<Error> },
}

pub type Result<T> = std::result::Result<T, Error>;
