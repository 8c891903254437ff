//! Error types for the plinth crate.

use std::fmt;

/// Result type for plinth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading the model.
#[derive(Debug)]
pub enum Error {
    /// The persistent store could not be opened.
    StorageUnavailable {
        /// The error message.
        message: String,
    },
    /// Reading the cached blob failed.
    StorageRead {
        /// The error message.
        message: String,
    },
    /// Writing the fetched blob failed.
    StorageWrite {
        /// The error message.
        message: String,
    },
    /// HTTP request failed.
    Http {
        /// The URL that failed.
        url: String,
        /// The error message.
        message: String,
    },
    /// HTTP response had a non-success status code.
    HttpStatus {
        /// The URL that returned the error.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// The renderer could not parse the payload.
    ModelParse {
        /// The error message.
        message: String,
    },
    /// Every load path failed; no further attempts are made.
    AllMethodsFailed {
        /// The failure that ended the fallback path.
        last: Box<Error>,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StorageUnavailable { message } => {
                write!(f, "storage unavailable: {message}")
            }
            Error::StorageRead { message } => {
                write!(f, "storage read failed: {message}")
            }
            Error::StorageWrite { message } => {
                write!(f, "storage write failed: {message}")
            }
            Error::Http { url, message } => {
                write!(f, "http request to {url} failed: {message}")
            }
            Error::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Error::ModelParse { message } => {
                write!(f, "failed to parse model: {message}")
            }
            Error::AllMethodsFailed { last } => {
                write!(f, "all load methods failed: {last}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AllMethodsFailed { last } => Some(last.as_ref()),
            _ => None,
        }
    }
}
