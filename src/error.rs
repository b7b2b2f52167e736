//! Error handling

use std::fmt;

/// Everything that can go wrong while generating thumbnails.
#[derive(Debug)]
pub enum ThumbnailError {
    /// Missing or invalid settings, fatal before any work starts
    Configuration(String),
    /// Missing or empty topic input
    Input(String),
    /// The generation call never produced an HTTP response
    Request(String),
    /// The generation API answered with anything but 200
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
    /// The generation API answered 200 but gave us no image
    EmptyResult,
    /// Fetching or writing the image failed
    Download(String),
    /// Local filesystem failure
    Io(std::io::Error),
    /// The batch was stopped before this item ran
    Cancelled,
}

impl fmt::Display for ThumbnailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            Self::Input(msg) => write!(f, "Input error: {msg}"),
            Self::Request(msg) => write!(f, "Request to generation API failed: {msg}"),
            Self::Api { status, body } => {
                write!(f, "API request failed with status {status}: {body}")
            }
            Self::EmptyResult => write!(f, "No image data received from API"),
            Self::Download(msg) => write!(f, "Download error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for ThumbnailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ThumbnailError {
    fn from(err: std::io::Error) -> Self {
        ThumbnailError::Io(err)
    }
}

impl From<url::ParseError> for ThumbnailError {
    fn from(err: url::ParseError) -> Self {
        ThumbnailError::Configuration(format!("invalid URL: {err}"))
    }
}
