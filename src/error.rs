// Error types shared by the library modules. The UI layer and `main`
// wrap these in `anyhow` the same way the rest of the CLI does.

use reqwest::header::InvalidHeaderValue;

/// Failures talking to the quiz API. A non-2xx status is *not* one of
/// these: it comes back as a normal response so its text can be shown.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// DNS failure, refused connection, timeout or a body that could not
    /// be read.
    #[error("Could not reach {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Session token cannot be sent as a header: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A field typed by the operator could not be coerced to what the
/// endpoint expects.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{field}: '{value}' is not an integer")]
    NotAnInteger { field: &'static str, value: String },
}

/// Invalid settings found while building `Config`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}
