use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShortenError {
    #[error("no URL was entered")]
    Validation,

    /// The server answered with a non-success status.
    #[error("Failed to shorten URL")]
    Request { status: StatusCode },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ShortenError {
    /// The alert shown to the user. Request and network failures share one message.
    pub fn user_message(&self) -> &'static str {
        match self {
            ShortenError::Validation => "Please enter a URL to shorten.",
            ShortenError::Request { .. } | ShortenError::Network(_) => {
                "An error occurred while shortening the URL. Please try again."
            }
        }
    }
}
