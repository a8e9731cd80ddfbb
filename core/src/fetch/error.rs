//! Fetch error taxonomy

use thiserror::Error;

/// Why a single proxy attempt failed. Handled inside the client by moving on.
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("API Error: {}", .message.as_deref().unwrap_or("unknown"))]
    Application { code: Option<serde_json::Value>, message: Option<String> },
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AttemptError::Transport(format!("request timed out: {}", e))
        } else {
            AttemptError::Transport(e.to_string())
        }
    }
}

/// Outcome of a whole call that did not yield a payload
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to fetch data after trying all {attempts} CORS proxies: {last}")]
    Exhausted { attempts: usize, last: AttemptError },

    #[error("Unexpected payload shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, FetchError::Exhausted { .. })
    }
}

#[derive(Error, Debug)]
pub enum ClientBuildError {
    #[error("Proxy list is empty")]
    EmptyProxyList,

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
