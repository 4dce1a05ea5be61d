use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Not found")]
    NotFound,

    /// Any status >= 400 other than 404. `message` holds the raw response body.
    #[error("{status}: {message}")]
    Status {
        status_code: u16,
        status: String,
        message: String,
    },

    #[error("Invalid JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unexpected response shape: field '{field}' is not {expected}")]
    UnexpectedShape {
        field: &'static str,
        expected: &'static str,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// HTTP status behind the error, when the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Status { status_code, .. } => Some(*status_code),
            ApiError::RequestFailed(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::RequestFailed(err) if err.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
