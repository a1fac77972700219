use reqwest::StatusCode;
use thiserror::Error;

/// Every way a call to the hero backend can fail. All of them are handled the
/// same way: logged, then replaced by a fallback value.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("Http failure response for {url}: {status}{detail}")]
    Status {
        url: String,
        status: StatusCode,
        /// Backend explanation in parentheses, empty when the body had none.
        detail: String,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(err) => err.status(),
            Self::InvalidUrl { .. } => None,
        }
    }
}
