use std::error::Error;
use std::fmt::{Display, Formatter};

/// Every failure of a remote call is reduced to one of these kinds before it reaches
/// the generation loop or the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    Network(String),
    NoData,
    Decoding(String),
    Api(String),
    Unknown(String),
    ImageDownload(String),
    RateLimitExceeded,
}

impl RemoteError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, RemoteError::RateLimitExceeded)
    }
}

impl Error for RemoteError {}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Network(s) => write!(f, "network error: {}", s),
            RemoteError::NoData => write!(f, "no data received"),
            RemoteError::Decoding(s) => write!(f, "could not decode response: {}", s),
            RemoteError::Api(s) => write!(f, "api error: {}", s),
            RemoteError::Unknown(s) => write!(f, "unknown error: {}", s),
            RemoteError::ImageDownload(s) => write!(f, "image download error: {}", s),
            RemoteError::RateLimitExceeded => write!(f, "rate limit exceeded"),
        }
    }
}
