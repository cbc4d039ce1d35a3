//! Error type for backend API calls.

use std::fmt::{Display, Formatter};

/// Errors that can occur when talking to the interview backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    Status { status: u16, message: String },
    /// The request never produced a response (DNS, connect, timeout, reset).
    Transport { message: String },
    /// The response body did not have the expected shape.
    Decode { message: String },
    /// A local precondition failed before anything was sent.
    InvalidInput { message: String },
}

impl ApiError {
    pub(crate) fn transport(err: impl Display) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(err: impl Display) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { status, message } => write!(f, "server returned {}: {}", status, message),
            Self::Transport { message } => write!(f, "request failed: {}", message),
            Self::Decode { message } => write!(f, "unexpected response: {}", message),
            Self::InvalidInput { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => Self::Status {
                status,
                message: String::new(),
            },
            other => Self::transport(other),
        }
    }
}
