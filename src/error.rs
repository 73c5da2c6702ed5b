use reqwest::StatusCode;
use thiserror::Error;

/// Why a round trip to the message endpoint did not produce a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FailureReason {
    /// The request could not be sent or the response could not be retrieved.
    #[strum(serialize = "transport failure")]
    TransportFailure,
    /// A response arrived but carried no usable `message` field.
    #[strum(serialize = "malformed response")]
    MalformedResponse,
}

/// Errors raised by the HTTP endpoint client.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned {0}")]
    Status(StatusCode),

    #[error("response had no usable message: {0}")]
    Malformed(String),
}

impl EndpointError {
    /// Collapse into the two-way taxonomy the session reacts to.
    pub fn reason(&self) -> FailureReason {
        match self {
            EndpointError::Transport(_) | EndpointError::Status(_) => FailureReason::TransportFailure,
            EndpointError::Malformed(_) => FailureReason::MalformedResponse,
        }
    }
}
