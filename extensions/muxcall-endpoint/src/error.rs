use std::fmt;
use std::io;

#[derive(Debug)]
pub enum MulticallEndpointError {
    /// The incoming bytes are not a valid message.
    Decode(io::Error),
    /// A message that only flows from the endpoint to callers was received.
    UnexpectedMessage,
    Handler(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for MulticallEndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MulticallEndpointError::Decode(e) => write!(f, "Failed to decode message: {}", e),
            MulticallEndpointError::UnexpectedMessage => {
                write!(f, "Received a response message on the endpoint")
            }
            MulticallEndpointError::Handler(e) => write!(f, "Handler error: {}", e),
        }
    }
}

impl std::error::Error for MulticallEndpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MulticallEndpointError::Decode(e) => Some(e),
            MulticallEndpointError::Handler(e) => Some(e.as_ref()),
            MulticallEndpointError::UnexpectedMessage => None,
        }
    }
}

// Allows `?` on the message codec.
impl From<io::Error> for MulticallEndpointError {
    fn from(err: io::Error) -> Self {
        MulticallEndpointError::Decode(err)
    }
}

/// Returned by a read handler to signal that the remote operation refused the
/// call. The payload is delivered to the caller with a `Reverted` status;
/// any other handler error is reported as a `SystemError`.
#[derive(Debug, Clone, PartialEq)]
pub struct RevertPayload(pub Vec<u8>);

impl RevertPayload {
    pub fn message(message: impl Into<String>) -> Self {
        RevertPayload(message.into().into_bytes())
    }
}

impl fmt::Display for RevertPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call reverted: {}", String::from_utf8_lossy(&self.0))
    }
}

impl std::error::Error for RevertPayload {}
