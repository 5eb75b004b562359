use crate::wire::CallResultStatus;
use std::fmt;
use std::io;

/// A single position whose raw result could not be interpreted by its decoder.
#[derive(Debug)]
pub struct DecodeError {
    /// The `sequence_index` of the affected call.
    pub index: usize,
    pub cause: io::Error,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode result {}: {}", self.index, self.cause)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Represents errors that can occur while executing a batch or reading its
/// results.
#[derive(Debug)]
pub enum MulticallError {
    /// `execute` was called on a batch with no queued calls.
    EmptyBatch,
    /// The arguments of a queued call could not be encoded. Detected before
    /// anything is sent.
    Encode { index: usize, cause: io::Error },
    /// The executor could not complete the aggregated request.
    Transport(io::Error),
    /// The executor returned a different number of results than calls were
    /// submitted.
    ResponseLengthMismatch { expected: usize, actual: usize },
    /// A call that did not allow failure came back with a non-success status.
    /// The whole batch is rejected, as an `aggregate` would revert.
    CallFailed {
        index: usize,
        status: CallResultStatus,
        payload: Vec<u8>,
    },
    Decode(DecodeError),
    IndexOutOfRange { index: usize, len: usize },
    /// The value at `index` is not of the requested type.
    TypeMismatch { index: usize },
    /// The value at `index` was already moved out with `take`.
    AlreadyTaken { index: usize },
}

impl MulticallError {
    /// `true` when nothing was decoded because the batch failed as a whole.
    pub fn is_transport_level(&self) -> bool {
        matches!(
            self,
            MulticallError::EmptyBatch
                | MulticallError::Encode { .. }
                | MulticallError::Transport(_)
                | MulticallError::ResponseLengthMismatch { .. }
                | MulticallError::CallFailed { .. }
        )
    }

    /// The `sequence_index` this error is tied to, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            MulticallError::Encode { index, .. }
            | MulticallError::CallFailed { index, .. }
            | MulticallError::IndexOutOfRange { index, .. }
            | MulticallError::TypeMismatch { index }
            | MulticallError::AlreadyTaken { index } => Some(*index),
            MulticallError::Decode(err) => Some(err.index),
            _ => None,
        }
    }
}

impl fmt::Display for MulticallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MulticallError::EmptyBatch => write!(f, "Cannot execute an empty batch"),
            MulticallError::Encode { index, cause } => {
                write!(f, "Failed to encode arguments of call {}: {}", index, cause)
            }
            MulticallError::Transport(e) => write!(f, "Transport error: {}", e),
            MulticallError::ResponseLengthMismatch { expected, actual } => write!(
                f,
                "Response length mismatch: submitted {} calls, received {} results",
                expected, actual
            ),
            MulticallError::CallFailed {
                index,
                status,
                payload,
            } => write!(
                f,
                "Call {} failed with status {:?} ({} byte payload)",
                index,
                status,
                payload.len()
            ),
            MulticallError::Decode(e) => write!(f, "Decode error: {}", e),
            MulticallError::IndexOutOfRange { index, len } => {
                write!(f, "Result index {} out of range for {} results", index, len)
            }
            MulticallError::TypeMismatch { index } => {
                write!(f, "Result {} is not of the requested type", index)
            }
            MulticallError::AlreadyTaken { index } => {
                write!(f, "Result {} was already taken", index)
            }
        }
    }
}

impl std::error::Error for MulticallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MulticallError::Encode { cause, .. } => Some(cause),
            MulticallError::Transport(e) => Some(e),
            MulticallError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MulticallError {
    fn from(e: io::Error) -> Self {
        MulticallError::Transport(e)
    }
}

impl From<DecodeError> for MulticallError {
    fn from(e: DecodeError) -> Self {
        MulticallError::Decode(e)
    }
}
