use super::CallResultStatus;
use bitcode::{Decode, Encode};

/// The undecoded result of one call.
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct RawResult {
    /// A [`CallResultStatus`] byte.
    pub status: u8,
    pub return_data: Vec<u8>,
}

impl RawResult {
    pub fn success(return_data: Vec<u8>) -> Self {
        RawResult {
            status: CallResultStatus::Success.into(),
            return_data,
        }
    }

    pub fn failure(status: CallResultStatus, return_data: Vec<u8>) -> Self {
        RawResult {
            status: status.into(),
            return_data,
        }
    }

    /// Unknown status bytes are treated as system errors.
    pub fn result_status(&self) -> CallResultStatus {
        CallResultStatus::try_from(self.status).unwrap_or(CallResultStatus::SystemError)
    }

    pub fn is_success(&self) -> bool {
        self.result_status() == CallResultStatus::Success
    }
}

/// Everything an executor returns for one aggregated request.
///
/// `results[i]` belongs to the `i`-th submitted call.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Default)]
pub struct RawResponse {
    /// Block height the reads were served at.
    pub block_number: u64,
    pub results: Vec<RawResult>,
}
