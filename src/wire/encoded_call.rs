use super::CallTarget;
use bitcode::{Decode, Encode};

/// The serialized form of one queued call, exactly as handed to a
/// [`RemoteCallExecutor`](crate::RemoteCallExecutor).
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct EncodedCall {
    pub target: CallTarget,
    pub selector: u64,
    /// When `true`, a non-success result is delivered to the caller instead
    /// of failing the whole batch.
    pub allow_failure: bool,
    pub arguments: Vec<u8>,
}
