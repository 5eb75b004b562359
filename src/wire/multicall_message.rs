use super::{EncodedCall, RawResponse};
use bitcode::{Decode, Encode};
use std::io;

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct AggregateRequest {
    /// Correlates the response with the request on a shared connection.
    pub request_id: u32,
    pub calls: Vec<EncodedCall>,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub enum AggregateOutcome {
    Completed(RawResponse),
    /// The remote side could not evaluate the request at all.
    Rejected(String),
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct AggregateResponse {
    pub request_id: u32,
    pub outcome: AggregateOutcome,
}

/// One transport frame. Each binary frame carries exactly one message.
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub enum MulticallMessage {
    Request(AggregateRequest),
    Response(AggregateResponse),
}

impl MulticallMessage {
    pub fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, io::Error> {
        bitcode::decode::<MulticallMessage>(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
