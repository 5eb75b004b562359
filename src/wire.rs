mod call_result_status;
mod call_target;
mod encoded_call;
mod multicall_message;
mod raw_response;

pub use call_result_status::CallResultStatus;
pub use call_target::CallTarget;
pub use encoded_call::EncodedCall;
pub use multicall_message::{
    AggregateOutcome, AggregateRequest, AggregateResponse, MulticallMessage,
};
pub use raw_response::{RawResponse, RawResult};
