//! Batch heterogeneous remote read calls into a single aggregated request.
//!
//! Calls are queued on a [`Multicall`], each with its own decoder, then sent
//! together through a [`RemoteCallExecutor`]. The flat response is decoded
//! positionally, so the value at `sequence_index` `i` always belongs to the
//! `i`-th queued call.

mod batch;
pub mod constants;
mod error;
mod executor;
mod method;
pub mod utils;
pub mod wire;

pub use batch::{BatchResults, CallDescriptor, CallHandle, Multicall};
pub use error::{DecodeError, MulticallError};
pub use executor::RemoteCallExecutor;
pub use method::*;
pub use wire::{CallResultStatus, CallTarget, EncodedCall, RawResponse, RawResult};
