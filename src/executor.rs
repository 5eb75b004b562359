use crate::wire::{EncodedCall, RawResponse};
use std::io;
use std::sync::Arc;

/// Dispatches an aggregated request to wherever the remote objects live.
///
/// Implementations must:
/// - send all calls as a single operation,
/// - return exactly one [`RawResult`](crate::RawResult) per call, in
///   submission order,
/// - fail with an error rather than return a truncated result list.
///
/// Retry policy, if any, belongs to the implementation. The batcher never
/// retries.
#[async_trait::async_trait]
pub trait RemoteCallExecutor: Send + Sync {
    async fn aggregate(&self, calls: Vec<EncodedCall>) -> Result<RawResponse, io::Error>;
}

#[async_trait::async_trait]
impl<E> RemoteCallExecutor for Arc<E>
where
    E: RemoteCallExecutor + ?Sized,
{
    async fn aggregate(&self, calls: Vec<EncodedCall>) -> Result<RawResponse, io::Error> {
        (**self).aggregate(calls).await
    }
}
