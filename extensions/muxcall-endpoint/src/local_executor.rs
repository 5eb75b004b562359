use crate::{MulticallEndpoint, MulticallEndpointInterface};
use muxcall::wire::AggregateOutcome;
use muxcall::{EncodedCall, RawResponse, RemoteCallExecutor};
use std::io;
use std::sync::Arc;

/// Executes aggregated requests against an in-process endpoint.
///
/// Useful in tests and for embedding the remote side directly; there is no
/// serialization or network hop.
pub struct LocalExecutor<C>
where
    C: Send + Sync + Clone + 'static,
{
    endpoint: Arc<MulticallEndpoint<C>>,
    context: C,
}

impl<C> LocalExecutor<C>
where
    C: Send + Sync + Clone + 'static,
{
    pub fn new(endpoint: Arc<MulticallEndpoint<C>>, context: C) -> Self {
        Self { endpoint, context }
    }
}

#[async_trait::async_trait]
impl<C> RemoteCallExecutor for LocalExecutor<C>
where
    C: Send + Sync + Clone + 'static,
{
    async fn aggregate(&self, calls: Vec<EncodedCall>) -> Result<RawResponse, io::Error> {
        match self.endpoint.evaluate(self.context.clone(), calls).await {
            AggregateOutcome::Completed(response) => Ok(response),
            AggregateOutcome::Rejected(reason) => Err(io::Error::other(reason)),
        }
    }
}
