use super::{
    error::{MulticallEndpointError, RevertPayload},
    with_handlers_trait::WithHandlers,
};
use futures::future::join_all;
use muxcall::wire::{AggregateOutcome, AggregateResponse, MulticallMessage};
use muxcall::{CallResultStatus, CallTarget, EncodedCall, RawResponse, RawResult};
use std::{collections::hash_map::Entry, future::Future, marker::Send, sync::Arc};

#[async_trait::async_trait]
pub trait MulticallEndpointInterface<C>: Send + Sync
where
    C: Send + Sync + Clone + 'static,
{
    type HandlersLock: WithHandlers<C>;

    fn get_read_handlers(&self) -> Arc<Self::HandlersLock>;

    /// Block height reported with every response.
    fn block_number(&self) -> u64;

    fn max_calls_per_request(&self) -> usize;

    async fn register_read<F, Fut>(
        &self,
        selector: u64,
        handler: F,
    ) -> Result<(), MulticallEndpointError>
    where
        F: Fn(C, CallTarget, Vec<u8>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>>
            + Send
            + 'static,
    {
        self.get_read_handlers()
            .with_handlers(|handlers| match handlers.entry(selector) {
                Entry::Occupied(_) => {
                    let err_msg = format!(
                        "a handler for selector {:#018x} is already registered",
                        selector
                    );
                    Err(MulticallEndpointError::Handler(err_msg.into()))
                }
                Entry::Vacant(entry) => {
                    let wrapped = move |ctx: C, target: CallTarget, bytes: Vec<u8>| {
                        Box::pin(handler(ctx, target, bytes))
                            as std::pin::Pin<Box<dyn Future<Output = _> + Send>>
                    };
                    entry.insert(Arc::new(wrapped));
                    Ok(())
                }
            })
            .await
    }

    /// Evaluates every call and returns one result per call, in submission
    /// order.
    ///
    /// Calls are independent: an unknown selector or a failing handler only
    /// affects its own result. The request as a whole is rejected only when
    /// it exceeds `max_calls_per_request`.
    async fn evaluate(&self, context: C, calls: Vec<EncodedCall>) -> AggregateOutcome {
        if calls.len() > self.max_calls_per_request() {
            tracing::warn!(
                "Rejecting aggregated request with {} calls (limit {})",
                calls.len(),
                self.max_calls_per_request()
            );
            return AggregateOutcome::Rejected(format!(
                "request has {} calls, limit is {}",
                calls.len(),
                self.max_calls_per_request()
            ));
        }

        let block_number = self.block_number();
        let handlers_arc = self.get_read_handlers();

        let mut result_futures = Vec::with_capacity(calls.len());
        for call in calls {
            let handlers_arc_clone = handlers_arc.clone();
            let context_clone = context.clone();

            let future = async move {
                let EncodedCall {
                    target,
                    selector,
                    arguments,
                    ..
                } = call;

                let handler = handlers_arc_clone
                    .with_handlers(|handlers| handlers.get(&selector).cloned())
                    .await;

                let Some(handler) = handler else {
                    tracing::debug!("No read handler for selector {:#018x}", selector);
                    return RawResult::failure(CallResultStatus::MethodNotFound, Vec::new());
                };

                match handler(context_clone, target, arguments).await {
                    Ok(encoded) => RawResult::success(encoded),
                    Err(e) => {
                        if let Some(revert) = e.downcast_ref::<RevertPayload>() {
                            RawResult::failure(CallResultStatus::Reverted, revert.0.clone())
                        } else {
                            RawResult::failure(
                                CallResultStatus::SystemError,
                                e.to_string().into_bytes(),
                            )
                        }
                    }
                }
            };
            result_futures.push(future);
        }

        // `join_all` yields outputs in the order the futures were pushed.
        let results = join_all(result_futures).await;

        AggregateOutcome::Completed(RawResponse {
            block_number,
            results,
        })
    }

    /// Decodes one request message, evaluates it, and returns the encoded
    /// response message.
    async fn read_bytes(
        &self,
        context: C,
        bytes: &[u8],
    ) -> Result<Vec<u8>, MulticallEndpointError> {
        let request = match MulticallMessage::decode(bytes)? {
            MulticallMessage::Request(request) => request,
            MulticallMessage::Response(_) => return Err(MulticallEndpointError::UnexpectedMessage),
        };

        tracing::debug!(
            "Evaluating aggregated request {} with {} calls",
            request.request_id,
            request.calls.len()
        );

        let outcome = self.evaluate(context, request.calls).await;

        Ok(MulticallMessage::Response(AggregateResponse {
            request_id: request.request_id,
            outcome,
        })
        .encode())
    }
}
