use super::call_descriptor::{CallDescriptor, DecodeFn};
use super::{BatchResults, CallHandle};
use crate::error::{DecodeError, MulticallError};
use crate::executor::RemoteCallExecutor;
use crate::method::ReadMethod;
use crate::wire::{CallTarget, RawResponse, RawResult};
use std::any::Any;
use std::io;

/// Queues heterogeneous read calls and submits them as one aggregated request.
///
/// A `Multicall` is built once and executed once: [`Multicall::execute`]
/// takes the batch by value, so a consumed batch cannot be added to or
/// submitted again. If the `execute` future is dropped before it resolves
/// (e.g. on a timeout), the queued calls are dropped with it.
///
/// Results are correlated purely by position. Every `add*` method returns a
/// [`CallHandle`] whose index is the call's `sequence_index`; the caller keeps
/// these handles in whatever structure gives them meaning.
#[derive(Debug, Default)]
pub struct Multicall {
    pending: Vec<CallDescriptor>,
}

impl Multicall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Multicall {
            pending: Vec::with_capacity(capacity),
        }
    }

    /// Number of queued calls.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queued calls in `sequence_index` order.
    pub fn descriptors(&self) -> &[CallDescriptor] {
        &self.pending
    }

    /// Queues a call with pre-encoded arguments and a caller-supplied decoder.
    ///
    /// No validation or network interaction happens here. Whether `target`
    /// and `selector` resolve to a remote operation is only known once the
    /// batch executes.
    pub fn add_raw<T, F>(
        &mut self,
        target: impl Into<CallTarget>,
        selector: u64,
        arguments: Vec<u8>,
        decoder: F,
    ) -> CallHandle<T>
    where
        T: Send + 'static,
        F: Fn(&[u8]) -> Result<T, io::Error> + Send + Sync + 'static,
    {
        self.push(
            target.into(),
            selector,
            Ok(arguments),
            false,
            Self::required_decoder(decoder),
        )
    }

    /// Like [`Multicall::add_raw`], but a failed call yields `None` instead
    /// of failing the whole batch.
    pub fn add_raw_optional<T, F>(
        &mut self,
        target: impl Into<CallTarget>,
        selector: u64,
        arguments: Vec<u8>,
        decoder: F,
    ) -> CallHandle<Option<T>>
    where
        T: Send + 'static,
        F: Fn(&[u8]) -> Result<T, io::Error> + Send + Sync + 'static,
    {
        self.push(
            target.into(),
            selector,
            Ok(arguments),
            true,
            Self::optional_decoder(decoder),
        )
    }

    /// Queues a call to a [`ReadMethod`].
    ///
    /// If the arguments fail to encode, the failure is reported by `execute`
    /// as [`MulticallError::Encode`] and nothing is sent.
    pub fn add<M>(&mut self, target: impl Into<CallTarget>, args: M::Args) -> CallHandle<M::Output>
    where
        M: ReadMethod + 'static,
        M::Output: Send + 'static,
    {
        self.push(
            target.into(),
            M::SELECTOR,
            M::encode_args(args),
            false,
            Self::required_decoder(M::decode_output),
        )
    }

    /// Queues a call to a [`ReadMethod`] that is allowed to fail.
    pub fn add_optional<M>(
        &mut self,
        target: impl Into<CallTarget>,
        args: M::Args,
    ) -> CallHandle<Option<M::Output>>
    where
        M: ReadMethod + 'static,
        M::Output: Send + 'static,
    {
        self.push(
            target.into(),
            M::SELECTOR,
            M::encode_args(args),
            true,
            Self::optional_decoder(M::decode_output),
        )
    }

    /// Submits every queued call to `executor` as a single request and
    /// decodes the response positionally.
    ///
    /// Batch-level failures (`EmptyBatch`, `Encode`, `Transport`,
    /// `ResponseLengthMismatch`, `CallFailed`) are returned as `Err` and
    /// nothing is decoded. A decoder failing on one position is recorded in
    /// the returned [`BatchResults`] for that position only.
    pub async fn execute<E>(self, executor: &E) -> Result<BatchResults, MulticallError>
    where
        E: RemoteCallExecutor + ?Sized,
    {
        if self.pending.is_empty() {
            return Err(MulticallError::EmptyBatch);
        }

        let mut calls = Vec::with_capacity(self.pending.len());
        let mut decoders = Vec::with_capacity(self.pending.len());
        for descriptor in self.pending {
            let (call, decoder) = descriptor
                .into_parts()
                .map_err(|(index, cause)| MulticallError::Encode { index, cause })?;
            decoders.push((call.allow_failure, decoder));
            calls.push(call);
        }

        tracing::debug!("Submitting aggregated request with {} calls", calls.len());

        let response = executor.aggregate(calls).await?;

        Self::decode_response(decoders, response)
    }

    fn push<T>(
        &mut self,
        target: CallTarget,
        selector: u64,
        arguments: Result<Vec<u8>, io::Error>,
        allow_failure: bool,
        decoder: DecodeFn,
    ) -> CallHandle<T> {
        let sequence_index = self.pending.len();

        tracing::trace!(
            "Queued call {} to {} (selector {:#018x})",
            sequence_index,
            target,
            selector
        );

        self.pending.push(CallDescriptor {
            sequence_index,
            target,
            selector,
            arguments,
            allow_failure,
            decoder,
        });

        CallHandle::new(sequence_index)
    }

    fn required_decoder<T, F>(decoder: F) -> DecodeFn
    where
        T: Send + 'static,
        F: Fn(&[u8]) -> Result<T, io::Error> + Send + Sync + 'static,
    {
        Box::new(move |raw: &RawResult| {
            decoder(&raw.return_data).map(|value| Box::new(value) as Box<dyn Any + Send>)
        })
    }

    fn optional_decoder<T, F>(decoder: F) -> DecodeFn
    where
        T: Send + 'static,
        F: Fn(&[u8]) -> Result<T, io::Error> + Send + Sync + 'static,
    {
        Box::new(move |raw: &RawResult| {
            if !raw.is_success() {
                return Ok(Box::new(None::<T>) as Box<dyn Any + Send>);
            }
            decoder(&raw.return_data).map(|value| Box::new(Some(value)) as Box<dyn Any + Send>)
        })
    }

    fn decode_response(
        decoders: Vec<(bool, DecodeFn)>,
        response: RawResponse,
    ) -> Result<BatchResults, MulticallError> {
        let RawResponse {
            block_number,
            results,
        } = response;

        if results.len() != decoders.len() {
            tracing::warn!(
                "Aggregated response has {} results for {} calls",
                results.len(),
                decoders.len()
            );
            return Err(MulticallError::ResponseLengthMismatch {
                expected: decoders.len(),
                actual: results.len(),
            });
        }

        // Calls that may not fail reject the batch before anything is decoded.
        for (index, ((allow_failure, _), raw)) in decoders.iter().zip(&results).enumerate() {
            if !allow_failure && !raw.is_success() {
                return Err(MulticallError::CallFailed {
                    index,
                    status: raw.result_status(),
                    payload: raw.return_data.clone(),
                });
            }
        }

        let slots = decoders
            .into_iter()
            .zip(results)
            .enumerate()
            .map(|(index, ((_, decoder), raw))| {
                decoder(&raw).map_err(|cause| {
                    tracing::debug!("Result {} failed to decode: {}", index, cause);
                    DecodeError { index, cause }
                })
            })
            .collect();

        Ok(BatchResults::new(block_number, slots))
    }
}
