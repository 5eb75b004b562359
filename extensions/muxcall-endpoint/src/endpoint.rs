use super::MulticallEndpointInterface;
use crate::constants::DEFAULT_MAX_CALLS_PER_REQUEST;
use muxcall::CallTarget;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::{future::Future, marker::PhantomData, pin::Pin, sync::Arc};

// --- Conditionally Alias the Mutex Implementation ---
#[cfg(not(feature = "tokio_support"))]
use std::sync::Mutex;
#[cfg(feature = "tokio_support")]
use tokio::sync::Mutex;

// --- Generic Definitions ---
pub type ReadHandler<C> = Arc<
    dyn Fn(
            C,
            CallTarget,
            Vec<u8>,
        ) -> Pin<
            Box<
                dyn Future<Output = Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>>
                    + Send,
            >,
        > + Send
        + Sync,
>;

/// A concrete multicall endpoint, generic over a context type `C`.
///
/// Handlers are registered per selector and receive the call's target, so
/// one handler serves the same operation on every remote object.
pub struct MulticallEndpoint<C>
where
    C: Send + Sync + Clone + 'static,
{
    read_handlers: Arc<Mutex<HashMap<u64, ReadHandler<C>>>>,
    block_number: AtomicU64,
    max_calls_per_request: usize,
    _context: PhantomData<C>,
}

impl<C> Default for MulticallEndpoint<C>
where
    C: Send + Sync + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> MulticallEndpoint<C>
where
    C: Send + Sync + Clone + 'static,
{
    /// Creates a new endpoint at block 0.
    pub fn new() -> Self {
        Self {
            read_handlers: Arc::new(Mutex::new(HashMap::new())),
            block_number: AtomicU64::new(0),
            max_calls_per_request: DEFAULT_MAX_CALLS_PER_REQUEST,
            _context: PhantomData,
        }
    }

    pub fn with_max_calls_per_request(mut self, max_calls: usize) -> Self {
        self.max_calls_per_request = max_calls;
        self
    }

    pub fn set_block_number(&self, block_number: u64) {
        self.block_number.store(block_number, Ordering::SeqCst);
    }

    /// Moves to the next block and returns its number.
    pub fn advance_block(&self) -> u64 {
        self.block_number.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait::async_trait]
impl<C> MulticallEndpointInterface<C> for MulticallEndpoint<C>
where
    C: Send + Sync + Clone + 'static,
{
    type HandlersLock = Mutex<HashMap<u64, ReadHandler<C>>>;

    fn get_read_handlers(&self) -> Arc<Self::HandlersLock> {
        self.read_handlers.clone()
    }

    fn block_number(&self) -> u64 {
        self.block_number.load(Ordering::SeqCst)
    }

    fn max_calls_per_request(&self) -> usize {
        self.max_calls_per_request
    }
}
