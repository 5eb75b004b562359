use crate::endpoint::ReadHandler;
use std::collections::HashMap;

/// A trait that provides a generic, asynchronous interface for accessing a shared
/// `HashMap` of read handlers protected by a mutex.
///
/// This uses a closure-passing pattern to abstract over different mutex types
/// (e.g., `tokio::sync::Mutex` and `std::sync::Mutex`), allowing code to be
/// runtime-agnostic.
#[async_trait::async_trait]
pub trait WithHandlers<C>: Send + Sync
where
    C: Send + Sync + Clone + 'static,
{
    /// Executes a closure with exclusive access to the handlers map.
    async fn with_handlers<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut HashMap<u64, ReadHandler<C>>) -> R + Send,
        R: Send;
}

// Only compile this block if the "tokio_support" feature is active.
#[cfg(feature = "tokio_support")]
#[async_trait::async_trait]
impl<C> WithHandlers<C> for tokio::sync::Mutex<HashMap<u64, ReadHandler<C>>>
where
    C: Send + Sync + Clone + 'static,
{
    async fn with_handlers<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut HashMap<u64, ReadHandler<C>>) -> R + Send,
        R: Send,
    {
        let mut guard = self.lock().await;
        f(&mut guard)
    }
}

/// The implementation for the standard library's blocking mutex.
/// This is suitable for single-threaded environments and short critical
/// sections; the lock is never held across an `.await`.
#[async_trait::async_trait]
impl<C> WithHandlers<C> for std::sync::Mutex<HashMap<u64, ReadHandler<C>>>
where
    C: Send + Sync + Clone + 'static,
{
    async fn with_handlers<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut HashMap<u64, ReadHandler<C>>) -> R + Send,
        R: Send,
    {
        // A handler map is still consistent after a panic elsewhere.
        let mut guard = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}
