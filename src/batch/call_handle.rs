use std::fmt;
use std::marker::PhantomData;

/// Typed receipt for a queued call.
///
/// Carries the call's `sequence_index` and the type its decoder produces, so
/// the result can be read back from [`BatchResults`](crate::BatchResults)
/// without the caller doing any offset arithmetic.
pub struct CallHandle<T> {
    index: usize,
    _output: PhantomData<fn() -> T>,
}

impl<T> CallHandle<T> {
    pub(crate) fn new(index: usize) -> Self {
        CallHandle {
            index,
            _output: PhantomData,
        }
    }

    /// The 0-based position assigned at enqueue time.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for CallHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CallHandle<T> {}

impl<T> PartialEq for CallHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for CallHandle<T> {}

impl<T> fmt::Debug for CallHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallHandle")
            .field("index", &self.index)
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}
