use super::CallHandle;
use crate::error::{DecodeError, MulticallError};
use std::any::Any;
use std::io;
use std::mem;

enum Slot {
    Value(Box<dyn Any + Send>),
    Failed(DecodeError),
    Taken,
}

/// Decoded results of one executed batch, in `sequence_index` order.
///
/// Every position holds either its decoded value or the [`DecodeError`] its
/// decoder produced; a failure at one position never affects the others.
pub struct BatchResults {
    block_number: u64,
    slots: Vec<Slot>,
}

impl BatchResults {
    pub(crate) fn new(
        block_number: u64,
        decoded: Vec<Result<Box<dyn Any + Send>, DecodeError>>,
    ) -> Self {
        let slots = decoded
            .into_iter()
            .map(|result| match result {
                Ok(value) => Slot::Value(value),
                Err(err) => Slot::Failed(err),
            })
            .collect();

        BatchResults {
            block_number,
            slots,
        }
    }

    /// Block height reported by the executor for this batch.
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get<T: 'static>(&self, handle: &CallHandle<T>) -> Result<&T, MulticallError> {
        self.get_at(handle.index())
    }

    /// Reads the value at `index`, which must have been decoded as `T`.
    pub fn get_at<T: 'static>(&self, index: usize) -> Result<&T, MulticallError> {
        match self.slot(index)? {
            Slot::Value(value) => (**value)
                .downcast_ref::<T>()
                .ok_or(MulticallError::TypeMismatch { index }),
            Slot::Failed(err) => Err(MulticallError::Decode(copy_decode_error(err))),
            Slot::Taken => Err(MulticallError::AlreadyTaken { index }),
        }
    }

    /// Moves the value out of the results. Subsequent reads of the same
    /// position fail with [`MulticallError::AlreadyTaken`].
    pub fn take<T: 'static>(&mut self, handle: CallHandle<T>) -> Result<T, MulticallError> {
        let index = handle.index();
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(MulticallError::IndexOutOfRange { index, len })?;

        match mem::replace(slot, Slot::Taken) {
            Slot::Value(value) => match value.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(value) => {
                    *slot = Slot::Value(value);
                    Err(MulticallError::TypeMismatch { index })
                }
            },
            Slot::Failed(err) => {
                let copy = copy_decode_error(&err);
                *slot = Slot::Failed(err);
                Err(MulticallError::Decode(copy))
            }
            Slot::Taken => Err(MulticallError::AlreadyTaken { index }),
        }
    }

    /// Positions whose decoder failed, in index order.
    pub fn decode_errors(&self) -> impl Iterator<Item = &DecodeError> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Failed(err) => Some(err),
            _ => None,
        })
    }

    /// `true` if every position decoded successfully.
    pub fn is_complete(&self) -> bool {
        self.decode_errors().next().is_none()
    }

    /// Converts partial results into a hard failure: returns the first
    /// decode error, or `self` if there is none.
    pub fn into_complete(mut self) -> Result<Self, MulticallError> {
        let first_failed = self
            .slots
            .iter()
            .position(|slot| matches!(slot, Slot::Failed(_)));

        if let Some(index) = first_failed {
            if let Slot::Failed(err) = mem::replace(&mut self.slots[index], Slot::Taken) {
                return Err(MulticallError::Decode(err));
            }
        }

        Ok(self)
    }

    /// The flat, ordered sequence of decoded results, one entry per
    /// position.
    pub fn into_values(self) -> Vec<Result<Box<dyn Any + Send>, MulticallError>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Slot::Value(value) => Ok(value),
                Slot::Failed(err) => Err(MulticallError::Decode(err)),
                Slot::Taken => Err(MulticallError::AlreadyTaken { index }),
            })
            .collect()
    }

    fn slot(&self, index: usize) -> Result<&Slot, MulticallError> {
        self.slots.get(index).ok_or(MulticallError::IndexOutOfRange {
            index,
            len: self.slots.len(),
        })
    }
}

impl std::fmt::Debug for BatchResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchResults")
            .field("block_number", &self.block_number)
            .field("len", &self.slots.len())
            .field("decode_errors", &self.decode_errors().count())
            .finish()
    }
}

// `io::Error` is not `Clone`; reads hand out a copy carrying the same kind
// and message.
fn copy_decode_error(err: &DecodeError) -> DecodeError {
    DecodeError {
        index: err.index,
        cause: io::Error::new(err.cause.kind(), err.cause.to_string()),
    }
}
