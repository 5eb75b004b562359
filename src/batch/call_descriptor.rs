use crate::wire::{CallTarget, EncodedCall, RawResult};
use std::any::Any;
use std::fmt;
use std::io;

/// Type-erased decoder. Every queued call carries one of these, so the batch
/// can store heterogeneous calls in a single ordered `Vec`.
pub(crate) type DecodeFn =
    Box<dyn Fn(&RawResult) -> Result<Box<dyn Any + Send>, io::Error> + Send + Sync>;

/// The local record of one queued call.
pub struct CallDescriptor {
    pub(crate) sequence_index: usize,
    pub(crate) target: CallTarget,
    pub(crate) selector: u64,
    /// Argument encoding is checked when the batch executes, not on enqueue.
    pub(crate) arguments: Result<Vec<u8>, io::Error>,
    pub(crate) allow_failure: bool,
    pub(crate) decoder: DecodeFn,
}

impl CallDescriptor {
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn target(&self) -> &CallTarget {
        &self.target
    }

    pub fn selector(&self) -> u64 {
        self.selector
    }

    /// `None` if the arguments failed to encode.
    pub fn arguments(&self) -> Option<&[u8]> {
        self.arguments.as_deref().ok()
    }

    pub fn allow_failure(&self) -> bool {
        self.allow_failure
    }

    /// Splits the descriptor into its wire form and its decoder.
    pub(crate) fn into_parts(self) -> Result<(EncodedCall, DecodeFn), (usize, io::Error)> {
        let arguments = self
            .arguments
            .map_err(|cause| (self.sequence_index, cause))?;

        Ok((
            EncodedCall {
                target: self.target,
                selector: self.selector,
                allow_failure: self.allow_failure,
                arguments,
            },
            self.decoder,
        ))
    }
}

impl fmt::Debug for CallDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallDescriptor")
            .field("sequence_index", &self.sequence_index)
            .field("target", &self.target)
            .field("selector", &format_args!("{:#018x}", self.selector))
            .field("arguments", &self.arguments)
            .field("allow_failure", &self.allow_failure)
            .finish_non_exhaustive()
    }
}
