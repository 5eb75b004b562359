use bitcode::{Decode, Encode};
use std::fmt;

/// Opaque identifier of the remote object a call is directed at.
///
/// The batcher never interprets this value. Any resolution from a
/// human-readable name into a target happens before the call is queued.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallTarget(pub String);

impl CallTarget {
    pub fn new(id: impl Into<String>) -> Self {
        CallTarget(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CallTarget {
    fn from(id: &str) -> Self {
        CallTarget(id.to_string())
    }
}

impl From<String> for CallTarget {
    fn from(id: String) -> Self {
        CallTarget(id)
    }
}

impl From<&CallTarget> for CallTarget {
    fn from(target: &CallTarget) -> Self {
        target.clone()
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
