use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Outcome of a single call inside an aggregated request, as reported by the
/// remote side.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
pub enum CallResultStatus {
    Success = 0,
    /// The remote operation ran and refused the call; `return_data` holds the
    /// revert payload.
    Reverted = 1,
    /// The remote side failed while evaluating the call; `return_data` holds a
    /// UTF-8 message.
    SystemError = 2,
    /// No operation is registered for the selector.
    MethodNotFound = 3,
}
