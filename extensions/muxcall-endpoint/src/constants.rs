/// Upper bound on calls in one aggregated request. Larger requests are
/// rejected as a whole.
pub const DEFAULT_MAX_CALLS_PER_REQUEST: usize = 4096;
