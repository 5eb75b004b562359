mod batch_results;
mod call_descriptor;
mod call_handle;
mod multicall;

pub use batch_results::BatchResults;
pub use call_descriptor::CallDescriptor;
pub use call_handle::CallHandle;
pub use multicall::Multicall;
