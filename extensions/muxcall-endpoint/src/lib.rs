pub mod constants;

mod endpoint;
pub use endpoint::*;

mod endpoint_interface;
pub use endpoint_interface::*;

pub mod error;
pub use error::RevertPayload;

mod local_executor;
pub use local_executor::LocalExecutor;

mod with_handlers_trait;
pub use with_handlers_trait::*;
