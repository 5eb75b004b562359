mod macros;
mod read_method;

pub use macros::*;
pub use read_method::ReadMethod;
