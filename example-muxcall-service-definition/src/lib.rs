pub mod chain;
pub mod token;
mod units;

pub use units::format_units;

use std::io;

pub(crate) fn invalid_data(e: bitcode::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}
