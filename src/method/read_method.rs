use std::io;

// A convention for coupling a remote read operation's selector with the
// serialization of its arguments and its return value in one place. The same
// definition is used by the batcher (`encode_args` / `decode_output`) and by
// endpoint handlers (`decode_args` / `encode_output`).

pub trait ReadMethod {
    /// Selector of the remote operation, usually `call_selector!("name")`.
    const SELECTOR: u64;

    /// The ordered input values (e.g. `()` for `symbol()`, a holder for
    /// `balanceOf(holder)`).
    type Args;

    /// The typed value the operation returns.
    type Output;

    fn encode_args(args: Self::Args) -> Result<Vec<u8>, io::Error>;

    fn decode_args(bytes: &[u8]) -> Result<Self::Args, io::Error>;

    fn encode_output(output: Self::Output) -> Result<Vec<u8>, io::Error>;

    /// Decodes the raw return data of one call.
    ///
    /// Must be free of side effects and fail with an error rather than
    /// panic on malformed input.
    fn decode_output(bytes: &[u8]) -> Result<Self::Output, io::Error>;
}
