use crate::invalid_data;
use bitcode::{Decode, Encode};
use muxcall::{CallTarget, ReadMethod, call_selector};
use std::io;

#[derive(Encode, Decode, PartialEq, Debug)]
struct SymbolResponseParams {
    pub symbol: String,
}

#[derive(Encode, Decode, PartialEq, Debug)]
struct DecimalsResponseParams {
    pub decimals: u8,
}

#[derive(Encode, Decode, PartialEq, Debug)]
struct BalanceOfRequestParams {
    pub holder: CallTarget,
}

#[derive(Encode, Decode, PartialEq, Debug)]
struct AmountResponseParams {
    pub amount: u128,
}

/// `symbol() -> string`
pub struct Symbol;

impl ReadMethod for Symbol {
    const SELECTOR: u64 = call_selector!("symbol");

    type Args = ();
    type Output = String;

    fn encode_args(_args: Self::Args) -> Result<Vec<u8>, io::Error> {
        Ok(Vec::new())
    }

    fn decode_args(_bytes: &[u8]) -> Result<Self::Args, io::Error> {
        Ok(())
    }

    fn encode_output(symbol: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&SymbolResponseParams { symbol }))
    }

    fn decode_output(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        let resp_params = bitcode::decode::<SymbolResponseParams>(bytes).map_err(invalid_data)?;

        Ok(resp_params.symbol)
    }
}

/// `decimals() -> uint8`
pub struct Decimals;

impl ReadMethod for Decimals {
    const SELECTOR: u64 = call_selector!("decimals");

    type Args = ();
    type Output = u8;

    fn encode_args(_args: Self::Args) -> Result<Vec<u8>, io::Error> {
        Ok(Vec::new())
    }

    fn decode_args(_bytes: &[u8]) -> Result<Self::Args, io::Error> {
        Ok(())
    }

    fn encode_output(decimals: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&DecimalsResponseParams { decimals }))
    }

    fn decode_output(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        let resp_params =
            bitcode::decode::<DecimalsResponseParams>(bytes).map_err(invalid_data)?;

        Ok(resp_params.decimals)
    }
}

/// `balanceOf(holder) -> uint256`, as a raw integer amount.
pub struct BalanceOf;

impl ReadMethod for BalanceOf {
    const SELECTOR: u64 = call_selector!("balanceOf");

    type Args = CallTarget;
    type Output = u128;

    fn encode_args(holder: Self::Args) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&BalanceOfRequestParams { holder }))
    }

    fn decode_args(bytes: &[u8]) -> Result<Self::Args, io::Error> {
        let req_params = bitcode::decode::<BalanceOfRequestParams>(bytes).map_err(invalid_data)?;

        Ok(req_params.holder)
    }

    fn encode_output(amount: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&AmountResponseParams { amount }))
    }

    fn decode_output(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        let resp_params = bitcode::decode::<AmountResponseParams>(bytes).map_err(invalid_data)?;

        Ok(resp_params.amount)
    }
}

/// `totalSupply() -> uint256`
pub struct TotalSupply;

impl ReadMethod for TotalSupply {
    const SELECTOR: u64 = call_selector!("totalSupply");

    type Args = ();
    type Output = u128;

    fn encode_args(_args: Self::Args) -> Result<Vec<u8>, io::Error> {
        Ok(Vec::new())
    }

    fn decode_args(_bytes: &[u8]) -> Result<Self::Args, io::Error> {
        Ok(())
    }

    fn encode_output(amount: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&AmountResponseParams { amount }))
    }

    fn decode_output(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        let resp_params = bitcode::decode::<AmountResponseParams>(bytes).map_err(invalid_data)?;

        Ok(resp_params.amount)
    }
}
