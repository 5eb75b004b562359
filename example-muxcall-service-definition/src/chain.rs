use crate::invalid_data;
use bitcode::{Decode, Encode};
use muxcall::{CallTarget, ReadMethod, call_selector};
use std::io;

// Reads answered by the aggregator object itself rather than by a token.

#[derive(Encode, Decode, PartialEq, Debug)]
struct EthBalanceRequestParams {
    pub account: CallTarget,
}

#[derive(Encode, Decode, PartialEq, Debug)]
struct EthBalanceResponseParams {
    pub wei: u128,
}

#[derive(Encode, Decode, PartialEq, Debug)]
struct BlockNumberResponseParams {
    pub block_number: u64,
}

#[derive(Encode, Decode, PartialEq, Debug)]
struct CoinbaseResponseParams {
    pub coinbase: CallTarget,
}

/// Native-currency balance of an account, in wei.
pub struct GetEthBalance;

impl ReadMethod for GetEthBalance {
    const SELECTOR: u64 = call_selector!("getEthBalance");

    type Args = CallTarget;
    type Output = u128;

    fn encode_args(account: Self::Args) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&EthBalanceRequestParams { account }))
    }

    fn decode_args(bytes: &[u8]) -> Result<Self::Args, io::Error> {
        let req_params =
            bitcode::decode::<EthBalanceRequestParams>(bytes).map_err(invalid_data)?;

        Ok(req_params.account)
    }

    fn encode_output(wei: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&EthBalanceResponseParams { wei }))
    }

    fn decode_output(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        let resp_params =
            bitcode::decode::<EthBalanceResponseParams>(bytes).map_err(invalid_data)?;

        Ok(resp_params.wei)
    }
}

pub struct GetBlockNumber;

impl ReadMethod for GetBlockNumber {
    const SELECTOR: u64 = call_selector!("getBlockNumber");

    type Args = ();
    type Output = u64;

    fn encode_args(_args: Self::Args) -> Result<Vec<u8>, io::Error> {
        Ok(Vec::new())
    }

    fn decode_args(_bytes: &[u8]) -> Result<Self::Args, io::Error> {
        Ok(())
    }

    fn encode_output(block_number: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&BlockNumberResponseParams { block_number }))
    }

    fn decode_output(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        let resp_params =
            bitcode::decode::<BlockNumberResponseParams>(bytes).map_err(invalid_data)?;

        Ok(resp_params.block_number)
    }
}

pub struct GetCurrentBlockCoinbase;

impl ReadMethod for GetCurrentBlockCoinbase {
    const SELECTOR: u64 = call_selector!("getCurrentBlockCoinbase");

    type Args = ();
    type Output = CallTarget;

    fn encode_args(_args: Self::Args) -> Result<Vec<u8>, io::Error> {
        Ok(Vec::new())
    }

    fn decode_args(_bytes: &[u8]) -> Result<Self::Args, io::Error> {
        Ok(())
    }

    fn encode_output(coinbase: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&CoinbaseResponseParams { coinbase }))
    }

    fn decode_output(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        let resp_params = bitcode::decode::<CoinbaseResponseParams>(bytes).map_err(invalid_data)?;

        Ok(resp_params.coinbase)
    }
}
