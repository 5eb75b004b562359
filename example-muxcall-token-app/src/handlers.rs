use crate::TokenLedger;
use example_muxcall_service_definition::{
    chain::{GetBlockNumber, GetCurrentBlockCoinbase, GetEthBalance},
    token::{BalanceOf, Decimals, Symbol, TotalSupply},
};
use muxcall::ReadMethod;
use muxcall_endpoint::{MulticallEndpoint, MulticallEndpointInterface, error::MulticallEndpointError};
use std::io;
use std::sync::Arc;

/// Serves the token methods for every token in `ledger`.
pub async fn register_token_handlers<C>(
    endpoint: &MulticallEndpoint<C>,
    ledger: Arc<TokenLedger>,
) -> Result<(), MulticallEndpointError>
where
    C: Send + Sync + Clone + 'static,
{
    endpoint
        .register_read(Symbol::SELECTOR, {
            let ledger = ledger.clone();
            move |_ctx, target, _args| {
                let ledger = ledger.clone();
                async move {
                    let token = ledger.token(&target)?;
                    Ok(Symbol::encode_output(token.symbol.clone())?)
                }
            }
        })
        .await?;

    endpoint
        .register_read(Decimals::SELECTOR, {
            let ledger = ledger.clone();
            move |_ctx, target, _args| {
                let ledger = ledger.clone();
                async move {
                    let token = ledger.token(&target)?;
                    Ok(Decimals::encode_output(token.decimals)?)
                }
            }
        })
        .await?;

    endpoint
        .register_read(BalanceOf::SELECTOR, {
            let ledger = ledger.clone();
            move |_ctx, target, args| {
                let ledger = ledger.clone();
                async move {
                    let holder = BalanceOf::decode_args(&args)?;
                    let token = ledger.token(&target)?;
                    Ok(BalanceOf::encode_output(token.balance_of(&holder))?)
                }
            }
        })
        .await?;

    endpoint
        .register_read(TotalSupply::SELECTOR, move |_ctx, target, _args| {
            let ledger = ledger.clone();
            async move {
                let token = ledger.token(&target)?;
                Ok(TotalSupply::encode_output(token.total_supply())?)
            }
        })
        .await?;

    Ok(())
}

/// Serves the chain-level reads answered by the aggregator itself.
///
/// The block number handler holds a weak reference, so the endpoint does not
/// keep itself alive.
pub async fn register_chain_handlers<C>(
    endpoint: &Arc<MulticallEndpoint<C>>,
    ledger: Arc<TokenLedger>,
) -> Result<(), MulticallEndpointError>
where
    C: Send + Sync + Clone + 'static,
{
    endpoint
        .register_read(GetEthBalance::SELECTOR, {
            let ledger = ledger.clone();
            move |_ctx, _target, args| {
                let ledger = ledger.clone();
                async move {
                    let account = GetEthBalance::decode_args(&args)?;
                    Ok(GetEthBalance::encode_output(ledger.eth_balance(&account))?)
                }
            }
        })
        .await?;

    endpoint
        .register_read(GetCurrentBlockCoinbase::SELECTOR, move |_ctx, _target, _args| {
            let ledger = ledger.clone();
            async move {
                Ok(GetCurrentBlockCoinbase::encode_output(
                    ledger.coinbase().clone(),
                )?)
            }
        })
        .await?;

    let weak_endpoint = Arc::downgrade(endpoint);
    endpoint
        .register_read(GetBlockNumber::SELECTOR, move |_ctx, _target, _args| {
            let weak_endpoint = weak_endpoint.clone();
            async move {
                let endpoint = weak_endpoint
                    .upgrade()
                    .ok_or_else(|| io::Error::other("endpoint is shutting down"))?;
                Ok(GetBlockNumber::encode_output(endpoint.block_number())?)
            }
        })
        .await?;

    Ok(())
}
