use example_muxcall_service_definition::format_units;
use example_muxcall_service_definition::token::{BalanceOf, Decimals, Symbol};
use muxcall::{CallHandle, CallTarget, Multicall, MulticallError, RemoteCallExecutor};

/// Handles for the reads queued against one token.
struct TokenCalls {
    address: CallTarget,
    symbol: CallHandle<String>,
    decimals: CallHandle<u8>,
    balances: Vec<(CallTarget, CallHandle<u128>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalances {
    pub address: CallTarget,
    pub symbol: String,
    pub decimals: u8,
    /// Holder balances scaled by `decimals`, in the order the holders were
    /// given.
    pub balances: Vec<(CallTarget, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReport {
    pub block_number: u64,
    pub tokens: Vec<TokenBalances>,
}

/// Reads symbol, decimals and every holder's balance for each token in one
/// aggregated request.
pub async fn fetch_portfolio<E>(
    executor: &E,
    tokens: &[CallTarget],
    holders: &[CallTarget],
) -> Result<PortfolioReport, MulticallError>
where
    E: RemoteCallExecutor + ?Sized,
{
    let mut batch = Multicall::with_capacity(tokens.len() * (2 + holders.len()));

    let mut queued = Vec::with_capacity(tokens.len());
    for token in tokens {
        let symbol = batch.add::<Symbol>(token, ());
        let decimals = batch.add::<Decimals>(token, ());

        let mut balances = Vec::with_capacity(holders.len());
        for holder in holders {
            balances.push((holder.clone(), batch.add::<BalanceOf>(token, holder.clone())));
        }

        queued.push(TokenCalls {
            address: token.clone(),
            symbol,
            decimals,
            balances,
        });
    }

    let mut results = batch.execute(executor).await?.into_complete()?;

    let mut report = PortfolioReport {
        block_number: results.block_number(),
        tokens: Vec::with_capacity(queued.len()),
    };

    for calls in queued {
        let decimals = results.take(calls.decimals)?;
        let mut balances = Vec::with_capacity(calls.balances.len());
        for (holder, handle) in calls.balances {
            balances.push((holder, format_units(results.take(handle)?, decimals)));
        }

        report.tokens.push(TokenBalances {
            address: calls.address,
            symbol: results.take(calls.symbol)?,
            decimals,
            balances,
        });
    }

    Ok(report)
}
