use example_muxcall_token_app::{DAI, HOLDERS, TokenLedger, USDC, USDT, fetch_portfolio, spawn_demo_server};
use muxcall::CallTarget;
use muxcall_tokio_client::MulticallClient;
use std::env;
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// `host:port` of an already running multicall server. When unset, a local
/// server with a simulated ledger is started.
const SERVER_ADDR_ENV: &str = "MUXCALL_SERVER_ADDR";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (host, port, _server_task) = match env::var(SERVER_ADDR_ENV) {
        Ok(addr) => {
            let (host, port) = addr
                .rsplit_once(':')
                .ok_or_else(|| format!("{SERVER_ADDR_ENV} must be host:port, got {addr:?}"))?;
            (host.to_string(), port.parse::<u16>()?, None)
        }
        Err(_) => {
            let (port, server_task) = spawn_demo_server(TokenLedger::demo()).await?;
            ("127.0.0.1".to_string(), port, Some(server_task))
        }
    };

    let client = MulticallClient::new(&host, port).await?;

    let tokens: Vec<CallTarget> = [DAI, USDC, USDT].into_iter().map(CallTarget::from).collect();
    let holders: Vec<CallTarget> = HOLDERS.into_iter().map(CallTarget::from).collect();

    let report = fetch_portfolio(&client, &tokens, &holders).await?;

    println!("Balances at block {}:", report.block_number);
    for token in &report.tokens {
        println!("{} ({}, {} decimals)", token.symbol, token.address, token.decimals);
        for (holder, balance) in &token.balances {
            println!("  {holder}: {balance}");
        }
    }

    Ok(())
}
