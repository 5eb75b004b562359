mod handlers;
mod ledger;
mod portfolio;

pub use handlers::{register_chain_handlers, register_token_handlers};
pub use ledger::{DAI, HOLDERS, TokenInfo, TokenLedger, USDC, USDT};
pub use portfolio::{PortfolioReport, TokenBalances, fetch_portfolio};

use muxcall_tokio_server::{MulticallServer, utils::bind_tcp_listener_on_random_port};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Block height the demo endpoint starts at.
pub const DEMO_START_BLOCK: u64 = 19_000_000;

/// Starts a `MulticallServer` serving `ledger` on a random local port.
///
/// Returns the port and the server task.
pub async fn spawn_demo_server(
    ledger: TokenLedger,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>> {
    let (listener, port) = bind_tcp_listener_on_random_port().await?;

    let server = MulticallServer::new();
    let endpoint = server.endpoint();
    endpoint.set_block_number(DEMO_START_BLOCK);

    let ledger = Arc::new(ledger);
    register_token_handlers(&endpoint, ledger.clone()).await?;
    register_chain_handlers(&endpoint, ledger).await?;

    let server_task = tokio::spawn(async move {
        if let Err(err) = Arc::new(server).serve_with_listener(listener).await {
            tracing::error!("Demo server stopped: {}", err);
        }
    });

    Ok((port, server_task))
}
