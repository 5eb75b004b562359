use muxcall::CallTarget;
use muxcall_endpoint::RevertPayload;
use std::collections::HashMap;

pub const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
pub const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

pub const HOLDERS: [&str; 3] = [
    "0x3DdfA8eC3052539b6C9549F12cEA2C295cfF5296",
    "0x5777d92f208679DB4b9778590Fa3CAB3aC9e2168",
    "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
];

#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
    pub balances: HashMap<CallTarget, u128>,
}

impl TokenInfo {
    pub fn new(symbol: &str, decimals: u8) -> Self {
        TokenInfo {
            symbol: symbol.to_string(),
            decimals,
            balances: HashMap::new(),
        }
    }

    pub fn with_balance(mut self, holder: &str, amount: u128) -> Self {
        self.balances.insert(CallTarget::from(holder), amount);
        self
    }

    /// Accounts without an entry hold nothing.
    pub fn balance_of(&self, holder: &CallTarget) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.balances.values().sum()
    }
}

/// In-memory state of the simulated chain served by the demo endpoint.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    tokens: HashMap<CallTarget, TokenInfo>,
    eth_balances: HashMap<CallTarget, u128>,
    coinbase: CallTarget,
}

impl TokenLedger {
    pub fn new(coinbase: impl Into<CallTarget>) -> Self {
        TokenLedger {
            tokens: HashMap::new(),
            eth_balances: HashMap::new(),
            coinbase: coinbase.into(),
        }
    }

    /// Three stablecoins with a handful of balances for [`HOLDERS`].
    pub fn demo() -> Self {
        let [first, second, third] = HOLDERS;

        TokenLedger::new(third)
            .with_token(
                DAI,
                TokenInfo::new("DAI", 18)
                    .with_balance(first, 2_500 * 10u128.pow(18))
                    .with_balance(second, 1_234_567 * 10u128.pow(17)),
            )
            .with_token(
                USDC,
                TokenInfo::new("USDC", 6)
                    .with_balance(first, 1_000_000)
                    .with_balance(second, 2_000_000)
                    .with_balance(third, 42_750_000),
            )
            .with_token(
                USDT,
                TokenInfo::new("USDT", 6).with_balance(second, 9_990_000_000),
            )
            .with_eth_balance(first, 3 * 10u128.pow(18))
            .with_eth_balance(third, 5 * 10u128.pow(17))
    }

    pub fn with_token(mut self, address: &str, token: TokenInfo) -> Self {
        self.tokens.insert(CallTarget::from(address), token);
        self
    }

    pub fn with_eth_balance(mut self, account: &str, wei: u128) -> Self {
        self.eth_balances.insert(CallTarget::from(account), wei);
        self
    }

    /// Looks up the token deployed at `target`. Calls to any other address
    /// revert, as calls to an account without code would.
    pub fn token(&self, target: &CallTarget) -> Result<&TokenInfo, RevertPayload> {
        self.tokens
            .get(target)
            .ok_or_else(|| RevertPayload::message(format!("no token at {target}")))
    }

    pub fn eth_balance(&self, account: &CallTarget) -> u128 {
        self.eth_balances.get(account).copied().unwrap_or(0)
    }

    pub fn coinbase(&self) -> &CallTarget {
        &self.coinbase
    }
}
