mod multicall_client;
pub use multicall_client::{MulticallClient, MulticallClientConfig, TransportState};
