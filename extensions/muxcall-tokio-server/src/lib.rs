mod multicall_server;
pub use multicall_server::{
    CLIENT_TIMEOUT, ConnectionContext, HEARTBEAT_INTERVAL, MulticallServer, MulticallServerConfig,
};

pub mod utils;

pub use muxcall_endpoint::{MulticallEndpoint, MulticallEndpointInterface, RevertPayload};
