use std::io::Result;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;

/// Binds a `TcpListener` to an OS-assigned port on `127.0.0.1`.
///
/// Returns the listener together with the port it ended up on, which is what
/// tests and the demo app need to point a client at a freshly started server.
pub async fn bind_tcp_listener_on_random_port() -> Result<(TcpListener, u16)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    Ok((listener, port))
}

/// Splits the local address of a bound `TcpListener` into host and port.
pub fn tcp_listener_to_host_port(listener: &TcpListener) -> Result<(IpAddr, u16)> {
    let local_addr: SocketAddr = listener.local_addr()?;

    Ok((local_addr.ip(), local_addr.port()))
}
