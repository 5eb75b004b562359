use std::time::Duration;

/// How long an executor waits for the response to one aggregated request
/// before giving up.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path the WebSocket transport serves aggregated requests on.
pub const DEFAULT_WS_PATH: &str = "/ws";
