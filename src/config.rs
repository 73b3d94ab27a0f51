use crate::network::BindAddress;

/// Default upper bound for a single request frame (1 MiB)
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024 * 1024;

/// Configuration for an [`EchoResponder`](crate::EchoResponder)
///
/// # Examples
///
/// ```
/// use greetsrv::config::ResponderConfig;
///
/// let config = ResponderConfig {
///     bind_addr: "tcp://127.0.0.1:5555".parse().unwrap(),
///     max_request_size: 4096,
/// };
/// assert_eq!(config.bind_addr.to_string(), "tcp://127.0.0.1:5555");
/// ```
///
/// Using the default configuration:
///
/// ```
/// use greetsrv::config::ResponderConfig;
///
/// let config = ResponderConfig::default();
/// assert_eq!(config.bind_addr.to_string(), "tcp://*:4242");
/// ```
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Endpoint to bind the REP socket to
    pub bind_addr: BindAddress,
    /// Largest request frame, in bytes, that gets a greeting
    pub max_request_size: usize,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            bind_addr: BindAddress::default(),
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
        }
    }
}

impl From<BindAddress> for ResponderConfig {
    fn from(bind_addr: BindAddress) -> Self {
        Self {
            bind_addr,
            ..Default::default()
        }
    }
}
