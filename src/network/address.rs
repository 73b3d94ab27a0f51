use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Endpoint the responder binds when none is given
pub const DEFAULT_BIND_ADDRESS: &str = "tcp://*:4242";

/// Host part meaning "every local IPv4 interface"
const WILDCARD_HOST: &str = "*";

/// ZeroMQ-style endpoint a responder can bind to
///
/// # Examples
///
/// ```
/// use greetsrv::network::BindAddress;
///
/// let addr: BindAddress = "tcp://*:4242".parse().unwrap();
/// assert_eq!(addr.to_string(), "tcp://*:4242");
/// assert_eq!(addr.to_transport_endpoint(), "tcp://0.0.0.0:4242");
///
/// let addr: BindAddress = "ipc:///tmp/greetsrv.sock".parse().unwrap();
/// assert!(addr.is_ipc());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindAddress {
    /// TCP endpoint; `host` is `*`, an IP literal (IPv6 without brackets) or a host name
    Tcp { host: String, port: u16 },
    /// Unix domain socket path
    Ipc(PathBuf),
}

impl fmt::Display for BindAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindAddress::Tcp { host, port } if host.contains(':') => {
                write!(f, "tcp://[{host}]:{port}")
            }
            BindAddress::Tcp { host, port } => write!(f, "tcp://{host}:{port}"),
            BindAddress::Ipc(path) => write!(f, "ipc://{}", path.display()),
        }
    }
}

impl FromStr for BindAddress {
    type Err = crate::GreetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("tcp://") {
            parse_tcp(rest)
        } else if let Some(path) = s.strip_prefix("ipc://") {
            if path.is_empty() {
                return Err(invalid(s, "missing socket path"));
            }
            Ok(BindAddress::Ipc(PathBuf::from(path)))
        } else {
            Err(invalid(s, "expected tcp:// or ipc:// scheme"))
        }
    }
}

fn parse_tcp(rest: &str) -> Result<BindAddress, crate::GreetError> {
    let endpoint = format!("tcp://{rest}");

    let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
        let (host, after) = bracketed
            .split_once(']')
            .ok_or_else(|| invalid(&endpoint, "unterminated IPv6 literal"))?;
        let port = after
            .strip_prefix(':')
            .ok_or_else(|| invalid(&endpoint, "missing port"))?;
        (host, port)
    } else {
        rest.rsplit_once(':')
            .ok_or_else(|| invalid(&endpoint, "missing port"))?
    };

    if host.is_empty() {
        return Err(invalid(&endpoint, "missing host"));
    }
    if host != WILDCARD_HOST && host.contains(['/', '*']) {
        return Err(invalid(&endpoint, "invalid host"));
    }
    let port = port
        .parse::<u16>()
        .map_err(|e| invalid(&endpoint, &format!("invalid port: {e}")))?;

    Ok(BindAddress::Tcp {
        host: host.to_string(),
        port,
    })
}

fn invalid(endpoint: &str, reason: &str) -> crate::GreetError {
    crate::GreetError::Config(format!("Invalid endpoint {endpoint:?}: {reason}"))
}

impl Default for BindAddress {
    fn default() -> Self {
        BindAddress::Tcp {
            host: WILDCARD_HOST.to_string(),
            port: 4242,
        }
    }
}

impl BindAddress {
    /// Returns true if this is a TCP endpoint
    pub fn is_tcp(&self) -> bool {
        matches!(self, BindAddress::Tcp { .. })
    }

    /// Returns true if this is a Unix domain socket endpoint
    pub fn is_ipc(&self) -> bool {
        matches!(self, BindAddress::Ipc(_))
    }

    /// Renders the endpoint for the transport, which does not understand `*`
    pub fn to_transport_endpoint(&self) -> String {
        match self {
            BindAddress::Tcp { host, port } if host == WILDCARD_HOST => {
                format!("tcp://0.0.0.0:{port}")
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address() {
        let addr: BindAddress = DEFAULT_BIND_ADDRESS.parse().unwrap();
        assert_eq!(addr, BindAddress::default());
        assert!(addr.is_tcp());
        assert!(!addr.is_ipc());
    }

    #[test]
    fn test_wildcard_is_rewritten_for_transport() {
        let addr: BindAddress = "tcp://*:4242".parse().unwrap();
        assert_eq!(addr.to_string(), "tcp://*:4242");
        assert_eq!(addr.to_transport_endpoint(), "tcp://0.0.0.0:4242");
    }

    #[test]
    fn test_ipv4_literal() {
        let addr: BindAddress = "tcp://127.0.0.1:0".parse().unwrap();
        assert_eq!(
            addr,
            BindAddress::Tcp {
                host: "127.0.0.1".to_string(),
                port: 0
            }
        );
        assert_eq!(addr.to_transport_endpoint(), "tcp://127.0.0.1:0");
    }

    #[test]
    fn test_ipv6_literal() {
        let addr: BindAddress = "tcp://[::1]:5555".parse().unwrap();
        assert_eq!(
            addr,
            BindAddress::Tcp {
                host: "::1".to_string(),
                port: 5555
            }
        );
        assert_eq!(addr.to_string(), "tcp://[::1]:5555");
    }

    #[test]
    fn test_ipc_address() {
        let addr: BindAddress = "ipc:///tmp/test.sock".parse().unwrap();
        assert_eq!(addr, BindAddress::Ipc(PathBuf::from("/tmp/test.sock")));
        assert_eq!(addr.to_string(), "ipc:///tmp/test.sock");
        assert_eq!(addr.to_transport_endpoint(), "ipc:///tmp/test.sock");
    }

    #[test]
    fn test_malformed_addresses() {
        for endpoint in [
            "",
            "4242",
            "*:4242",
            "udp://*:4242",
            "tcp://*",
            "tcp://:4242",
            "tcp://*:notaport",
            "tcp://*:70000",
            "tcp://[::1:4242",
            "tcp://a*b:4242",
            "ipc://",
        ] {
            let result = endpoint.parse::<BindAddress>();
            assert!(
                matches!(result, Err(crate::GreetError::Config(_))),
                "expected {endpoint:?} to be rejected, got {result:?}"
            );
        }
    }
}
