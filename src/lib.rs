use thiserror::Error;

/// Error types for the greetsrv library
#[derive(Error, Debug)]
pub enum GreetError {
    /// The endpoint could not be bound (address in use, permission denied, ...)
    #[error("Failed to bind {endpoint}: {source}")]
    Bind {
        endpoint: String,
        #[source]
        source: zeromq::ZmqError,
    },

    /// Socket-level errors while connecting, receiving or sending
    #[error("Transport error: {0}")]
    Transport(#[from] zeromq::ZmqError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// UTF-8 encoding errors
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type for the greetsrv library
pub type Result<T> = std::result::Result<T, GreetError>;

pub mod client;
pub mod config;
pub mod greet;
pub mod network;
pub mod responder;
pub mod security;

// Re-export main types for convenience
pub use client::GreetClient;
pub use config::ResponderConfig;
pub use greet::greet;
pub use network::{BindAddress, DEFAULT_BIND_ADDRESS};
pub use responder::EchoResponder;
