use crate::{GreetError, Result};
use bytes::Bytes;
use tokio::time::{Duration, timeout};
use zeromq::{ReqSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

/// Default time allowed for one request/reply exchange
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REQ client for the greeting responder
///
/// # Examples
///
/// ```no_run
/// use greetsrv::GreetClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut client = GreetClient::connect("tcp://127.0.0.1:4242").await?;
///
///     let reply = client.request("World").await?;
///     assert_eq!(reply, "Hello, World!");
///     Ok(())
/// }
/// ```
pub struct GreetClient {
    socket: ReqSocket,
    request_timeout: Duration,
}

impl GreetClient {
    /// Connects a REQ socket to the given endpoint
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let mut socket = ReqSocket::new();
        socket.connect(endpoint).await?;
        Ok(Self {
            socket,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Sets the time allowed for each exchange
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Sends a text request and returns the text reply
    pub async fn request(&mut self, name: &str) -> Result<String> {
        self.exchange(ZmqMessage::from(name)).await
    }

    /// Sends raw frames as one request and returns the text reply
    ///
    /// # Errors
    ///
    /// Returns [`GreetError::Config`] if `frames` is empty.
    pub async fn request_frames(&mut self, frames: Vec<Bytes>) -> Result<String> {
        let message = ZmqMessage::try_from(frames)
            .map_err(|e| GreetError::Config(format!("Cannot build request: {e}")))?;
        self.exchange(message).await
    }

    async fn exchange(&mut self, message: ZmqMessage) -> Result<String> {
        let request_timeout = self.request_timeout;
        let exchange = async {
            self.socket.send(message).await?;
            let reply = self.socket.recv().await?;
            let frame = reply.get(0).cloned().unwrap_or_default();
            Ok::<_, GreetError>(std::str::from_utf8(&frame)?.to_owned())
        };

        timeout(request_timeout, exchange).await.map_err(|_| {
            GreetError::Timeout(format!(
                "No reply within {}ms",
                request_timeout.as_millis()
            ))
        })?
    }

    /// Closes the underlying socket
    pub async fn close(self) {
        for e in self.socket.close().await {
            tracing::warn!(error = %e, "Error while closing client socket");
        }
    }
}
