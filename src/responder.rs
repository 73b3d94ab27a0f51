use crate::config::ResponderConfig;
use crate::greet::greet;
use crate::security::{SizeError, SizeValidator};
use crate::{GreetError, Result};

use std::sync::Arc;
use tokio::{signal, sync::broadcast};
use tracing::{Instrument, debug, error, info, warn};
use zeromq::{
    Endpoint, RepSocket, Socket, SocketRecv, SocketSend, ZmqError, ZmqMessage, ZmqResult,
};

/// Reasons a single exchange is refused
///
/// A refused request still gets a reply (`"Error: {reason}"`) so the REP
/// socket can move on to the next request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("expected a single frame, got {0}")]
    Multipart(usize),

    #[error(transparent)]
    TooLarge(#[from] SizeError),

    #[error("request is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Extracts the text of a request message
pub fn decode_request(
    message: ZmqMessage,
    validator: &SizeValidator,
) -> std::result::Result<String, RequestError> {
    let frames = message.into_vec();
    let [frame] = frames.as_slice() else {
        return Err(RequestError::Multipart(frames.len()));
    };
    validator.validate_size(frame.len())?;
    Ok(std::str::from_utf8(frame)?.to_owned())
}

/// Greeting responder bound to a single REP endpoint
///
/// The socket is bound by [`start`](Self::start) and closed when
/// [`serve_forever`](Self::serve_forever) returns, whatever the reason.
///
/// # Examples
///
/// ```no_run
/// use greetsrv::{EchoResponder, ResponderConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let responder = EchoResponder::start(ResponderConfig::default()).await?;
///     responder.serve_forever().await?;
///     Ok(())
/// }
/// ```
///
/// Stopping the loop from another task:
///
/// ```no_run
/// use greetsrv::{EchoResponder, ResponderConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ResponderConfig {
///         bind_addr: "tcp://127.0.0.1:0".parse()?,
///         ..Default::default()
///     };
///     let responder = EchoResponder::start(config).await?;
///     let shutdown_signal = responder.shutdown_signal();
///
///     let server_handle = tokio::spawn(responder.serve_forever());
///
///     // Do other work...
///
///     shutdown_signal.send(())?;
///     server_handle.await??;
///     Ok(())
/// }
/// ```
pub struct EchoResponder {
    socket: RepSocket,
    endpoint: Endpoint,
    validator: SizeValidator,
    shutdown_signal: Arc<broadcast::Sender<()>>,
    // Subscribed at bind time so a shutdown sent before serving is not lost
    shutdown_rx: broadcast::Receiver<()>,
}

impl EchoResponder {
    /// Binds a REP socket to the configured address
    ///
    /// Fails with [`GreetError::Bind`] when the address is in use or cannot be
    /// bound. There is no retry.
    pub async fn start(config: ResponderConfig) -> Result<Self> {
        let mut socket = RepSocket::new();
        let endpoint = socket
            .bind(&config.bind_addr.to_transport_endpoint())
            .await
            .map_err(|source| GreetError::Bind {
                endpoint: config.bind_addr.to_string(),
                source,
            })?;

        info!(address = %config.bind_addr, %endpoint, "Greeting responder bound");

        let (shutdown_signal, shutdown_rx) = broadcast::channel(1);
        Ok(Self {
            validator: SizeValidator::new(config.max_request_size),
            socket,
            endpoint,
            shutdown_signal: Arc::new(shutdown_signal),
            shutdown_rx,
        })
    }

    /// Endpoint actually bound, with any port 0 resolved
    pub fn local_endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns a shutdown signal sender that can be used to gracefully shutdown the responder
    pub fn shutdown_signal(&self) -> broadcast::Sender<()> {
        self.shutdown_signal.as_ref().clone()
    }

    /// Serves requests until Ctrl-C, an internal shutdown signal or a transport error
    pub async fn serve_forever(mut self) -> Result<()> {
        info!(endpoint = %self.endpoint, "Greeting responder serving");
        let result = self.serve_until_shutdown().await;

        for e in self.socket.close().await {
            warn!(error = %e, "Error while closing socket");
        }
        info!("Greeting responder stopped");
        result
    }

    async fn serve_until_shutdown(&mut self) -> Result<()> {
        let mut seq: u64 = 0;
        let ctrl_c = signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            debug!("Waiting on request");
            let message = tokio::select! {
                res = self.socket.recv() => match res {
                    Ok(message) => message,
                    Err(e) => {
                        error!(error = %e, "Failed to receive request");
                        return Err(GreetError::Transport(e));
                    }
                },
                _ = &mut ctrl_c => {
                    info!("Received shutdown signal, stopping responder");
                    return Ok(());
                }
                _ = self.shutdown_rx.recv() => {
                    info!("Received internal shutdown signal, stopping responder");
                    return Ok(());
                }
            };

            seq += 1;
            let span = tracing::info_span!("exchange", seq);
            self.exchange(message).instrument(span).await?;
        }
    }

    /// Replies to one request; only a failed send is an error
    async fn exchange(&mut self, message: ZmqMessage) -> Result<()> {
        let reply = match decode_request(message, &self.validator) {
            Ok(name) => {
                info!(size = name.len(), request = %name, "Received request");
                greet(&name)
            }
            Err(e) => {
                warn!(error = %e, "Rejected request");
                format!("Error: {e}")
            }
        };

        let sent = self.socket.send(ZmqMessage::from(reply)).await;
        send_outcome(sent)
    }
}

/// Maps the result of sending a reply; a requester that went away is not fatal
fn send_outcome(sent: ZmqResult<()>) -> Result<()> {
    match sent {
        Ok(()) => {
            debug!("Sent reply");
            Ok(())
        }
        Err(ZmqError::ReturnToSender { reason, .. }) => {
            warn!(reason, "Reply dropped, requester is gone");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to send reply");
            Err(GreetError::Transport(e))
        }
    }
}
