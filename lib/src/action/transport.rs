use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Factory that builds TCP connections.
///
/// No connect timeout is applied unless one is configured; the operating
/// system's own connect behavior applies otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransport {
    connect_timeout: Option<Duration>,
}

impl TcpTransport {
    #[must_use]
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        Self { connect_timeout }
    }

    /// Opens a TCP stream to `host:port`. `host` may be a name or an address.
    ///
    /// # Errors
    ///
    /// If the connection fails or the configured timeout elapses.
    pub async fn connect(&self, host: &str, port: u16) -> Result<TcpStream> {
        let connect = TcpStream::connect((host, port));
        let tcp = match self.connect_timeout {
            Some(duration) => timeout(duration, connect)
                .await
                .context("TCP connect timed out")?,
            None => connect.await,
        };
        tcp.with_context(|| format!("TCP connect to {host}:{port} failed"))
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn connects_to_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let transport = TcpTransport::new(Some(Duration::from_secs(2)));
        let stream = transport.connect("127.0.0.1", port).await.unwrap();
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = TcpTransport::default();
        let error = transport.connect("127.0.0.1", port).await.unwrap_err();
        assert!(format!("{error:#}").contains("TCP connect"));
    }
}
