pub mod client;
pub mod transport;

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use bstr::ByteSlice;

use crate::util::secret::SecureString;

/// Actions that a client can perform against a remote host.
///
/// A client is single use: it is connected once, authenticated, used for one
/// or more commands and then closed.
#[async_trait]
pub trait Client {
    /// Connect to the remote host.
    async fn connect(&mut self) -> Result<()>;

    /// Authenticate with the remote host.
    async fn auth(&mut self, payload: &AuthPayload) -> Result<()>;

    /// Execute a command on the remote host.
    async fn exec(&mut self, command: &str) -> Result<ExecOutput>;

    /// Release the connection.
    async fn close(&mut self) -> Result<()>;
}

/// Assortment of auth payloads that can be used with [`Client::auth`].
#[derive(Debug, Clone)]
pub enum AuthPayload {
    User(String),
    Password(SecureString),
}

/// Output of a command run by [`Client::exec`].
#[derive(Clone, Default)]
pub struct ExecOutput {
    pub exit_status: u32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl fmt::Debug for ExecOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecOutput")
            .field("exit_status", &self.exit_status)
            .field("stdout", &self.stdout.as_bstr())
            .field("stderr", &self.stderr.as_bstr())
            .finish()
    }
}
