use std::sync::Arc;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use russh::client::Handle;
use serde::Deserialize;
use tracing::debug;
use tracing::warn;
use tracing::Dispatch;

use crate::action::transport::TcpTransport;
use crate::action::AuthPayload;
use crate::action::Client;
use crate::action::ExecOutput;

// Host keys ------------------------------------------------------------------

/// Which server host keys an [`SshClient`] will trust.
///
/// Keys are matched by their OpenSSH SHA-256 fingerprint, as printed by
/// `ssh-keygen -lf`, eg `SHA256:uNiVztksCsDhcc0u9e8BujQXVUpKZIDTMczCvj3tD2s`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostKeyPolicy {
    /// Trust any host key the server presents. Never set this outside of a
    /// lab network.
    pub insecure_accept_unknown_host_keys: bool,

    /// Pinned host key fingerprints.
    pub fingerprints: Vec<String>,
}

impl HostKeyPolicy {
    /// Policy that trusts only the given fingerprints.
    pub fn pinned<I, S>(fingerprints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            insecure_accept_unknown_host_keys: false,
            fingerprints: fingerprints.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy that trusts every host key.
    #[must_use]
    pub fn insecure_accept_all() -> Self {
        Self {
            insecure_accept_unknown_host_keys: true,
            fingerprints: Vec::new(),
        }
    }

    /// Whether this policy could ever trust a key.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.insecure_accept_unknown_host_keys || !self.fingerprints.is_empty()
    }

    /// Decides whether a server presenting `fingerprint` is trusted.
    #[must_use]
    pub fn trusts(&self, fingerprint: &str) -> bool {
        if self.fingerprints.iter().any(|pinned| pinned == fingerprint) {
            debug!(%fingerprint, "host key matches pinned fingerprint");
            return true;
        }
        if self.insecure_accept_unknown_host_keys {
            warn!(%fingerprint, "accepting unpinned host key");
            return true;
        }
        warn!(%fingerprint, "rejecting unknown host key");
        false
    }
}

// Factory --------------------------------------------------------------------

/// Factory for building SSH clients.
#[derive(Debug, Clone, Default)]
pub struct SshClientFactory {
    transport: TcpTransport,
    host_keys: HostKeyPolicy,
}

impl SshClientFactory {
    #[must_use]
    pub fn new(transport: TcpTransport, host_keys: HostKeyPolicy) -> Self {
        Self {
            transport,
            host_keys,
        }
    }

    /// Builds an unconnected client for `host:port`.
    #[must_use]
    pub fn client(&self, host: &str, port: u16) -> SshClient {
        SshClient::new(self.transport, host, port, self.host_keys.clone())
    }
}

// Client ---------------------------------------------------------------------

/// SSH client. Only password authentication is supported; agents and key
/// discovery are never consulted.
pub struct SshClient {
    transport: TcpTransport,
    host: String,
    port: u16,
    host_keys: HostKeyPolicy,
    session: Option<Handle<SshClientHandler>>,
    user: Option<String>,
}

impl SshClient {
    #[must_use]
    pub fn new(transport: TcpTransport, host: &str, port: u16, host_keys: HostKeyPolicy) -> Self {
        Self {
            transport,
            host: host.to_owned(),
            port,
            host_keys,
            session: None,
            user: None,
        }
    }
}

#[async_trait]
impl Client for SshClient {
    async fn connect(&mut self) -> Result<()> {
        if self.session.is_some() {
            bail!("ssh session is already connected");
        }

        let config = Arc::new(russh::client::Config::default());
        let dispatch = tracing::dispatcher::get_default(Dispatch::clone);
        let handler = SshClientHandler::new(self.host_keys.clone(), dispatch);

        let stream = self
            .transport
            .connect(&self.host, self.port)
            .await
            .context("failed connecting target transport")?;

        let session = russh::client::connect_stream(config, stream, handler)
            .await
            .context("ssh handshake failed")?;
        self.session = Some(session);

        Ok(())
    }

    async fn auth(&mut self, payload: &AuthPayload) -> Result<()> {
        match payload {
            AuthPayload::User(x) => self.auth_user(x),
            AuthPayload::Password(x) => self.auth_password(x.expose()).await,
        }
    }

    async fn exec(&mut self, command: &str) -> Result<ExecOutput> {
        self.exec_inner(command).await
    }

    async fn close(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            bail!("no ssh session");
        };
        session
            .disconnect(russh::Disconnect::ByApplication, "", "English")
            .await?;
        Ok(())
    }
}

/// Helpers for [`Client::auth`]
impl SshClient {
    fn auth_user(&mut self, user: &str) -> Result<()> {
        if self.user.is_some() {
            bail!("ssh user is already set");
        }
        self.user = Some(user.to_owned());
        Ok(())
    }

    async fn auth_password(&mut self, password: &str) -> Result<()> {
        let Some(ref mut session) = self.session else {
            bail!("no ssh session");
        };
        let Some(ref user) = self.user else {
            bail!("no ssh user");
        };

        let authenticated = session.authenticate_password(user, password).await?;
        if !authenticated.success() {
            bail!("ssh authentication failed for user {user}");
        }

        Ok(())
    }
}

/// Helpers for [`Client::exec`]
impl SshClient {
    async fn exec_inner(&mut self, command: &str) -> Result<ExecOutput> {
        let Some(ref mut session) = self.session else {
            bail!("no ssh session");
        };

        let mut channel = session.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut code = None;
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        while let Some(msg) = channel.wait().await {
            match msg {
                russh::ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                russh::ChannelMsg::ExtendedData { ref data, ext: 1 } => {
                    stderr.extend_from_slice(data);
                }
                russh::ChannelMsg::ExitStatus { exit_status } => {
                    // more data may still follow the exit status
                    code = Some(exit_status);
                }
                _ => {}
            }
        }

        let exit_status = code.context("program did not exit cleanly")?;

        Ok(ExecOutput {
            exit_status,
            stdout,
            stderr,
        })
    }
}

// russh details --------------------------------------------------------------

/// russh drives the handler from its own session task, so events are sent
/// to the dispatcher that was current when the client connected.
#[derive(Debug)]
struct SshClientHandler {
    host_keys: HostKeyPolicy,
    dispatch: Dispatch,
}

impl SshClientHandler {
    fn new(host_keys: HostKeyPolicy, dispatch: Dispatch) -> Self {
        Self {
            host_keys,
            dispatch,
        }
    }
}

impl russh::client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        let fingerprint = server_public_key.fingerprint(Default::default()).to_string();
        let trusted = tracing::dispatcher::with_default(&self.dispatch, || {
            self.host_keys.trusts(&fingerprint)
        });
        Ok(trusted)
    }

    async fn auth_banner(
        &mut self,
        banner: &str,
        _session: &mut russh::client::Session,
    ) -> Result<(), Self::Error> {
        tracing::dispatcher::with_default(&self.dispatch, || {
            debug!(banner, "ssh server banner");
        });
        Ok(())
    }
}

// Tests ----------------------------------------------------------------------
