use anyhow::anyhow;
use tracing::debug;
use tracing::info;
use tracing::instrument::WithSubscriber;
use tracing::warn;
use tracing::Dispatch;

use super::LinkCommand;
use super::LinkState;
use super::SwitchConfig;
use super::SwitchError;
use crate::action::client::SshClient;
use crate::action::client::SshClientFactory;
use crate::action::transport::TcpTransport;
use crate::action::AuthPayload;
use crate::action::Client;
use crate::action::ExecOutput;

/// Exit status of `grep` when no line matched.
const GREP_NO_MATCH: u32 = 1;

// Sessions -------------------------------------------------------------------

/// Builds the [`Client`] that serves a single link query.
pub trait SessionFactory {
    type Client: Client + Send;

    /// Builds an unconnected client for the switch described by `config`.
    fn session(&self, config: &SwitchConfig) -> Self::Client;
}

/// [`SessionFactory`] that connects over SSH.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshSessionFactory;

impl SessionFactory for SshSessionFactory {
    type Client = SshClient;

    fn session(&self, config: &SwitchConfig) -> SshClient {
        let transport = TcpTransport::new(config.connect_timeout());
        SshClientFactory::new(transport, config.host_key.clone())
            .client(config.host.trim(), config.ssh_port)
    }
}

// Runner ---------------------------------------------------------------------

/// Answers "what is the link state of the configured interface?".
///
/// Every call opens its own session and closes it before returning.
pub struct PortLinkRunner<F = SshSessionFactory> {
    sessions: F,
    dispatch: Dispatch,
}

impl PortLinkRunner {
    /// Runner that queries switches over SSH.
    #[must_use]
    pub fn ssh(dispatch: Dispatch) -> Self {
        Self::new(SshSessionFactory, dispatch)
    }
}

impl<F> PortLinkRunner<F>
where
    F: SessionFactory,
{
    /// Events are emitted through `dispatch` only.
    pub fn new(sessions: F, dispatch: Dispatch) -> Self {
        Self { sessions, dispatch }
    }

    /// Queries the link state of `config.device_intf`.
    ///
    /// # Errors
    ///
    /// - [`SwitchError::Configuration`] if a required field is missing or
    ///   invalid; nothing is sent to the switch.
    /// - [`SwitchError::Connection`] if the session cannot be established or
    ///   authenticated.
    /// - [`SwitchError::Execution`] if the command cannot be run or fails.
    pub async fn get_port_link(&self, config: &SwitchConfig) -> Result<LinkState, SwitchError> {
        self.query(config)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    async fn query(&self, config: &SwitchConfig) -> Result<LinkState, SwitchError> {
        let request = LinkRequest::try_from(config)?;

        let mut client = self.sessions.session(config);
        client
            .connect()
            .await
            .map_err(|error| SwitchError::connection(error.context("unable to connect")))?;
        debug!(host = request.host, port = config.ssh_port, "switch session opened");

        let result = request.run(&mut client).await;

        if let Err(error) = client.close().await {
            warn!(host = request.host, ?error, "failed closing switch session");
        }

        result
    }
}

/// A link query whose inputs have been validated.
struct LinkRequest<'a> {
    host: &'a str,
    user: &'a str,
    password: AuthPayload,
    command: LinkCommand,
}

impl<'a> TryFrom<&'a SwitchConfig> for LinkRequest<'a> {
    type Error = SwitchError;

    fn try_from(config: &'a SwitchConfig) -> Result<Self, Self::Error> {
        let host = config.host()?;
        let user = config
            .username
            .as_deref()
            .filter(|user| !user.is_empty())
            .ok_or_else(|| SwitchError::configuration("username is required"))?;
        let password = config
            .password
            .clone()
            .ok_or_else(|| SwitchError::configuration("password is required"))?;
        let interface = config
            .device_intf
            .as_deref()
            .ok_or_else(|| SwitchError::configuration("device_intf is required"))?;
        let command = LinkCommand::new(interface)?;

        if !config.host_key.is_configured() {
            return Err(SwitchError::configuration(
                "no host key is trusted; pin host_key.fingerprints or set \
                 host_key.insecure_accept_unknown_host_keys",
            ));
        }

        Ok(Self {
            host,
            user,
            password: AuthPayload::Password(password),
            command,
        })
    }
}

impl LinkRequest<'_> {
    async fn run<C>(&self, client: &mut C) -> Result<LinkState, SwitchError>
    where
        C: Client + Send,
    {
        let user = AuthPayload::User(self.user.to_owned());
        for payload in [&user, &self.password] {
            client
                .auth(payload)
                .await
                .map_err(|error| SwitchError::connection(error.context("unable to authenticate")))?;
        }

        let output = client
            .exec(&self.command.to_string())
            .await
            .map_err(|error| SwitchError::execution(error.context("unable to run link query")))?;

        let response = decode(&output)?;
        info!(
            host = self.host,
            intf = self.command.interface(),
            %response,
            "link query response"
        );

        Ok(LinkState::from_response(&response))
    }
}

/// Turns command output into the trimmed response line.
///
/// The pipeline's exit status is `grep`'s, so "no line matched" is a response
/// to classify rather than a failure.
fn decode(output: &ExecOutput) -> Result<String, SwitchError> {
    match output.exit_status {
        0 => {}
        GREP_NO_MATCH if output.stdout.trim_ascii().is_empty() => {}
        status => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SwitchError::execution(anyhow!(
                "link query exited with status {status}: {}",
                stderr.trim()
            )));
        }
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
}
