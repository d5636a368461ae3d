use std::error::Error as StdError;

/// Failures of a switch query.
///
/// An undecodable link response is not an error; see
/// [`LinkState::Unknown`](super::LinkState::Unknown).
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    /// A required field is missing or invalid. Nothing was sent to the switch.
    #[error("invalid switch configuration: {0}")]
    Configuration(String),

    /// The session could not be established or authenticated.
    #[error("unable to establish session with switch")]
    Connection(#[source] Box<dyn StdError + Send + Sync>),

    /// The remote command could not be run or its output could not be read.
    #[error("unable to run command on switch")]
    Execution(#[source] Box<dyn StdError + Send + Sync>),
}

impl SwitchError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    pub(crate) fn connection(error: anyhow::Error) -> Self {
        Self::Connection(error.into())
    }

    pub(crate) fn execution(error: anyhow::Error) -> Self {
        Self::Execution(error.into())
    }
}
