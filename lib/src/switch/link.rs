use std::fmt;

use super::SwitchError;

/// Link state of a switch interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LinkState {
    Up,
    Down,
    /// The switch answered, but not with a recognized link line.
    Unknown,
}

impl LinkState {
    /// Classifies the output of [`LinkCommand`]. Surrounding whitespace is
    /// ignored; anything other than the two exact link lines is
    /// [`LinkState::Unknown`].
    #[must_use]
    pub fn from_response(response: &str) -> Self {
        match response.trim() {
            "Link detected: yes" => Self::Up,
            "Link detected: no" => Self::Down,
            _ => Self::Unknown,
        }
    }
}

/// Remote command that reports whether an interface has link.
///
/// The interface name is interpolated into a shell command line, so only
/// ASCII letters, digits, `-` and `_` are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCommand {
    interface: String,
}

impl LinkCommand {
    /// # Errors
    ///
    /// If `interface` is empty or contains anything outside the allowed set.
    pub fn new(interface: &str) -> Result<Self, SwitchError> {
        if interface.is_empty() {
            return Err(SwitchError::configuration("device_intf is empty"));
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if !interface.chars().all(allowed) {
            return Err(SwitchError::configuration(format!(
                "device_intf {interface:?} may only contain ASCII letters, digits, '-' and '_'"
            )));
        }
        Ok(Self {
            interface: interface.to_owned(),
        })
    }

    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl fmt::Display for LinkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ethtool {} | grep \"Link detected\"", self.interface)
    }
}
