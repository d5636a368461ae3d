//! Switch reachability and port link queries.
//!
//! Two independent operations are offered:
//!
//! - [`ReachabilityProber::is_switch_online`] pings the management address.
//! - [`PortLinkRunner::get_port_link`] opens an SSH session, asks the switch
//!   for the link state of one interface and closes the session again.
//!
//! Neither keeps state between calls.

mod config;
mod error;
mod link;
mod port;
mod probe;

pub use self::config::SwitchConfig;
pub use self::config::DEFAULT_SSH_PORT;
pub use self::error::SwitchError;
pub use self::link::LinkCommand;
pub use self::link::LinkState;
pub use self::port::PortLinkRunner;
pub use self::port::SessionFactory;
pub use self::port::SshSessionFactory;
pub use self::probe::PingOptions;
pub use self::probe::Pinger;
pub use self::probe::ReachabilityProber;
pub use self::probe::SystemPinger;
pub use crate::action::client::HostKeyPolicy;
