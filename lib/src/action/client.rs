mod ssh;

pub use self::ssh::HostKeyPolicy;
pub use self::ssh::SshClient;
pub use self::ssh::SshClientFactory;
