// Adapters layer: concrete `Client` implementations (local process, OpenSSH).

pub mod local;
pub mod ssh;

pub use local::LocalClient;
pub use ssh::{shell_quote, SshClient, SshTarget};
