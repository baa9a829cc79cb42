pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{LocalClient, SshClient, SshTarget};
pub use config::{toml_config::TomlConfig, Settings};
pub use crate::core::{Client, HostKey, Os, OsFamily};
pub use utils::error::{Result, SshKeysError};
