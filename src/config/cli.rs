use crate::core::ConfigProvider;
use crate::utils::error::{Result, SshKeysError};
use crate::utils::validation::{
    validate_absolute_remote_path, validate_non_empty_string, validate_path, validate_port,
    validate_public_key, validate_username, Validate,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "remote-sshkeys")]
#[command(about = "Manage SSH host keys and authorized_keys files on remote Unix hosts")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Host to run commands on: ssh://user@host:port, user@host or host
    #[arg(short, long)]
    pub target: Option<String>,

    /// Run commands on this machine instead of over SSH
    #[arg(long, conflicts_with = "target")]
    pub local: bool,

    /// Target OS family (linux, macos, freebsd, ...) or `auto` to detect it
    #[arg(long)]
    pub os: Option<String>,

    /// Remote directory used to stage authorized_keys edits
    #[arg(long)]
    pub temp_dir: Option<String>,

    /// Identity file passed to ssh with -i
    #[arg(short, long)]
    pub identity: Option<String>,

    /// Extra ssh -o option, may be repeated
    #[arg(long = "ssh-option")]
    pub ssh_options: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the public host keys of a server, as seen from the target
    HostKeys {
        #[arg(long)]
        host: String,

        #[arg(long, default_value = "22")]
        port: u16,

        /// Print the keys as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Append a public key to a user's authorized_keys on the target
    CopyId {
        #[arg(short, long)]
        user: String,

        /// The public key line itself
        #[arg(long, conflicts_with = "key_file", required_unless_present = "key_file")]
        key: Option<String>,

        /// Local file holding the public key
        #[arg(long)]
        key_file: Option<String>,
    },

    /// Print the path of a user's .ssh directory on the target
    KeysPath {
        #[arg(short, long)]
        user: String,
    },
}

impl CliConfig {
    /// The public key to install, read from `--key` or `--key-file`.
    pub fn public_key(&self) -> Result<Option<Vec<u8>>> {
        let Command::CopyId { key, key_file, .. } = &self.command else {
            return Ok(None);
        };

        let key = match (key, key_file) {
            (Some(key), _) => key.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => {
                return Err(SshKeysError::MissingConfigError {
                    field: "key or key_file".to_string(),
                })
            }
        };
        validate_public_key("key", &key)?;

        Ok(Some(key.trim().as_bytes().to_vec()))
    }
}

impl ConfigProvider for CliConfig {
    fn local(&self) -> bool {
        self.local
    }

    fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn os_family(&self) -> Option<&str> {
        self.os.as_deref()
    }

    fn temp_dir(&self) -> Option<&str> {
        self.temp_dir.as_deref()
    }

    fn identity_file(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    fn ssh_options(&self) -> &[String] {
        &self.ssh_options
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }

        if let Some(temp_dir) = &self.temp_dir {
            validate_absolute_remote_path("temp_dir", temp_dir)?;
        }

        match &self.command {
            Command::HostKeys { host, port, .. } => {
                validate_non_empty_string("host", host)?;
                validate_port("port", *port)?;
            }
            Command::CopyId { user, key, key_file } => {
                validate_username("user", user)?;
                if let Some(key) = key {
                    validate_public_key("key", key)?;
                }
                if let Some(path) = key_file {
                    validate_path("key_file", path)?;
                }
            }
            Command::KeysPath { user } => validate_username("user", user)?,
        }

        Ok(())
    }
}
