use crate::core::display_command;
use crate::domain::ports::Client;
use crate::utils::error::{Result, SshKeysError};
use async_trait::async_trait;
use std::fmt;
use tokio::process::Command;
use url::Url;

pub const SSH_PROGRAM_ENV: &str = "REMOTE_SSHKEYS_SSH";

/// Resolve the system `ssh` binary: env override, then PATH, then the bare name.
pub fn ssh_program() -> String {
    if let Ok(p) = std::env::var(SSH_PROGRAM_ENV) {
        let p = p.trim();
        if !p.is_empty() {
            return p.to_string();
        }
    }

    if let Ok(p) = which::which("ssh") {
        return p.to_string_lossy().to_string();
    }

    "ssh".to_string()
}

/// Quotes `arg` for a POSIX shell. Plain words are passed through untouched.
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if plain {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// `[user@]host[:port]` of the machine commands are sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
}

impl SshTarget {
    /// Accepts `ssh://user@host:port`, `user@host` and `host`.
    pub fn parse(target: &str) -> Result<Self> {
        let target = target.trim();
        let invalid = |reason: &str| SshKeysError::InvalidConfigValueError {
            field: "target".to_string(),
            value: target.to_string(),
            reason: reason.to_string(),
        };

        if target.is_empty() {
            return Err(invalid("Target cannot be empty"));
        }

        if target.contains("://") {
            let url = Url::parse(target).map_err(|e| invalid(&format!("Invalid URL format: {}", e)))?;
            if url.scheme() != "ssh" {
                return Err(invalid(&format!("Unsupported URL scheme: {}", url.scheme())));
            }
            let host = url
                .host_str()
                .filter(|h| !h.is_empty())
                .ok_or_else(|| invalid("URL has no host"))?;
            let user = Some(url.username())
                .filter(|u| !u.is_empty())
                .map(str::to_string);
            return Ok(Self {
                user,
                host: host.trim_matches(|c| c == '[' || c == ']').to_string(),
                port: url.port(),
            });
        }

        let (user, host) = match target.split_once('@') {
            Some((user, host)) => (Some(user.to_string()), host),
            None => (None, target),
        };
        if host.is_empty() || user.as_deref() == Some("") {
            return Err(invalid("Expected [user@]host"));
        }

        Ok(Self {
            user,
            host: host.to_string(),
            port: None,
        })
    }

    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }
}

impl fmt::Display for SshTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.destination(), port),
            None => f.write_str(&self.destination()),
        }
    }
}

/// Runs commands on a remote host through the system OpenSSH client.
#[derive(Debug, Clone)]
pub struct SshClient {
    program: String,
    target: SshTarget,
    identity_file: Option<String>,
    options: Vec<String>,
}

impl SshClient {
    pub fn new(target: SshTarget) -> Self {
        Self {
            program: ssh_program(),
            target,
            identity_file: None,
            options: Vec::new(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_identity_file(mut self, identity_file: Option<String>) -> Self {
        self.identity_file = identity_file;
        self
    }

    /// Extra `-o` options, e.g. `StrictHostKeyChecking=accept-new`.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn target(&self) -> &SshTarget {
        &self.target
    }

    /// Arguments passed to the ssh binary for one remote command.
    pub fn ssh_args(&self, program: &str, args: &[&str]) -> Vec<String> {
        let mut out = vec!["-o".to_string(), "BatchMode=yes".to_string()];
        if let Some(port) = self.target.port {
            out.push("-p".to_string());
            out.push(port.to_string());
        }
        if let Some(identity) = &self.identity_file {
            out.push("-i".to_string());
            out.push(identity.clone());
        }
        for option in &self.options {
            out.push("-o".to_string());
            out.push(option.clone());
        }
        out.push(self.target.destination());
        out.push("--".to_string());

        let remote = std::iter::once(program)
            .chain(args.iter().copied())
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ");
        out.push(remote);
        out
    }
}

#[async_trait]
impl Client for SshClient {
    async fn exec(&self, program: &str, args: &[&str]) -> Result<Vec<u8>> {
        let ssh_args = self.ssh_args(program, args);
        tracing::debug!(host = %self.target, command = %display_command(program, args), "ssh exec");

        let output = Command::new(&self.program)
            .args(&ssh_args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SshKeysError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SshKeysError::CommandFailed {
                command: display_command(program, args),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/home/backup/.ssh"), "/home/backup/.ssh");
        assert_eq!(shell_quote("backup:backup"), "backup:backup");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("ssh-ed25519 AAAA root@host"), "'ssh-ed25519 AAAA root@host'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_parse_targets() {
        let t = SshTarget::parse("ssh://root@backup.example.com:2222").unwrap();
        assert_eq!(t.user.as_deref(), Some("root"));
        assert_eq!(t.host, "backup.example.com");
        assert_eq!(t.port, Some(2222));

        let t = SshTarget::parse("admin@10.0.0.5").unwrap();
        assert_eq!(t.destination(), "admin@10.0.0.5");
        assert_eq!(t.port, None);

        let t = SshTarget::parse("nas").unwrap();
        assert_eq!(t.to_string(), "nas");

        assert!(SshTarget::parse("").is_err());
        assert!(SshTarget::parse("@host").is_err());
        assert!(SshTarget::parse("http://host").is_err());
    }

    #[test]
    fn test_ssh_args_quote_remote_command() {
        let client = SshClient::new(SshTarget::parse("ssh://root@nas:2222").unwrap())
            .with_program("ssh")
            .with_identity_file(Some("/root/.ssh/id_ed25519".to_string()))
            .with_options(vec!["StrictHostKeyChecking=accept-new".to_string()]);

        let args = client.ssh_args("chown", &["backup:backup", "/home/backup dir"]);
        assert_eq!(
            args,
            vec![
                "-o",
                "BatchMode=yes",
                "-p",
                "2222",
                "-i",
                "/root/.ssh/id_ed25519",
                "-o",
                "StrictHostKeyChecking=accept-new",
                "root@nas",
                "--",
                "chown backup:backup '/home/backup dir'",
            ]
        );
    }
}
