use crate::core::display_command;
use crate::domain::ports::Client;
use crate::utils::error::{Result, SshKeysError};
use async_trait::async_trait;
use tokio::process::Command;

/// Runs commands on the machine this process runs on.
#[derive(Debug, Clone, Default)]
pub struct LocalClient;

impl LocalClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Client for LocalClient {
    async fn exec(&self, program: &str, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SshKeysError::Spawn {
                program: program.to_string(),
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
