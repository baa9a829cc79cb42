use super::{display_command, ensure_unix, run, Client, Os, Result};
use crate::utils::error::SshKeysError;

impl Os {
    /// Primary group name of `user` on the target.
    pub async fn user_group<C: Client + ?Sized>(&self, c: &C, user: &str) -> Result<String> {
        ensure_unix(self)?;

        let out = run(c, "id", &["-gn", user]).await?;
        let group = out.trim();
        if group.is_empty() {
            return Err(SshKeysError::UnexpectedOutput {
                command: display_command("id", &["-gn", user]),
                output: out.clone(),
            });
        }

        Ok(group.to_string())
    }
}
