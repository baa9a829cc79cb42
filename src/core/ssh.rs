use super::{ensure_unix, run, Client, Os, Result};
use crate::domain::model::remote_join;
use crate::utils::error::ResultExt;

pub const SSH_DIR: &str = ".ssh";
pub const AUTHORIZED_KEYS: &str = "authorized_keys";
pub const SSH_DIR_MODE: u32 = 0o700;
pub const AUTHORIZED_KEYS_MODE: u32 = 0o600;

/// Drops the `# host:port SSH-2.0-...` banner lines `ssh-keyscan` prints.
pub fn parse_keyscan_output(out: &str) -> Vec<String> {
    let out = out.trim();
    if out.is_empty() {
        return Vec::new();
    }

    out.split('\n')
        .filter(|l| !l.starts_with("# "))
        .map(str::to_string)
        .collect()
}

impl Os {
    /// Public host keys of `host:port`, as scanned from the target.
    pub async fn get_host_keys<C: Client + ?Sized>(
        &self,
        c: &C,
        host: &str,
        port: u16,
    ) -> Result<Vec<String>> {
        ensure_unix(self)?;

        let port = port.to_string();
        let out = run(c, "ssh-keyscan", &["-p", port.as_str(), host])
            .await
            .context("error getting the host SSH keys")?;

        let keys = parse_keyscan_output(&out);
        tracing::info!(host, port = %port, count = keys.len(), "scanned host keys");
        Ok(keys)
    }

    /// Adds `key` to the authorized_keys file of `user`, creating `~/.ssh` when missing.
    ///
    /// The file is staged in a fresh temp file and moved into place. Steps are
    /// not rolled back: a failure after the move leaves ownership or mode unset.
    pub async fn copy_id<C: Client + ?Sized>(&self, c: &C, user: &str, key: &[u8]) -> Result<()> {
        ensure_unix(self)?;

        let home = self
            .home(c, user)
            .await
            .context("error copying the SSH key")?;
        let group = self
            .user_group(c, user)
            .await
            .context("error copying the SSH key")?;

        let ssh_dir = remote_join(&home, SSH_DIR);
        let exists = self
            .check_dir(c, &ssh_dir)
            .await
            .context("error checking the SSH directory")?;

        if !exists {
            tracing::debug!(path = %ssh_dir, "creating SSH directory");
            self.mkdir(c, &ssh_dir)
                .await
                .context("error creating the SSH directory")?;
            self.chown(c, &ssh_dir, user, &group)
                .await
                .context("error changing the SSH directory owner")?;
            self.chmod(c, &ssh_dir, SSH_DIR_MODE)
                .await
                .context("error changing the SSH directory permissions")?;
        }

        let auth_keys = remote_join(&ssh_dir, AUTHORIZED_KEYS);
        let exists = self
            .check_file(c, &auth_keys)
            .await
            .context("error checking for the authorized_keys file")?;

        // A per-call file, so leftovers from other runs never end up in authorized_keys.
        let staged = self
            .make_temp_file(c, &self.staging_file)
            .await
            .context("error creating the staging file for authorized_keys")?;

        if exists {
            self.copy(c, &auth_keys, &staged)
                .await
                .context("error copying the authorized_keys file")?;
        }

        self.append_to_file(c, &staged, key)
            .await
            .context("error adding the key to the authorized_keys file")?;
        self.move_file(c, &staged, &auth_keys)
            .await
            .context("error replacing the authorized_keys file")?;
        self.chown(c, &auth_keys, user, &group)
            .await
            .context("error changing the authorized_keys owner")?;
        self.chmod(c, &auth_keys, AUTHORIZED_KEYS_MODE)
            .await
            .context("error changing the authorized_keys permissions")?;

        tracing::info!(user, path = %auth_keys, "installed SSH key");
        Ok(())
    }

    /// The `.ssh` directory of `user` on the target.
    pub async fn get_keys_path<C: Client + ?Sized>(&self, c: &C, user: &str) -> Result<String> {
        ensure_unix(self)?;

        let home = self
            .home(c, user)
            .await
            .context("error getting the public key")?;

        Ok(remote_join(&home, SSH_DIR))
    }
}
