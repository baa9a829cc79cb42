use super::{display_command, ensure_unix, run, Client, Os, OsFamily, PathKind, Result};
use crate::domain::model::remote_join;
use crate::utils::error::SshKeysError;

const PROBE_SCRIPT: &str = r#"if [ -d "$1" ]; then echo dir; elif [ -f "$1" ]; then echo file; elif [ -e "$1" ]; then echo other; else echo none; fi"#;

// Appends $1 as its own line to $2, adding a separator if $2 lacks a final newline.
const APPEND_SCRIPT: &str = r#"if [ -s "$2" ] && [ -n "$(tail -c 1 "$2")" ]; then printf '\n' >> "$2"; fi; printf '%s\n' "$1" >> "$2""#;

impl Os {
    /// Home directory of `user` on the target.
    pub async fn home<C: Client + ?Sized>(&self, c: &C, user: &str) -> Result<String> {
        ensure_unix(self)?;

        let home = match self.family {
            OsFamily::MacOs => {
                let record = format!("/Users/{}", user);
                let args = [".", "-read", record.as_str(), "NFSHomeDirectory"];
                let out = run(c, "dscl", &args).await?;
                out.lines()
                    .find_map(|l| l.strip_prefix("NFSHomeDirectory:"))
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| SshKeysError::UnexpectedOutput {
                        command: display_command("dscl", &args),
                        output: out.clone(),
                    })?
            }
            _ => {
                let out = run(c, "getent", &["passwd", user]).await?;
                out.lines()
                    .next()
                    .and_then(|l| l.split(':').nth(5))
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| SshKeysError::UnexpectedOutput {
                        command: display_command("getent", &["passwd", user]),
                        output: out.clone(),
                    })?
            }
        };

        Ok(home)
    }

    /// What, if anything, lives at `path` on the target.
    pub async fn probe<C: Client + ?Sized>(&self, c: &C, path: &str) -> Result<PathKind> {
        ensure_unix(self)?;

        let args = ["-c", PROBE_SCRIPT, "sh", path];
        let out = run(c, "sh", &args).await?;
        PathKind::from_probe(&out).ok_or_else(|| SshKeysError::UnexpectedOutput {
            command: display_command("sh", &args),
            output: out,
        })
    }

    pub async fn check_dir<C: Client + ?Sized>(&self, c: &C, path: &str) -> Result<bool> {
        match self.probe(c, path).await? {
            PathKind::Directory => Ok(true),
            PathKind::Missing => Ok(false),
            PathKind::File | PathKind::Other => Err(SshKeysError::NotADirectory {
                path: path.to_string(),
            }),
        }
    }

    pub async fn check_file<C: Client + ?Sized>(&self, c: &C, path: &str) -> Result<bool> {
        match self.probe(c, path).await? {
            PathKind::File => Ok(true),
            PathKind::Missing => Ok(false),
            PathKind::Directory | PathKind::Other => Err(SshKeysError::NotAFile {
                path: path.to_string(),
            }),
        }
    }

    pub async fn mkdir<C: Client + ?Sized>(&self, c: &C, path: &str) -> Result<()> {
        ensure_unix(self)?;
        run(c, "mkdir", &["-p", path]).await?;
        Ok(())
    }

    pub async fn chown<C: Client + ?Sized>(
        &self,
        c: &C,
        path: &str,
        user: &str,
        group: &str,
    ) -> Result<()> {
        ensure_unix(self)?;
        let owner = format!("{}:{}", user, group);
        run(c, "chown", &[owner.as_str(), path]).await?;
        Ok(())
    }

    /// `mode` is the numeric permission set, e.g. `0o700`.
    pub async fn chmod<C: Client + ?Sized>(&self, c: &C, path: &str, mode: u32) -> Result<()> {
        ensure_unix(self)?;
        let mode = format!("{:o}", mode);
        run(c, "chmod", &[mode.as_str(), path]).await?;
        Ok(())
    }

    pub async fn copy<C: Client + ?Sized>(&self, c: &C, src: &str, dst: &str) -> Result<()> {
        ensure_unix(self)?;
        run(c, "cp", &[src, dst]).await?;
        Ok(())
    }

    /// Appends `data` to `path` as a complete line, creating the file if needed.
    pub async fn append_to_file<C: Client + ?Sized>(
        &self,
        c: &C,
        path: &str,
        data: &[u8],
    ) -> Result<()> {
        ensure_unix(self)?;

        let text = std::str::from_utf8(data).map_err(|e| SshKeysError::InvalidConfigValueError {
            field: "data".to_string(),
            value: String::from_utf8_lossy(data).into_owned(),
            reason: format!("not valid UTF-8: {}", e),
        })?;
        let line = text.trim_end_matches(['\n', '\r']);

        run(c, "sh", &["-c", APPEND_SCRIPT, "sh", line, path]).await?;
        Ok(())
    }

    pub async fn move_file<C: Client + ?Sized>(&self, c: &C, src: &str, dst: &str) -> Result<()> {
        ensure_unix(self)?;
        run(c, "mv", &[src, dst]).await?;
        Ok(())
    }

    /// Creates a fresh, empty file named after `prefix` in the temp directory.
    pub async fn make_temp_file<C: Client + ?Sized>(&self, c: &C, prefix: &str) -> Result<String> {
        ensure_unix(self)?;

        let template = remote_join(self.temp_dir(), &format!("{}.XXXXXX", prefix));
        let out = run(c, "mktemp", &[template.as_str()]).await?;
        let path = out.trim();
        if path.is_empty() || path.contains('\n') {
            return Err(SshKeysError::UnexpectedOutput {
                command: display_command("mktemp", &[template.as_str()]),
                output: out.clone(),
            });
        }

        Ok(path.to_string())
    }

    /// Remote directory used for staging files. No remote call.
    pub fn temp_dir(&self) -> &str {
        &self.temp_dir
    }
}
