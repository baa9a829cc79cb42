pub mod detect;
pub mod fs;
pub mod ssh;
pub mod user;

pub use crate::domain::model::{HostKey, Os, OsFamily, PathKind};
pub use crate::domain::ports::{Client, ConfigProvider};
pub use crate::utils::error::Result;

use crate::utils::error::SshKeysError;

/// Runs one remote command and decodes its stdout as UTF-8.
pub(crate) async fn run<C: Client + ?Sized>(c: &C, program: &str, args: &[&str]) -> Result<String> {
    tracing::debug!(program, ?args, "exec");
    let out = c.exec(program, args).await?;
    String::from_utf8(out).map_err(|e| SshKeysError::UnexpectedOutput {
        command: display_command(program, args),
        output: String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

pub(crate) fn ensure_unix(os: &Os) -> Result<()> {
    if os.is_unix() {
        Ok(())
    } else {
        tracing::debug!(family = %os.family, "refusing remote call on non-Unix target");
        Err(SshKeysError::UnsupportedOs)
    }
}

pub(crate) fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
