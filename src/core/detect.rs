use super::{run, Client, Os, OsFamily, Result};
use crate::utils::error::ResultExt;

impl Os {
    /// Asks the target for its kernel name and builds an `Os` from it.
    ///
    /// Kernels this crate does not know map to `OsFamily::Unknown`, which every
    /// remote helper then rejects as unsupported.
    pub async fn detect<C: Client + ?Sized>(c: &C, temp_dir: &str) -> Result<Os> {
        let kernel = run(c, "uname", &["-s"])
            .await
            .context("error detecting the OS")?;

        let family = OsFamily::from_uname(&kernel);
        tracing::info!(kernel = kernel.trim(), %family, "detected target OS");

        Ok(Os::new(family).with_temp_dir(temp_dir))
    }
}
