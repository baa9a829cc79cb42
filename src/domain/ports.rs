use crate::utils::error::Result;
use async_trait::async_trait;

/// Runs a named command with arguments on the target host.
///
/// Returns the raw standard output on success. A command that cannot be
/// started or exits non-zero is an error.
#[async_trait]
pub trait Client: Send + Sync {
    async fn exec(&self, program: &str, args: &[&str]) -> Result<Vec<u8>>;
}

#[async_trait]
impl<C: Client + ?Sized> Client for &C {
    async fn exec(&self, program: &str, args: &[&str]) -> Result<Vec<u8>> {
        (**self).exec(program, args).await
    }
}

#[async_trait]
impl<C: Client + ?Sized> Client for Box<C> {
    async fn exec(&self, program: &str, args: &[&str]) -> Result<Vec<u8>> {
        (**self).exec(program, args).await
    }
}

/// Settings shared by every configuration source.
pub trait ConfigProvider {
    /// Run commands on this machine instead of over SSH.
    fn local(&self) -> bool {
        false
    }
    fn target(&self) -> Option<&str>;
    fn os_family(&self) -> Option<&str>;
    fn temp_dir(&self) -> Option<&str>;
    fn identity_file(&self) -> Option<&str>;
    fn ssh_options(&self) -> &[String];
}
