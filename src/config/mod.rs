#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::{LocalClient, SshClient, SshTarget};
use crate::core::{Client, ConfigProvider, Os, OsFamily};
use crate::domain::model::{DEFAULT_STAGING_FILE, DEFAULT_TEMP_DIR};
use crate::utils::error::{Result, SshKeysError};
use crate::utils::validation::validate_absolute_remote_path;
use toml_config::TomlConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsSelection {
    Auto,
    Family(OsFamily),
}

impl OsSelection {
    pub fn parse(value: &str) -> Result<Self> {
        if value.trim().eq_ignore_ascii_case("auto") {
            return Ok(OsSelection::Auto);
        }
        value
            .parse::<OsFamily>()
            .map(OsSelection::Family)
            .map_err(|reason| SshKeysError::InvalidConfigValueError {
                field: "os".to_string(),
                value: value.to_string(),
                reason,
            })
    }
}

fn layered(own: Option<&str>, from_file: Option<&str>) -> Option<String> {
    own.or(from_file).map(str::to_string)
}

/// Effective settings after layering command-line flags over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` runs commands locally.
    pub target: Option<SshTarget>,
    pub os: OsSelection,
    pub temp_dir: String,
    pub staging_file: String,
    pub identity_file: Option<String>,
    pub ssh_program: Option<String>,
    pub ssh_options: Vec<String>,
}

impl Settings {
    /// `primary` wins wherever it sets a value; `ssh_options` from both layers are combined.
    pub fn resolve<P: ConfigProvider>(primary: &P, file: Option<&TomlConfig>) -> Result<Self> {
        let local = primary.local() || (primary.target().is_none() && file.is_some_and(|f| f.local()));
        let target = if local {
            None
        } else {
            let raw = layered(primary.target(), file.and_then(|f| f.target())).ok_or_else(|| {
                SshKeysError::MissingConfigError {
                    field: "target (use --target or --local)".to_string(),
                }
            })?;
            Some(SshTarget::parse(&raw)?)
        };

        let os = match layered(primary.os_family(), file.and_then(|f| f.os_family())) {
            Some(value) => OsSelection::parse(&value)?,
            None => OsSelection::Auto,
        };

        let temp_dir = layered(primary.temp_dir(), file.and_then(|f| f.temp_dir()))
            .unwrap_or_else(|| DEFAULT_TEMP_DIR.to_string());
        validate_absolute_remote_path("temp_dir", &temp_dir)?;

        let mut ssh_options: Vec<String> = file.map(|f| f.ssh_options().to_vec()).unwrap_or_default();
        ssh_options.extend(primary.ssh_options().iter().cloned());

        Ok(Self {
            target,
            os,
            temp_dir,
            staging_file: file
                .and_then(|f| f.staging_file())
                .unwrap_or(DEFAULT_STAGING_FILE)
                .to_string(),
            identity_file: layered(primary.identity_file(), file.and_then(|f| f.identity_file())),
            ssh_program: file.and_then(|f| f.ssh_program()).map(str::to_string),
            ssh_options,
        })
    }

    pub fn build_client(&self) -> Box<dyn Client> {
        match &self.target {
            None => Box::new(LocalClient::new()),
            Some(target) => {
                let mut client = SshClient::new(target.clone())
                    .with_identity_file(self.identity_file.clone())
                    .with_options(self.ssh_options.clone());
                if let Some(program) = &self.ssh_program {
                    client = client.with_program(program.clone());
                }
                Box::new(client)
            }
        }
    }

    /// Builds the `Os` handle, asking the target for its kernel name in `auto` mode.
    pub async fn resolve_os<C: Client + ?Sized>(&self, c: &C) -> Result<Os> {
        let os = match self.os {
            OsSelection::Family(family) => Os::new(family).with_temp_dir(self.temp_dir.clone()),
            OsSelection::Auto => Os::detect(c, &self.temp_dir).await?,
        };
        Ok(os.with_staging_file(self.staging_file.clone()))
    }
}
