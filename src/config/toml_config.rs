use crate::core::ConfigProvider;
use crate::domain::model::OsFamily;
use crate::utils::error::{Result, SshKeysError};
use crate::utils::validation::{
    validate_absolute_remote_path, validate_non_empty_string, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub os: OsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// `ssh://user@host:port`, `user@host` or `host`.
    pub url: Option<String>,
    pub local: Option<bool>,
    pub identity_file: Option<String>,
    pub ssh_program: Option<String>,
    #[serde(default)]
    pub ssh_options: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsConfig {
    /// An OS family name, or `auto` to run `uname -s` on the target.
    pub family: Option<String>,
    pub temp_dir: Option<String>,
    pub temp_file_name: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SshKeysError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are kept verbatim.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SshKeysError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn staging_file(&self) -> Option<&str> {
        self.os.temp_file_name.as_deref()
    }

    pub fn ssh_program(&self) -> Option<&str> {
        self.target.ssh_program.as_deref()
    }
}

impl ConfigProvider for TomlConfig {
    fn local(&self) -> bool {
        self.target.local.unwrap_or(false)
    }

    fn target(&self) -> Option<&str> {
        self.target.url.as_deref()
    }

    fn os_family(&self) -> Option<&str> {
        self.os.family.as_deref()
    }

    fn temp_dir(&self) -> Option<&str> {
        self.os.temp_dir.as_deref()
    }

    fn identity_file(&self) -> Option<&str> {
        self.target.identity_file.as_deref()
    }

    fn ssh_options(&self) -> &[String] {
        &self.target.ssh_options
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.target.url {
            crate::adapters::SshTarget::parse(url)?;
        }

        if let Some(identity) = &self.target.identity_file {
            validate_path("target.identity_file", identity)?;
        }

        if let Some(program) = &self.target.ssh_program {
            validate_non_empty_string("target.ssh_program", program)?;
        }

        if let Some(family) = &self.os.family {
            if !family.eq_ignore_ascii_case("auto") {
                family
                    .parse::<OsFamily>()
                    .map_err(|reason| SshKeysError::InvalidConfigValueError {
                        field: "os.family".to_string(),
                        value: family.clone(),
                        reason,
                    })?;
            }
        }

        if let Some(temp_dir) = &self.os.temp_dir {
            validate_absolute_remote_path("os.temp_dir", temp_dir)?;
        }

        if let Some(name) = &self.os.temp_file_name {
            validate_non_empty_string("os.temp_file_name", name)?;
            if name.contains('/') {
                return Err(SshKeysError::InvalidConfigValueError {
                    field: "os.temp_file_name".to_string(),
                    value: name.clone(),
                    reason: "Must be a file name, not a path".to_string(),
                });
            }
        }

        Ok(())
    }
}
