use thiserror::Error;

#[derive(Error, Debug)]
pub enum SshKeysError {
    #[error("unsupported OS")]
    UnsupportedOs,

    #[error("command `{command}` failed (exit status {code}): {stderr}", code = .status.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string()))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error("{path} exists but is not a directory")]
    NotADirectory { path: String },

    #[error("{path} exists but is not a regular file")]
    NotAFile { path: String },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<SshKeysError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, SshKeysError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Platform,
    Remote,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SshKeysError {
    /// Wraps `source` with a one-line description of the step that failed.
    pub fn context(context: impl Into<String>, source: SshKeysError) -> Self {
        SshKeysError::Context {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, skipping every `Context` layer.
    pub fn root_cause(&self) -> &SshKeysError {
        match self {
            SshKeysError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn is_unsupported_os(&self) -> bool {
        matches!(self.root_cause(), SshKeysError::UnsupportedOs)
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root_cause() {
            SshKeysError::UnsupportedOs => ErrorCategory::Platform,
            SshKeysError::CommandFailed { .. }
            | SshKeysError::UnexpectedOutput { .. }
            | SshKeysError::NotADirectory { .. }
            | SshKeysError::NotAFile { .. } => ErrorCategory::Remote,
            SshKeysError::Spawn { .. }
            | SshKeysError::IoError(_)
            | SshKeysError::SerializationError(_) => ErrorCategory::System,
            SshKeysError::TomlError(_)
            | SshKeysError::ConfigError { .. }
            | SshKeysError::MissingConfigError { .. }
            | SshKeysError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SshKeysError::Context { .. } => unreachable!("root_cause never returns Context"),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Platform => ErrorSeverity::High,
            ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Platform => {
                "The target operating system is not supported (Unix hosts only)".to_string()
            }
            ErrorCategory::Remote => format!("A remote command failed: {}", self),
            ErrorCategory::System => format!("A local system error occurred: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.root_cause() {
            SshKeysError::UnsupportedOs => {
                "Pass --os with a Unix family, or check the output of `uname -s` on the target"
            }
            SshKeysError::CommandFailed { .. } => {
                "Check that the user exists on the target and that you have enough privileges"
            }
            SshKeysError::Spawn { .. } => {
                "Install the OpenSSH client or set REMOTE_SSHKEYS_SSH to the full path of ssh"
            }
            SshKeysError::NotADirectory { .. } | SshKeysError::NotAFile { .. } => {
                "Remove or rename the conflicting path on the target"
            }
            SshKeysError::UnexpectedOutput { .. } => {
                "Verify the target's user database (getent/dscl) returns a home directory"
            }
            SshKeysError::SerializationError(_) => "Retry without --json to print the raw keys",
            _ => "Review the configuration file and command-line flags",
        }
    }
}

/// Adds step context to fallible remote calls.
pub trait ResultExt<T> {
    fn context(self, context: &str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|e| SshKeysError::context(context, e))
    }
}
