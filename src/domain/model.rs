use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TEMP_DIR: &str = "/tmp";
pub const DEFAULT_STAGING_FILE: &str = "remote_sshkeys_authorized_keys";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    #[serde(alias = "darwin")]
    MacOs,
    FreeBsd,
    OpenBsd,
    NetBsd,
    Solaris,
    Windows,
    Unknown,
}

impl OsFamily {
    pub fn is_unix(self) -> bool {
        !matches!(self, OsFamily::Windows | OsFamily::Unknown)
    }

    /// Maps the kernel name printed by `uname -s`.
    pub fn from_uname(kernel: &str) -> Self {
        let kernel = kernel.trim();
        match kernel {
            "Linux" => OsFamily::Linux,
            "Darwin" => OsFamily::MacOs,
            "FreeBSD" => OsFamily::FreeBsd,
            "OpenBSD" => OsFamily::OpenBsd,
            "NetBSD" => OsFamily::NetBsd,
            "SunOS" => OsFamily::Solaris,
            k if k.starts_with("MINGW") || k.starts_with("MSYS") || k.starts_with("CYGWIN") => {
                OsFamily::Windows
            }
            k if k.eq_ignore_ascii_case("Windows_NT") => OsFamily::Windows,
            _ => OsFamily::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OsFamily::Linux => "linux",
            OsFamily::MacOs => "macos",
            OsFamily::FreeBsd => "freebsd",
            OsFamily::OpenBsd => "openbsd",
            OsFamily::NetBsd => "netbsd",
            OsFamily::Solaris => "solaris",
            OsFamily::Windows => "windows",
            OsFamily::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(OsFamily::Linux),
            "macos" | "darwin" => Ok(OsFamily::MacOs),
            "freebsd" => Ok(OsFamily::FreeBsd),
            "openbsd" => Ok(OsFamily::OpenBsd),
            "netbsd" => Ok(OsFamily::NetBsd),
            "solaris" | "sunos" => Ok(OsFamily::Solaris),
            "windows" => Ok(OsFamily::Windows),
            "unknown" => Ok(OsFamily::Unknown),
            other => Err(format!("unknown OS family: {}", other)),
        }
    }
}

/// The target host's operating system. Every remote helper is a method on this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Os {
    pub family: OsFamily,
    pub temp_dir: String,
    /// File name, under `temp_dir`, used to stage authorized_keys edits.
    pub staging_file: String,
}

impl Os {
    pub fn new(family: OsFamily) -> Self {
        Self {
            family,
            temp_dir: DEFAULT_TEMP_DIR.to_string(),
            staging_file: DEFAULT_STAGING_FILE.to_string(),
        }
    }

    pub fn with_staging_file(mut self, name: impl Into<String>) -> Self {
        self.staging_file = name.into();
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<String>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    pub fn is_unix(&self) -> bool {
        self.family.is_unix()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Directory,
    File,
    Other,
    Missing,
}

impl PathKind {
    pub(crate) fn from_probe(output: &str) -> Option<Self> {
        match output.trim() {
            "dir" => Some(PathKind::Directory),
            "file" => Some(PathKind::File),
            "other" => Some(PathKind::Other),
            "none" => Some(PathKind::Missing),
            _ => None,
        }
    }
}

/// One line of `ssh-keyscan` output: `<host> <key type> <base64 key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostKey {
    pub host: String,
    pub key_type: String,
    pub key: String,
}

impl HostKey {
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let host = fields.next()?;
        let key_type = fields.next()?;
        let key = fields.next()?;
        Some(Self {
            host: host.to_string(),
            key_type: key_type.to_string(),
            key: key.to_string(),
        })
    }
}

/// Joins remote path segments with `/`, independent of the local platform.
pub fn remote_join(base: &str, segment: &str) -> String {
    let segment = segment.trim_start_matches('/');
    if base.is_empty() {
        return segment.to_string();
    }
    let base = base.trim_end_matches('/');
    format!("{}/{}", base, segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_families() {
        assert!(OsFamily::Linux.is_unix());
        assert!(OsFamily::MacOs.is_unix());
        assert!(OsFamily::Solaris.is_unix());
        assert!(!OsFamily::Windows.is_unix());
        assert!(!OsFamily::Unknown.is_unix());
    }

    #[test]
    fn test_from_uname() {
        assert_eq!(OsFamily::from_uname("Linux\n"), OsFamily::Linux);
        assert_eq!(OsFamily::from_uname("Darwin"), OsFamily::MacOs);
        assert_eq!(OsFamily::from_uname("MINGW64_NT-10.0-19045"), OsFamily::Windows);
        assert_eq!(OsFamily::from_uname("Plan9"), OsFamily::Unknown);
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("Darwin".parse::<OsFamily>().unwrap(), OsFamily::MacOs);
        assert_eq!(" linux ".parse::<OsFamily>().unwrap(), OsFamily::Linux);
        assert!("beos".parse::<OsFamily>().is_err());
    }

    #[test]
    fn test_remote_join() {
        assert_eq!(remote_join("/home/backup", ".ssh"), "/home/backup/.ssh");
        assert_eq!(remote_join("/home/backup/", ".ssh"), "/home/backup/.ssh");
        assert_eq!(remote_join("/", ".ssh"), "/.ssh");
        assert_eq!(remote_join("/tmp", "/staged"), "/tmp/staged");
    }

    #[test]
    fn test_host_key_parse() {
        let key = HostKey::parse("example.com ssh-ed25519 AAAAC3NzaC1lZDI1NTE5").unwrap();
        assert_eq!(key.host, "example.com");
        assert_eq!(key.key_type, "ssh-ed25519");
        assert!(HostKey::parse("example.com").is_none());
    }
}
