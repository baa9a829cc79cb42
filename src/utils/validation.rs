use crate::utils::error::{Result, SshKeysError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SshKeysError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SshKeysError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Remote temp directories are used to stage authorized_keys, so they must be absolute.
pub fn validate_absolute_remote_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    if !path.starts_with('/') {
        return Err(SshKeysError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Remote path must be absolute".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SshKeysError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SshKeysError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_port(field_name: &str, port: u16) -> Result<()> {
    validate_range(field_name, port, 1, u16::MAX)
}

/// A public key is appended verbatim as one authorized_keys line.
pub fn validate_public_key(field_name: &str, key: &str) -> Result<()> {
    let trimmed = key.trim();
    validate_non_empty_string(field_name, trimmed)?;

    if trimmed.contains('\n') || trimmed.contains('\r') {
        return Err(SshKeysError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: trimmed.to_string(),
            reason: "Public key must be a single line".to_string(),
        });
    }

    if trimmed.contains('\0') {
        return Err(SshKeysError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: trimmed.to_string(),
            reason: "Public key contains null bytes".to_string(),
        });
    }

    if trimmed.split_whitespace().count() < 2 {
        return Err(SshKeysError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: trimmed.to_string(),
            reason: "Expected `<type> <base64> [comment]`".to_string(),
        });
    }

    Ok(())
}

/// Usernames end up as arguments to getent, id and chown.
pub fn validate_username(field_name: &str, user: &str) -> Result<()> {
    validate_non_empty_string(field_name, user)?;
    if user.starts_with('-') || user.contains(|c: char| c.is_whitespace() || c == ':' || c == '/') {
        return Err(SshKeysError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: user.to_string(),
            reason: "Username contains characters not allowed in a Unix login".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_port() {
        assert!(validate_port("port", 22).is_ok());
        assert!(validate_port("port", 65535).is_ok());
        assert!(validate_port("port", 0).is_err());
    }

    #[test]
    fn test_validate_public_key() {
        assert!(validate_public_key("key", "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAI root@backup\n").is_ok());
        assert!(validate_public_key("key", "   ").is_err());
        assert!(validate_public_key("key", "ssh-rsa AAAA\nssh-rsa BBBB").is_err());
        assert!(validate_public_key("key", "AAAAC3NzaC1lZDI1NTE5").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("user", "backup").is_ok());
        assert!(validate_username("user", "-rf").is_err());
        assert!(validate_username("user", "a:b").is_err());
        assert!(validate_username("user", "").is_err());
    }

    #[test]
    fn test_validate_absolute_remote_path() {
        assert!(validate_absolute_remote_path("temp_dir", "/var/tmp").is_ok());
        assert!(validate_absolute_remote_path("temp_dir", "tmp").is_err());
    }
}
