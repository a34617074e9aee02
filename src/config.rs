// Credential storage. The config is a small JSON file in the user's home
// directory, readable only by its owner. Environment variables take
// precedence so scripts never need to touch the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const EMAIL_VAR: &str = "ANYLIST_EMAIL";
pub const PASSWORD_VAR: &str = "ANYLIST_PASSWORD";

/// Email/password pair, as stored on disk.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Keep passwords out of debug logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the active credentials came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    Environment,
    Config,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => f.write_str("environment"),
            CredentialSource::Config => f.write_str("config"),
        }
    }
}

/// Credentials read from `ANYLIST_EMAIL` / `ANYLIST_PASSWORD`. Both must be
/// present and non-empty to count.
pub fn env_credentials() -> Option<Credentials> {
    from_env_values(std::env::var(EMAIL_VAR).ok(), std::env::var(PASSWORD_VAR).ok())
}

fn from_env_values(email: Option<String>, password: Option<String>) -> Option<Credentials> {
    match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Some(Credentials { email, password })
        }
        _ => None,
    }
}

/// Handle on the config file location.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// `~/.anylist/config.json`, or relative to the working directory when
    /// no home directory can be determined.
    pub fn default_location() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        ConfigStore::at(dir.join(".anylist").join("config.json"))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored credentials. A missing file means "not logged in"
    /// and is not an error.
    pub fn load(&self) -> Result<Option<Credentials>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no config file");
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        let creds: Credentials = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {}", self.path.display()))?;
        Ok(Some(creds))
    }

    /// Overwrites the config file with `creds`, owner read/write only.
    pub fn save(&self, creds: &Credentials) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        let json = serde_json::to_string_pretty(creds).context("Serializing config")?;

        // Written beside the target and renamed over it, so a crash never
        // leaves a half-written config behind.
        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict permissions on {}", file.path().display()))?;
        }
        file.write_all(json.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .and_then(|_| file.as_file().sync_all())
            .with_context(|| format!("Failed to write {}", file.path().display()))?;
        file.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "saved config");
        Ok(())
    }

    /// Removes the config file. Returns whether there was one.
    pub fn delete(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }

    /// Active credentials: environment first, then the file.
    pub fn resolve(&self, env: Option<Credentials>) -> Result<Option<(Credentials, CredentialSource)>> {
        if let Some(creds) = env {
            return Ok(Some((creds, CredentialSource::Environment)));
        }
        Ok(self.load()?.map(|c| (c, CredentialSource::Config)))
    }
}
